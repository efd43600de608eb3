use chrono::{Duration, Utc};
use cinema_client::domain::auth::Role;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use uuid::Uuid;

const BACKEND_SECRET: &str = "stub-backend-secret";

/// Access token signed the way the backend signs them
pub fn mint_access_token(role: Role) -> String {
    let exp = Utc::now() + Duration::minutes(15);
    let claims = json!({
        "userId": format!("user-{}", role),
        "role": role,
        "isAdmin": role == Role::Admin,
        "exp": exp.timestamp(),
        "jti": Uuid::new_v4().to_string(),
    });

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(BACKEND_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token")
}

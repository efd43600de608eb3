use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use super::DecodeError;

/// Session role. Exactly one per authenticated session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    #[serde(rename = "admin", alias = "Admin", alias = "ADMIN")]
    Admin,
    #[serde(rename = "sales", alias = "Sales", alias = "SALES")]
    Sales,
    #[serde(rename = "customer", alias = "Customer", alias = "CUSTOMER")]
    Customer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Sales => write!(f, "sales"),
            Role::Customer => write!(f, "customer"),
        }
    }
}

/// Claims carried by an access token.
///
/// Advisory only: they drive UI decisions, the backend re-checks every call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    pub role: Role,
    #[serde(default)]
    pub is_admin: bool,
    pub exp: i64, // Expiration time (unix seconds)
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map_or(true, |exp| exp <= now)
    }
}

/// Structural decoder for bearer tokens. Signatures are not verified.
#[derive(Clone)]
pub struct ClaimsDecoder {
    validation: Validation,
    key: DecodingKey,
}

impl ClaimsDecoder {
    pub fn new() -> Self {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            validation,
            key: DecodingKey::from_secret(&[]),
        }
    }

    /// Decode the payload of `token` into claims
    pub fn decode(&self, token: &str) -> Result<Claims, DecodeError> {
        let segments = token.split('.').count();
        if segments != 3 {
            return Err(DecodeError::Segments(segments));
        }

        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        Ok(data.claims)
    }
}

impl Default for ClaimsDecoder {
    fn default() -> Self {
        Self::new()
    }
}

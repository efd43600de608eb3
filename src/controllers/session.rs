use std::sync::Arc;

use crate::{
    domain::auth::{AuthStateProvider, ClaimsDecoder, LoginRequest, RegisterRequest, TokenPair},
    domain::guard::AccessPolicy,
    error::ClientResult,
    infrastructure::http::{ApiRequest, HttpClient},
    infrastructure::navigation::Navigator,
    infrastructure::storage::TokenStore,
};

pub const LOGIN_PATH: &str = "/api/users/login";
pub const REGISTER_PATH: &str = "/api/users/register";

pub struct SessionController {
    http: Arc<HttpClient>,
    token_store: Arc<dyn TokenStore>,
    auth_state: Arc<AuthStateProvider>,
    policy: Arc<AccessPolicy>,
    navigator: Arc<dyn Navigator>,
    decoder: ClaimsDecoder,
    login_route: String,
}

impl SessionController {
    pub fn new(
        http: Arc<HttpClient>,
        token_store: Arc<dyn TokenStore>,
        auth_state: Arc<AuthStateProvider>,
        policy: Arc<AccessPolicy>,
        navigator: Arc<dyn Navigator>,
        login_route: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_store,
            auth_state,
            policy,
            navigator,
            decoder: ClaimsDecoder::new(),
            login_route: login_route.into(),
        }
    }

    /// POST /api/users/login - store the token pair and land on the role's default page
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<String> {
        let pair: TokenPair = self.http.post(LOGIN_PATH, request).await?;
        let claims = self.decoder.decode(&pair.access_token)?;

        self.token_store.store_pair(&pair)?;
        self.auth_state.reload();

        let landing = self.policy.landing_for(claims.role).to_string();
        tracing::info!(user_id = %claims.user_id, role = %claims.role, "Logged in");
        self.navigator.navigate(&landing);

        Ok(landing)
    }

    /// POST /api/users/register
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<()> {
        self.http
            .send(ApiRequest::post(REGISTER_PATH).json(request)?)
            .await?;
        tracing::info!(email = %request.email, "Registered");
        Ok(())
    }

    /// Drop both tokens and go to the login route
    pub fn logout(&self) -> ClientResult<()> {
        self.token_store.clear()?;
        self.auth_state.reload();
        self.navigator.navigate(&self.login_route);
        tracing::info!("Logged out");
        Ok(())
    }
}

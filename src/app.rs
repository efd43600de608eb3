use std::sync::Arc;
use std::time::Duration;

use crate::{
    controllers::{navigation::NavigationController, session::SessionController},
    domain::auth::{AuthStateProvider, ClaimsDecoder},
    domain::guard::{AccessPolicy, RouteGuard, PUBLIC_LANDING},
    infrastructure::config::Config,
    infrastructure::http::{HttpClient, HttpRefreshExchange, RefreshCoordinator},
    infrastructure::navigation::LocationNavigator,
    infrastructure::storage::{FileTokenStore, InMemoryTokenStore, TokenStore},
};

/// One client session: the single refresh coordinator and everything wired around it
pub struct ClientApp {
    pub config: Arc<Config>,
    pub token_store: Arc<dyn TokenStore>,
    pub navigator: Arc<LocationNavigator>,
    pub coordinator: Arc<RefreshCoordinator>,
    pub http: Arc<HttpClient>,
    pub auth_state: Arc<AuthStateProvider>,
    pub guard: RouteGuard,
    pub session: SessionController,
    pub navigation: NavigationController,
}

impl ClientApp {
    /// Build the session, picking the token store from configuration
    pub fn build(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let token_store: Arc<dyn TokenStore> = match &config.token_store_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "Using file token store");
                Arc::new(FileTokenStore::open(path.clone())?)
            }
            None => {
                tracing::info!("Using in-memory token store");
                Arc::new(InMemoryTokenStore::new())
            }
        };

        Self::build_with_store(config, token_store)
    }

    pub fn build_with_store(
        config: Config,
        token_store: Arc<dyn TokenStore>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = Arc::new(config);

        let policy = Arc::new(match &config.access_policy_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading access policy");
                AccessPolicy::from_file(path)?
            }
            None => AccessPolicy::default(),
        });

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let navigator = Arc::new(LocationNavigator::new(PUBLIC_LANDING));

        let exchange = Arc::new(HttpRefreshExchange::new(
            http_client.clone(),
            &config.api_base_url,
            &config.refresh_path,
        ));
        let coordinator = Arc::new(RefreshCoordinator::new(
            exchange,
            token_store.clone(),
            navigator.clone(),
            config.login_route.clone(),
        ));
        let http = Arc::new(HttpClient::new(
            http_client,
            &config,
            token_store.clone(),
            coordinator.clone(),
        ));

        let auth_state = Arc::new(AuthStateProvider::new(token_store.clone(), ClaimsDecoder::new()));
        let guard = RouteGuard::new(policy.clone());

        let session = SessionController::new(
            http.clone(),
            token_store.clone(),
            auth_state.clone(),
            policy,
            navigator.clone(),
            config.login_route.clone(),
        );
        let navigation = NavigationController::new(auth_state.clone(), guard.clone(), navigator.clone());

        Ok(Self {
            config,
            token_store,
            navigator,
            coordinator,
            http,
            auth_state,
            guard,
            session,
            navigation,
        })
    }
}

use std::sync::Arc;
use tokio::sync::watch;

use super::{ClaimsDecoder, Role};
use crate::infrastructure::storage::TokenStore;

/// Session view consumed by the route guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub role: Option<Role>,
    pub loading: bool,
}

impl AuthState {
    pub fn loading() -> Self {
        Self {
            is_authenticated: false,
            role: None,
            loading: true,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            is_authenticated: false,
            role: None,
            loading: false,
        }
    }

    pub fn authenticated(role: Role) -> Self {
        Self {
            is_authenticated: true,
            role: Some(role),
            loading: false,
        }
    }

    /// Derive the state from an optional access token.
    /// A token that fails to decode counts as logged out.
    pub fn from_token(decoder: &ClaimsDecoder, token: Option<&str>) -> Self {
        let Some(token) = token else {
            return Self::anonymous();
        };

        match decoder.decode(token) {
            Ok(claims) => Self::authenticated(claims.role),
            Err(e) => {
                tracing::warn!(error = %e, "Stored access token could not be decoded");
                Self::anonymous()
            }
        }
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::loading()
    }
}

/// Recomputes [`AuthState`] from the token store and publishes it
pub struct AuthStateProvider {
    token_store: Arc<dyn TokenStore>,
    decoder: ClaimsDecoder,
    state: watch::Sender<AuthState>,
}

impl AuthStateProvider {
    pub fn new(token_store: Arc<dyn TokenStore>, decoder: ClaimsDecoder) -> Self {
        let (state, _) = watch::channel(AuthState::loading());
        Self {
            token_store,
            decoder,
            state,
        }
    }

    /// Re-read the stored access token and publish the derived state
    pub fn reload(&self) -> AuthState {
        self.state.send_replace(AuthState::loading());

        let token = self.token_store.access_token();
        let next = AuthState::from_token(&self.decoder, token.as_deref());

        self.state.send_replace(next);
        tracing::debug!(
            is_authenticated = next.is_authenticated,
            role = ?next.role,
            "Auth state reloaded"
        );
        next
    }

    pub fn current(&self) -> AuthState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}

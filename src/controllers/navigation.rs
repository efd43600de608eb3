use std::sync::Arc;

use crate::{
    domain::auth::AuthStateProvider,
    domain::guard::{GuardDecision, RouteGuard},
    infrastructure::navigation::Navigator,
};

/// Applies the route guard on every navigation
pub struct NavigationController {
    auth_state: Arc<AuthStateProvider>,
    guard: RouteGuard,
    navigator: Arc<dyn Navigator>,
}

impl NavigationController {
    pub fn new(auth_state: Arc<AuthStateProvider>, guard: RouteGuard, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            auth_state,
            guard,
            navigator,
        }
    }

    /// Re-derive the session, evaluate the guard and move to the resulting location.
    /// Paths outside the policy's protected prefixes are not gated.
    /// Nothing is cached between calls.
    pub fn navigate(&self, path: &str) -> GuardDecision {
        let auth = self.auth_state.reload();
        let decision = if self.guard.policy().is_protected(path) {
            self.guard.check(&auth, path)
        } else {
            GuardDecision::Authorized
        };

        match &decision {
            GuardDecision::Authorized => self.navigator.navigate(path),
            GuardDecision::Redirect { target } => {
                tracing::info!(requested = path, target = %target, "Navigation redirected");
                self.navigator.navigate(target);
            }
            GuardDecision::Loading => {}
        }

        decision
    }
}

use std::sync::Arc;

use super::AccessPolicy;
use crate::domain::auth::AuthState;

/// Outcome of evaluating a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session state not known yet; render nothing committal
    Loading,
    Authorized,
    Redirect { target: String },
}

/// Decide whether `requested_path` may be rendered for `auth`.
///
/// Rules are applied in order: loading, unauthenticated, role without
/// destinations, forbidden sub-path, otherwise authorized.
pub fn evaluate(auth: &AuthState, requested_path: &str, policy: &AccessPolicy) -> GuardDecision {
    if auth.loading {
        return GuardDecision::Loading;
    }

    let role = match auth.role {
        Some(role) if auth.is_authenticated => role,
        _ => return redirect_to(&policy.public_landing),
    };

    let rules = policy.for_role(role);
    if !rules.has_destinations() {
        return redirect_to(&policy.public_landing);
    }

    if rules.forbids(requested_path) {
        return redirect_to(&policy.public_landing);
    }

    GuardDecision::Authorized
}

fn redirect_to(target: &str) -> GuardDecision {
    GuardDecision::Redirect {
        target: target.to_string(),
    }
}

/// Route guard bound to a policy
#[derive(Clone)]
pub struct RouteGuard {
    policy: Arc<AccessPolicy>,
}

impl RouteGuard {
    pub fn new(policy: Arc<AccessPolicy>) -> Self {
        Self { policy }
    }

    pub fn check(&self, auth: &AuthState, requested_path: &str) -> GuardDecision {
        let decision = evaluate(auth, requested_path, &self.policy);
        tracing::debug!(
            path = requested_path,
            role = ?auth.role,
            decision = ?decision,
            "Route guard evaluated"
        );
        decision
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }
}

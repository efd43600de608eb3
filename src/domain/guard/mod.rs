pub mod policy;
pub mod route_guard;

pub use policy::{path_matches, AccessPolicy, PolicyError, RolePolicy, PUBLIC_LANDING};
pub use route_guard::{evaluate, GuardDecision, RouteGuard};

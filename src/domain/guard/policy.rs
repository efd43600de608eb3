use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::auth::Role;

pub const PUBLIC_LANDING: &str = "/home";

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid access policy: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Navigation rules for one role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RolePolicy {
    pub allowed_tabs: Vec<String>,
    #[serde(default)]
    pub forbidden_subpaths: Vec<String>,
    pub default_landing: String,
}

impl RolePolicy {
    pub fn has_destinations(&self) -> bool {
        !self.allowed_tabs.is_empty()
    }

    pub fn forbids(&self, path: &str) -> bool {
        self.forbidden_subpaths
            .iter()
            .any(|prefix| path_matches(path, prefix))
    }
}

/// Role to navigation rules. One field per role keeps the mapping total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccessPolicy {
    #[serde(default = "default_public_landing")]
    pub public_landing: String,
    /// Destinations the guard gates; everything else is public
    #[serde(default = "default_protected_prefixes")]
    pub protected_prefixes: Vec<String>,
    pub admin: RolePolicy,
    pub sales: RolePolicy,
    pub customer: RolePolicy,
}

fn default_public_landing() -> String {
    PUBLIC_LANDING.to_string()
}

fn default_protected_prefixes() -> Vec<String> {
    vec!["/admin".to_string()]
}

impl AccessPolicy {
    pub fn for_role(&self, role: Role) -> &RolePolicy {
        match role {
            Role::Admin => &self.admin,
            Role::Sales => &self.sales,
            Role::Customer => &self.customer,
        }
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.protected_prefixes
            .iter()
            .any(|prefix| path_matches(path, prefix))
    }

    /// Where a freshly logged-in session should land
    pub fn landing_for(&self, role: Role) -> &str {
        &self.for_role(role).default_landing
    }

    /// Load a policy from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, PolicyError> {
        let raw = std::fs::read_to_string(path)?;
        let policy = serde_json::from_str(&raw)?;
        Ok(policy)
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        let admin_tabs = [
            "/admin/dashboard",
            "/admin/movies",
            "/admin/cinemas",
            "/admin/showtimes",
            "/admin/reservations",
            "/admin/users",
        ];

        Self {
            public_landing: default_public_landing(),
            protected_prefixes: default_protected_prefixes(),
            admin: RolePolicy {
                allowed_tabs: admin_tabs.iter().map(|s| s.to_string()).collect(),
                forbidden_subpaths: Vec::new(),
                default_landing: "/admin/dashboard".to_string(),
            },
            sales: RolePolicy {
                allowed_tabs: admin_tabs
                    .iter()
                    .filter(|tab| **tab != "/admin/users")
                    .map(|s| s.to_string())
                    .collect(),
                forbidden_subpaths: vec!["/admin/users".to_string()],
                default_landing: "/admin/dashboard".to_string(),
            },
            customer: RolePolicy {
                allowed_tabs: Vec::new(),
                forbidden_subpaths: Vec::new(),
                default_landing: PUBLIC_LANDING.to_string(),
            },
        }
    }
}

/// Segment-aware prefix match: `/admin/users` covers `/admin/users/7`
/// but not `/admin/usersettings`. Query and fragment are ignored.
pub fn path_matches(path: &str, prefix: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = trim_trailing_slash(path);
    let prefix = trim_trailing_slash(prefix);

    if prefix.is_empty() {
        return true;
    }

    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn trim_trailing_slash(path: &str) -> &str {
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::domain::auth::TokenPair;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt token file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Persisted token slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKey {
    AuthToken,
    RefreshToken,
}

impl TokenKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKey::AuthToken => "authToken",
            TokenKey::RefreshToken => "refreshToken",
        }
    }
}

/// Durable key-value surface holding the session tokens.
///
/// Implementations must be cheap to call: the refresh coordinator reads and
/// writes through this trait without yielding.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: TokenKey) -> Option<String>;

    fn set(&self, key: TokenKey, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: TokenKey) -> Result<(), StorageError>;

    fn access_token(&self) -> Option<String> {
        self.get(TokenKey::AuthToken)
    }

    fn refresh_token(&self) -> Option<String> {
        self.get(TokenKey::RefreshToken)
    }

    fn store_pair(&self, pair: &TokenPair) -> Result<(), StorageError> {
        self.set(TokenKey::AuthToken, &pair.access_token)?;
        self.set(TokenKey::RefreshToken, &pair.refresh_token)
    }

    /// Remove both tokens together
    fn clear(&self) -> Result<(), StorageError> {
        let access = self.remove(TokenKey::AuthToken);
        let refresh = self.remove(TokenKey::RefreshToken);
        access.and(refresh)
    }
}

/// Process-local token store
#[derive(Default)]
pub struct InMemoryTokenStore {
    slots: RwLock<HashMap<TokenKey, String>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn get(&self, key: TokenKey) -> Option<String> {
        self.slots.read().get(&key).cloned()
    }

    fn set(&self, key: TokenKey, value: &str) -> Result<(), StorageError> {
        self.slots.write().insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: TokenKey) -> Result<(), StorageError> {
        self.slots.write().remove(&key);
        Ok(())
    }
}

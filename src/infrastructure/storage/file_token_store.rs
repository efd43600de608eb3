use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::{StorageError, TokenKey, TokenStore};

/// Token store persisted as a small JSON object (`{"authToken": ..., "refreshToken": ...}`).
///
/// Every write rewrites the whole file through a temporary sibling and a rename.
pub struct FileTokenStore {
    path: PathBuf,
    slots: Mutex<BTreeMap<String, String>>,
}

impl FileTokenStore {
    /// Open the store, loading existing slots if the file is present
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let slots = match std::fs::read(&path) {
            Ok(raw) if raw.is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_slice(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), slots = slots.len(), "Token store opened");

        Ok(Self {
            path,
            slots: Mutex::new(slots),
        })
    }

    fn flush(&self, slots: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(slots)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: TokenKey) -> Option<String> {
        self.slots.lock().get(key.as_str()).cloned()
    }

    fn set(&self, key: TokenKey, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock();
        slots.insert(key.as_str().to_string(), value.to_string());
        self.flush(&slots)
    }

    fn remove(&self, key: TokenKey) -> Result<(), StorageError> {
        let mut slots = self.slots.lock();
        if slots.remove(key.as_str()).is_none() {
            return Ok(());
        }
        self.flush(&slots)
    }
}

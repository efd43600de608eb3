pub mod file_token_store;
pub mod token_store;

pub use file_token_store::FileTokenStore;
pub use token_store::{InMemoryTokenStore, StorageError, TokenKey, TokenStore};

//! Token persistence for the Med Assist session client.
//!
//! This crate provides:
//! - **`KeyValueStore`**: the storage seam every backend implements
//! - **`MemoryStore`**: process-lifetime storage, used by tests and embedders
//! - **`FileStore`**: a JSON file that survives restarts (`~/.medassist/session.json`)
//! - **`TokenStore`**: the high-level access/refresh token API on top of a backend

mod file;
mod keys;
mod memory;
mod tokens;
mod traits;

pub use file::FileStore;
pub use keys::StorageKeys;
pub use memory::MemoryStore;
pub use tokens::TokenStore;
pub use traits::KeyValueStore;

use std::path::Path;
use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend-specific failure (poisoned lock, unusable location)
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Stored data could not be decoded or encoded
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Open the persistent token store backed by the file at `path`.
pub fn open_token_store(path: &Path) -> StorageResult<TokenStore> {
    let storage = FileStore::open(path)?;
    Ok(TokenStore::new(Box::new(storage)))
}

/// Create a token store that lives only as long as the process.
pub fn in_memory_token_store() -> TokenStore {
    TokenStore::new(Box::new(MemoryStore::new()))
}

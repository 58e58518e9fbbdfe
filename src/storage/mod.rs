//! Durable client-side storage, the native counterpart of browser local
//! storage. The forum client keeps exactly three entries here: the access
//! token, the refresh token, and the one-shot avatar prompt flag set after
//! registration.
//!
//! Stores are plain string key/value maps with last-write-wins semantics.
//! [`Credentials`] is the typed view the HTTP client and session manager use;
//! it never logs token material.

mod credentials;
mod file;
mod memory;

pub use credentials::{Credentials, ACCESS_TOKEN_KEY, AVATAR_PROMPT_KEY, REFRESH_TOKEN_KEY};
pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage file is not a JSON object of strings: {0}")]
    Format(#[from] serde_json::Error),
}

/// String key/value store shared by the HTTP client and the session manager.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    /// Returns an error if the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// # Errors
    /// Returns an error if the removal cannot be persisted.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

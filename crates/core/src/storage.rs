//! Durable key-value storage surviving restarts.
//!
//! The widget keeps its whole transcript under a single key. Reads and
//! writes are synchronous, like a browser's local storage.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Errors that can occur while accessing a [`Storage`].
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The underlying medium failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded or decoded.
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The key cannot be mapped onto the medium.
    #[error("invalid storage key: '{0}'")]
    InvalidKey(String),
}

/// A synchronous string key-value store.
pub trait Storage: Send + Sync + 'static {
    /// Returns the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

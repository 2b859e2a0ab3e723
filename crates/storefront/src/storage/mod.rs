//! Durable string-keyed storage for the cart snapshot.
//!
//! The cart manager only ever reads one key at startup and writes the same
//! key after each committed change. Values are stored exactly as given and
//! read back byte-for-byte.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

/// Default key for the cart snapshot.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Key-value store holding string values.
#[async_trait]
pub trait PersistentStore: Send + Sync {
    /// Read the value stored under `key`, `None` if nothing was written.
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Errors that can occur when reading or writing the store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be serialized.
    #[error("Snapshot serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

//! Storage layer error types.

use thiserror::Error;

/// Errors that can occur in the storage layer
#[derive(Error, Debug)]
pub enum StorageError {
    /// RocksDB operation failed (unwritable path, corrupt store, I/O failure)
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    /// Column family not found
    #[error("Column family not found: {0}")]
    ColumnFamilyNotFound(String),

    /// Key encoding/decoding error
    #[error("Key error: {0}")]
    Key(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Store was written by an incompatible schema version
    #[error("Incompatible store schema: {0}")]
    IncompatibleSchema(String),

    /// Operation attempted on a closed store
    #[error("Storage is not open")]
    NotInitialized,

    /// A writer panicked while holding an internal lock
    #[error("Storage lock poisoned: {0}")]
    Lock(String),

    /// IO error while preparing the store location
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl StorageError {
    /// True when another process holds the RocksDB lock on the store.
    pub fn is_lock_contention(&self) -> bool {
        match self {
            StorageError::RocksDb(e) => e.to_string().to_ascii_lowercase().contains("lock"),
            _ => false,
        }
    }
}

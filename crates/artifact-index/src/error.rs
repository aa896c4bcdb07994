//! Artifact index error types.

use thiserror::Error;

use artifact_search::SearchError;
use artifact_storage::StorageError;

/// Errors returned by [`crate::ArtifactIndex`].
#[derive(Debug, Error)]
pub enum IndexError {
    /// Backing store unwritable, unreadable or incompatible.
    /// The instance must not be used further.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Search index could not be built, updated or queried
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Operation called out of order
    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    /// Record rejected before any write
    #[error("Validation error: {0}")]
    Validation(String),
}

impl IndexError {
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, IndexError::Lifecycle(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, IndexError::Validation(_))
    }

    /// True when the store is held open by another process.
    pub fn is_lock_contention(&self) -> bool {
        matches!(self, IndexError::Storage(e) if e.is_lock_contention())
    }
}

//! Ingest error types.

use std::path::PathBuf;

use thiserror::Error;

use artifact_index::IndexError;

/// Errors that can occur while reading and indexing artifact files.
///
/// Document shape is never an error: missing sections become empty fields.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Artifact file could not be read
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// No extractor registered for the artifact kind
    #[error("No extractor registered for {0}")]
    NoExtractor(String),

    /// Index rejected the record
    #[error(transparent)]
    Index(#[from] IndexError),
}

//! Error types shared across the artifact index crates.

use thiserror::Error;

/// Errors raised while loading configuration or (de)serializing records.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

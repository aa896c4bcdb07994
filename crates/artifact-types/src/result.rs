//! Search result shape shared by every record kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{ArtifactKind, StoredArtifact};

/// A ranked search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Record kind, serialized as `type` ("plan" or "ledger")
    #[serde(rename = "type")]
    pub kind: ArtifactKind,

    pub id: String,

    pub file_path: String,

    /// Plan title or ledger session name
    pub title: String,

    /// Plan overview or ledger goal
    pub summary: String,

    /// Length-normalized weighted relevance score (always > 0)
    pub score: f32,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub indexed_at: DateTime<Utc>,
}

impl SearchResult {
    pub fn from_stored(stored: &StoredArtifact, score: f32) -> Self {
        let record = &stored.record;
        Self {
            kind: record.kind(),
            id: record.id().to_string(),
            file_path: record.file_path().to_string(),
            title: record.title().to_string(),
            summary: record.summary().to_string(),
            score,
            indexed_at: stored.indexed_at,
        }
    }
}

//! Artifact records: plans and work-session ledgers.
//!
//! A record is identified solely by its `id` (`<kind>-<name>`). Indexing the
//! same `id` again replaces the stored record in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of artifact a record was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Plan,
    Ledger,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Plan => "plan",
            ArtifactKind::Ledger => "ledger",
        }
    }

    /// Parse from string, returning None for unknown kinds.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plan" => Some(ArtifactKind::Plan),
            "ledger" => Some(ArtifactKind::Ledger),
            _ => None,
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown artifact type: {}", s))
    }
}

/// A plan describing a proposed implementation approach.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRecord {
    /// Stable identifier, e.g. `plan-api-refactor`
    pub id: String,

    /// Plan title (first heading of the document)
    #[serde(default)]
    pub title: String,

    /// Source location of the plan document
    #[serde(default)]
    pub file_path: String,

    /// Overview section
    #[serde(default)]
    pub overview: String,

    /// Approach section
    #[serde(default)]
    pub approach: String,
}

impl PlanRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_file_path(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = file_path.into();
        self
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = overview.into();
        self
    }

    pub fn with_approach(mut self, approach: impl Into<String>) -> Self {
        self.approach = approach.into();
        self
    }
}

/// A running-state ledger for an in-progress work session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Stable identifier, e.g. `ledger-database-migration`
    pub id: String,

    /// Session name the ledger belongs to
    #[serde(default)]
    pub session_name: String,

    /// Source location of the ledger document
    #[serde(default)]
    pub file_path: String,

    /// Session goal
    #[serde(default)]
    pub goal: String,

    /// Current task description
    #[serde(default)]
    pub state_now: String,

    /// Key decisions recorded so far
    #[serde(default)]
    pub key_decisions: String,

    /// Files read during the session, in first-seen order
    #[serde(default)]
    pub files_read: Vec<String>,

    /// Files modified during the session, in first-seen order
    #[serde(default)]
    pub files_modified: Vec<String>,
}

impl LedgerRecord {
    pub fn new(id: impl Into<String>, session_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            session_name: session_name.into(),
            ..Default::default()
        }
    }

    pub fn with_file_path(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = file_path.into();
        self
    }

    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = goal.into();
        self
    }

    pub fn with_state_now(mut self, state_now: impl Into<String>) -> Self {
        self.state_now = state_now.into();
        self
    }

    pub fn with_key_decisions(mut self, key_decisions: impl Into<String>) -> Self {
        self.key_decisions = key_decisions.into();
        self
    }

    pub fn with_files_read<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files_read = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_files_modified<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files_modified = files.into_iter().map(Into::into).collect();
        self
    }
}

/// Any indexable artifact, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ArtifactRecord {
    Plan(PlanRecord),
    Ledger(LedgerRecord),
}

impl ArtifactRecord {
    pub fn id(&self) -> &str {
        match self {
            ArtifactRecord::Plan(plan) => &plan.id,
            ArtifactRecord::Ledger(ledger) => &ledger.id,
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        match self {
            ArtifactRecord::Plan(_) => ArtifactKind::Plan,
            ArtifactRecord::Ledger(_) => ArtifactKind::Ledger,
        }
    }

    pub fn file_path(&self) -> &str {
        match self {
            ArtifactRecord::Plan(plan) => &plan.file_path,
            ArtifactRecord::Ledger(ledger) => &ledger.file_path,
        }
    }

    /// Display title: the plan title or the ledger's session name.
    pub fn title(&self) -> &str {
        match self {
            ArtifactRecord::Plan(plan) => &plan.title,
            ArtifactRecord::Ledger(ledger) => &ledger.session_name,
        }
    }

    /// One-line summary: the plan overview or the ledger goal.
    pub fn summary(&self) -> &str {
        match self {
            ArtifactRecord::Plan(plan) => &plan.overview,
            ArtifactRecord::Ledger(ledger) => &ledger.goal,
        }
    }
}

impl From<PlanRecord> for ArtifactRecord {
    fn from(plan: PlanRecord) -> Self {
        ArtifactRecord::Plan(plan)
    }
}

impl From<LedgerRecord> for ArtifactRecord {
    fn from(ledger: LedgerRecord) -> Self {
        ArtifactRecord::Ledger(ledger)
    }
}

/// A record as persisted by the storage engine.
///
/// `sequence` is a store-wide monotonic write counter; a higher value means
/// the record was indexed more recently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredArtifact {
    pub record: ArtifactRecord,

    pub sequence: u64,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub indexed_at: DateTime<Utc>,
}

impl StoredArtifact {
    pub fn new(record: ArtifactRecord, sequence: u64) -> Self {
        Self {
            record,
            sequence,
            indexed_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        self.record.id()
    }

    /// Serialize to JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!(ArtifactKind::parse("plan"), Some(ArtifactKind::Plan));
        assert_eq!(ArtifactKind::parse(" Ledger "), Some(ArtifactKind::Ledger));
        assert_eq!(ArtifactKind::parse("handoff"), None);
        assert!("handoff".parse::<ArtifactKind>().is_err());
    }

    #[test]
    fn test_record_is_tagged_with_type() {
        let record = ArtifactRecord::from(PlanRecord::new("plan-1", "Title"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "plan");
        assert_eq!(json["id"], "plan-1");
    }

    #[test]
    fn test_missing_ledger_fields_default_to_empty() {
        let json = r#"{"type":"ledger","id":"ledger-x","session_name":"x"}"#;
        let record: ArtifactRecord = serde_json::from_str(json).unwrap();

        match record {
            ArtifactRecord::Ledger(ledger) => {
                assert_eq!(ledger.key_decisions, "");
                assert!(ledger.files_read.is_empty());
                assert!(ledger.files_modified.is_empty());
            }
            other => panic!("expected ledger, got {:?}", other),
        }
    }

    #[test]
    fn test_title_and_summary_per_kind() {
        let plan = ArtifactRecord::from(
            PlanRecord::new("plan-1", "API Refactoring Plan").with_overview("Move to GraphQL"),
        );
        assert_eq!(plan.title(), "API Refactoring Plan");
        assert_eq!(plan.summary(), "Move to GraphQL");

        let ledger = ArtifactRecord::from(
            LedgerRecord::new("ledger-1", "database-migration").with_goal("Migrate to PostgreSQL"),
        );
        assert_eq!(ledger.title(), "database-migration");
        assert_eq!(ledger.summary(), "Migrate to PostgreSQL");
        assert_eq!(ledger.kind(), ArtifactKind::Ledger);
    }
}

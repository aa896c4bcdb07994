//! Artifact path recognition.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use artifact_types::ArtifactKind;

static LEDGER_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"thoughts/ledgers/CONTINUITY_(.+)\.md$").expect("ledger path pattern is valid")
});

static PLAN_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"thoughts/shared/plans/(.+)\.md$").expect("plan path pattern is valid")
});

/// A recognized artifact document on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSource {
    pub kind: ArtifactKind,
    /// Stable document name: the ledger session or the plan file slug
    pub name: String,
    pub path: PathBuf,
}

impl ArtifactSource {
    pub fn new(kind: ArtifactKind, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            name: name.into(),
            path: path.into(),
        }
    }

    /// Record id derived from the document name, `<kind>-<name>`.
    pub fn record_id(&self) -> String {
        format!("{}-{}", self.kind, self.name)
    }

    pub fn path_str(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}

/// Classify a written file as a plan or ledger, or `None` for anything else.
pub fn classify_path(path: &Path) -> Option<ArtifactSource> {
    let normalized = path.to_string_lossy().replace('\\', "/");

    if let Some(caps) = LEDGER_PATH.captures(&normalized) {
        return Some(ArtifactSource::new(ArtifactKind::Ledger, &caps[1], path));
    }
    if let Some(caps) = PLAN_PATH.captures(&normalized) {
        return Some(ArtifactSource::new(ArtifactKind::Plan, &caps[1], path));
    }
    None
}

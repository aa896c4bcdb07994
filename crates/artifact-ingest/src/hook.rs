//! Auto-indexing of artifact files.
//!
//! Wired to file-write tool events: every write to a plan or ledger path
//! re-extracts the document and upserts it, so the index follows the files.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use artifact_index::ArtifactIndex;
use artifact_types::ArtifactRecord;

use crate::error::IngestError;
use crate::extractor::{LedgerExtractor, PlanExtractor, RecordExtractor};
use crate::source::{classify_path, ArtifactSource};

/// Tool name whose events trigger indexing.
pub const WRITE_TOOL: &str = "write";

/// Counts from a bulk re-index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Artifacts extracted and upserted
    pub indexed: usize,
    /// Files that are not plans or ledgers
    pub skipped: usize,
    /// Artifacts that could not be read or indexed
    pub failed: usize,
}

/// Feeds artifact files into an [`ArtifactIndex`].
pub struct AutoIndexer {
    index: Arc<ArtifactIndex>,
    extractors: Vec<Box<dyn RecordExtractor>>,
}

impl AutoIndexer {
    /// Indexer with the plan and ledger extractors registered.
    pub fn new(index: Arc<ArtifactIndex>) -> Self {
        Self {
            index,
            extractors: vec![Box::new(PlanExtractor), Box::new(LedgerExtractor)],
        }
    }

    /// Register an extractor. A later extractor for the same kind wins.
    pub fn with_extractor(mut self, extractor: Box<dyn RecordExtractor>) -> Self {
        self.extractors.insert(0, extractor);
        self
    }

    pub fn index(&self) -> &Arc<ArtifactIndex> {
        &self.index
    }

    fn extractor_for(&self, source: &ArtifactSource) -> Result<&dyn RecordExtractor, IngestError> {
        self.extractors
            .iter()
            .find(|e| e.kind() == source.kind)
            .map(|e| &**e)
            .ok_or_else(|| IngestError::NoExtractor(source.kind.to_string()))
    }

    /// Index one written file.
    ///
    /// Returns `Ok(None)` when the path is not a plan or ledger.
    pub fn on_file_written(&self, path: &Path) -> Result<Option<ArtifactRecord>, IngestError> {
        let Some(source) = classify_path(path) else {
            return Ok(None);
        };

        let content = fs::read_to_string(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let record = self.extractor_for(&source)?.extract(&content, &source);
        self.index.index_record(record.clone())?;

        debug!(id = %record.id(), kind = %source.kind, path = %path.display(), "Indexed artifact");
        Ok(Some(record))
    }

    /// Handle a tool event from the agent. Only writes are acted upon.
    ///
    /// Failures are logged and swallowed so a bad document never blocks the
    /// agent's write.
    pub fn handle_tool_event(&self, tool: &str, file_path: Option<&str>) -> Option<ArtifactRecord> {
        if !tool.eq_ignore_ascii_case(WRITE_TOOL) {
            return None;
        }
        let path = file_path?;

        match self.on_file_written(Path::new(path)) {
            Ok(record) => record,
            Err(e) => {
                warn!(path, error = %e, "Auto-index failed");
                None
            }
        }
    }

    /// Walk `root` and index every recognized artifact.
    ///
    /// Per-file failures are counted, not returned; only a traversal error
    /// aborts the walk.
    pub fn index_directory(&self, root: &Path) -> Result<IngestSummary, IngestError> {
        let mut summary = IngestSummary::default();

        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            match self.on_file_written(entry.path()) {
                Ok(Some(_)) => summary.indexed += 1,
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "Skipping artifact");
                    summary.failed += 1;
                }
            }
        }

        info!(
            root = %root.display(),
            indexed = summary.indexed,
            skipped = summary.skipped,
            failed = summary.failed,
            "Directory indexed"
        );
        Ok(summary)
    }
}

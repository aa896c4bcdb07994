//! Tantivy index management.
//!
//! The search index lives in RAM. RocksDB is the only durable store, so the
//! index is rebuilt from a storage scan each time the artifact index opens.

use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy};
use tracing::{debug, info};

use crate::error::SearchError;
use crate::schema::{build_artifact_schema, ArtifactSchema};
use crate::tokenizer::register_tokenizer;

/// Default memory budget for IndexWriter (20MB)
const DEFAULT_WRITER_MEMORY_MB: usize = 20;

/// Wrapper for Tantivy index with schema access.
pub struct SearchIndex {
    index: Index,
    schema: ArtifactSchema,
    writer_memory_mb: usize,
}

impl SearchIndex {
    /// Create an empty in-memory index with the artifact tokenizer registered.
    pub fn create_in_ram() -> Self {
        let schema = build_artifact_schema();
        let index = Index::create_in_ram(schema.schema().clone());
        register_tokenizer(&index);

        info!("Created in-memory search index");
        Self {
            index,
            schema,
            writer_memory_mb: DEFAULT_WRITER_MEMORY_MB,
        }
    }

    /// Get the artifact schema
    pub fn schema(&self) -> &ArtifactSchema {
        &self.schema
    }

    /// Get the underlying Tantivy index
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Create a single-threaded IndexWriter with the configured memory budget
    pub fn writer(&self) -> Result<IndexWriter, SearchError> {
        let memory_budget = self.writer_memory_mb * 1024 * 1024;
        let writer = self.index.writer_with_num_threads(1, memory_budget)?;
        debug!(memory_mb = self.writer_memory_mb, "Created index writer");
        Ok(writer)
    }

    /// Create an IndexReader that only reloads when told to.
    ///
    /// The indexer reloads it after each commit so writes are visible to the
    /// next search.
    pub fn reader(&self) -> Result<IndexReader, SearchError> {
        let reader = self
            .index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        debug!("Created index reader");
        Ok(reader)
    }
}

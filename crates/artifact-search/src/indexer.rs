//! Search indexer for adding artifacts to the Tantivy index.
//!
//! Every write commits and reloads the shared reader before returning, so a
//! record is searchable as soon as `upsert` succeeds.

use std::sync::Mutex;

use tantivy::{IndexReader, IndexWriter, Term};
use tracing::{debug, info};

use artifact_types::StoredArtifact;

use crate::document::artifact_to_doc;
use crate::error::SearchError;
use crate::index::SearchIndex;
use crate::schema::ArtifactSchema;

/// Manages document indexing operations.
pub struct ArtifactIndexer {
    writer: Mutex<IndexWriter>,
    reader: IndexReader,
    schema: ArtifactSchema,
}

impl ArtifactIndexer {
    /// Create an indexer that refreshes `reader` after each commit.
    pub fn new(index: &SearchIndex, reader: IndexReader) -> Result<Self, SearchError> {
        Ok(Self {
            writer: Mutex::new(index.writer()?),
            reader,
            schema: index.schema().clone(),
        })
    }

    /// Index an artifact, replacing any document with the same id.
    pub fn upsert(&self, stored: &StoredArtifact) -> Result<(), SearchError> {
        let doc = artifact_to_doc(&self.schema, stored);

        let mut writer = self
            .writer
            .lock()
            .map_err(|e| SearchError::IndexLocked(e.to_string()))?;

        writer.delete_term(Term::from_field_text(self.schema.id, stored.id()));
        writer.add_document(doc)?;
        writer.commit()?;
        self.reader.reload()?;

        debug!(id = %stored.id(), sequence = stored.sequence, "Indexed artifact document");
        Ok(())
    }

    /// Replace the whole index with `entries` in a single commit.
    pub fn rebuild<'a, I>(&self, entries: I) -> Result<usize, SearchError>
    where
        I: IntoIterator<Item = &'a StoredArtifact>,
    {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| SearchError::IndexLocked(e.to_string()))?;

        writer.delete_all_documents()?;
        let mut count = 0;
        for stored in entries {
            writer.add_document(artifact_to_doc(&self.schema, stored))?;
            count += 1;
        }
        writer.commit()?;
        self.reader.reload()?;

        info!(documents = count, "Rebuilt search index");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifact_types::{ArtifactRecord, PlanRecord};

    fn plan(id: &str, title: &str, sequence: u64) -> StoredArtifact {
        StoredArtifact::new(ArtifactRecord::from(PlanRecord::new(id, title)), sequence)
    }

    #[test]
    fn test_upsert_is_visible_immediately() {
        let index = SearchIndex::create_in_ram();
        let reader = index.reader().unwrap();
        let indexer = ArtifactIndexer::new(&index, reader.clone()).unwrap();

        indexer.upsert(&plan("plan-1", "First", 0)).unwrap();
        assert_eq!(reader.searcher().num_docs(), 1);
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let index = SearchIndex::create_in_ram();
        let reader = index.reader().unwrap();
        let indexer = ArtifactIndexer::new(&index, reader.clone()).unwrap();

        indexer.upsert(&plan("plan-1", "First", 0)).unwrap();
        indexer.upsert(&plan("plan-1", "Second", 1)).unwrap();
        indexer.upsert(&plan("plan-2", "Other", 2)).unwrap();

        assert_eq!(reader.searcher().num_docs(), 2);
    }

    #[test]
    fn test_rebuild_discards_previous_documents() {
        let index = SearchIndex::create_in_ram();
        let reader = index.reader().unwrap();
        let indexer = ArtifactIndexer::new(&index, reader.clone()).unwrap();

        indexer.upsert(&plan("plan-stale", "Stale", 0)).unwrap();

        let entries = vec![plan("plan-1", "One", 1), plan("plan-2", "Two", 2)];
        assert_eq!(indexer.rebuild(&entries).unwrap(), 2);
        assert_eq!(reader.searcher().num_docs(), 2);
    }
}

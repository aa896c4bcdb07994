//! The artifact index facade and its lifecycle.
//!
//! State machine: `Created -> Initialized -> Closed`. Index and search calls
//! are only valid while `Initialized`.
//!
//! RocksDB holds every record durably. Ranking runs against an in-memory
//! Tantivy index that `initialize` rebuilds from a storage scan and every
//! write updates after the record is committed.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use tracing::{debug, info, warn};

use artifact_search::{ArtifactIndexer, ArtifactSearcher, FieldWeights, SearchIndex, SearchOptions};
use artifact_storage::{Storage, StorageError, StorageStats};
use artifact_types::{
    ArtifactRecord, FieldWeightSettings, LedgerRecord, PlanRecord, SearchResult, Settings,
};

use crate::error::IndexError;

/// Where the index lives and how it ranks.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Path of the RocksDB store
    pub db_path: PathBuf,
    /// Limit used by [`ArtifactIndex::search`]
    pub default_limit: usize,
    pub weights: FieldWeightSettings,
}

impl IndexConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            default_limit: artifact_types::config::DEFAULT_SEARCH_LIMIT,
            weights: FieldWeightSettings::default(),
        }
    }

    /// Fixed per-user location (`<config-dir>/artifact-index/context.db`)
    /// unless overridden in settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            db_path: settings.expanded_db_path(),
            default_limit: settings.search.default_limit,
            weights: settings.search.weights.clone(),
        }
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn with_weights(mut self, weights: FieldWeightSettings) -> Self {
        self.weights = weights;
        self
    }
}

/// Observable lifecycle state of an [`ArtifactIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    Created,
    Initialized,
    Closed,
}

/// Durable store plus the search index built from it.
struct Backend {
    storage: Storage,
    indexer: ArtifactIndexer,
    searcher: ArtifactSearcher,
    /// Orders storage commits and search index updates identically
    write_lock: Mutex<()>,
}

impl Backend {
    fn open(config: &IndexConfig) -> Result<Self, IndexError> {
        let storage = Storage::open(&config.db_path)?;

        let search_index = SearchIndex::create_in_ram();
        let reader = search_index.reader()?;
        let indexer = ArtifactIndexer::new(&search_index, reader.clone())?;
        let weights = FieldWeights::new(config.weights.clone());
        let searcher = ArtifactSearcher::new(&search_index, reader, &weights);

        let entries = storage.scan_artifacts()?;
        indexer.rebuild(&entries)?;

        Ok(Self {
            storage,
            indexer,
            searcher,
            write_lock: Mutex::new(()),
        })
    }
}

enum Inner {
    Created,
    Initialized(Arc<Backend>),
    Closed,
}

/// Persistent index of plans and ledgers.
///
/// Owns the backing store exclusively; only one process may use a given
/// path at a time. The handle is `Send + Sync` and meant to be shared via
/// `Arc` by every call site in the process. Dropping an initialized index
/// closes it.
pub struct ArtifactIndex {
    config: IndexConfig,
    inner: RwLock<Inner>,
}

fn lock_error(e: impl std::fmt::Display) -> IndexError {
    IndexError::Storage(StorageError::Lock(e.to_string()))
}

fn validate_id(id: &str) -> Result<(), IndexError> {
    if id.trim().is_empty() {
        return Err(IndexError::Validation(
            "record id must not be empty".to_string(),
        ));
    }
    Ok(())
}

impl ArtifactIndex {
    pub fn new(config: IndexConfig) -> Self {
        Self {
            config,
            inner: RwLock::new(Inner::Created),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(IndexConfig::from_settings(settings))
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn state(&self) -> IndexState {
        match self.inner.read() {
            Ok(inner) => match *inner {
                Inner::Created => IndexState::Created,
                Inner::Initialized(_) => IndexState::Initialized,
                Inner::Closed => IndexState::Closed,
            },
            Err(_) => IndexState::Closed,
        }
    }

    /// Open the backing store and rebuild the search index from it.
    ///
    /// Must be called exactly once before any other operation.
    pub fn initialize(&self) -> Result<(), IndexError> {
        let mut inner = self.inner.write().map_err(lock_error)?;
        match *inner {
            Inner::Created => {
                let backend = Backend::open(&self.config)?;
                *inner = Inner::Initialized(Arc::new(backend));
                info!(path = ?self.config.db_path, "Artifact index initialized");
                Ok(())
            }
            Inner::Initialized(_) => Err(IndexError::Lifecycle(
                "index is already initialized".to_string(),
            )),
            Inner::Closed => Err(IndexError::Lifecycle(
                "index is closed and cannot be re-initialized".to_string(),
            )),
        }
    }

    fn backend(&self) -> Result<Arc<Backend>, IndexError> {
        let inner = self.inner.read().map_err(lock_error)?;
        match &*inner {
            Inner::Initialized(backend) => Ok(backend.clone()),
            Inner::Created => Err(IndexError::Lifecycle(
                "index is not initialized; call initialize() first".to_string(),
            )),
            Inner::Closed => Err(IndexError::Lifecycle("index is closed".to_string())),
        }
    }

    /// Index a plan, replacing any record with the same id.
    pub fn index_plan(&self, record: PlanRecord) -> Result<(), IndexError> {
        self.index_record(ArtifactRecord::Plan(record))
    }

    /// Index a ledger, replacing any record with the same id.
    pub fn index_ledger(&self, record: LedgerRecord) -> Result<(), IndexError> {
        self.index_record(ArtifactRecord::Ledger(record))
    }

    /// Index any record kind.
    pub fn index_record(&self, record: ArtifactRecord) -> Result<(), IndexError> {
        let backend = self.backend()?;
        validate_id(record.id())?;

        let _write = backend.write_lock.lock().map_err(lock_error)?;
        let stored = backend.storage.put_artifact(record)?;
        backend.indexer.upsert(&stored)?;

        debug!(id = %stored.id(), sequence = stored.sequence, "Indexed artifact");
        Ok(())
    }

    /// Search every stored record with the configured default limit.
    pub fn search(&self, query: &str) -> Result<Vec<SearchResult>, IndexError> {
        self.search_with(
            query,
            &SearchOptions::new().with_limit(self.config.default_limit),
        )
    }

    /// Search with an explicit limit and optional type filter.
    pub fn search_with(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>, IndexError> {
        let backend = self.backend()?;
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let hits = backend.searcher.search(query, options)?;

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            match backend.storage.get_artifact(&hit.id)? {
                Some(stored) => results.push(SearchResult::from_stored(&stored, hit.score)),
                None => warn!(id = %hit.id, "Search hit has no stored record"),
            }
        }
        Ok(results)
    }

    /// Read back a stored record.
    pub fn get(&self, id: &str) -> Result<Option<ArtifactRecord>, IndexError> {
        let backend = self.backend()?;
        Ok(backend.storage.get_artifact(id)?.map(|stored| stored.record))
    }

    pub fn stats(&self) -> Result<StorageStats, IndexError> {
        self.backend()?.storage.get_stats().map_err(IndexError::from)
    }

    /// Flush and release the backing store.
    ///
    /// A no-op before `initialize`; a second call fails.
    pub fn close(&self) -> Result<(), IndexError> {
        let mut inner = self.inner.write().map_err(lock_error)?;
        match std::mem::replace(&mut *inner, Inner::Closed) {
            Inner::Created => {
                *inner = Inner::Created;
                Ok(())
            }
            Inner::Initialized(backend) => {
                backend.storage.close()?;
                info!("Artifact index closed");
                Ok(())
            }
            Inner::Closed => Err(IndexError::Lifecycle(
                "index is already closed".to_string(),
            )),
        }
    }
}

impl Drop for ArtifactIndex {
    fn drop(&mut self) {
        if let Ok(inner) = self.inner.get_mut() {
            if let Inner::Initialized(backend) = std::mem::replace(inner, Inner::Closed) {
                if let Err(e) = backend.storage.close() {
                    warn!("Failed to close artifact index on drop: {}", e);
                }
            }
        }
    }
}

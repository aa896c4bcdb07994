//! RocksDB wrapper for artifact storage.
//!
//! Provides:
//! - Database open/close with column family setup and schema check
//! - Upsert-by-id through synchronous write batches
//! - Single-key reads and snapshot scans

use rocksdb::{ColumnFamily, Direction, IteratorMode, Options, WriteBatch, WriteOptions, DB};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};
use tracing::{debug, info};

use artifact_types::{ArtifactKind, ArtifactRecord, StoredArtifact};

use crate::column_families::{build_cf_descriptors, ALL_CF_NAMES, CF_ARTIFACTS, CF_META};
use crate::error::StorageError;
use crate::keys::{decode_u32, decode_u64, ArtifactKey, META_NEXT_SEQUENCE, META_SCHEMA_VERSION};

/// Version of the on-disk layout written by this crate.
pub const SCHEMA_VERSION: u32 = 1;

/// Durable store of artifact records keyed by id.
///
/// The handle is `Send + Sync`. Writes are serialized internally so the
/// write sequence matches commit order; reads run concurrently with writes
/// against a RocksDB snapshot. Only one process may open a given path.
pub struct Storage {
    db: RwLock<Option<DB>>,
    path: PathBuf,
    /// Next write sequence, persisted in the meta column family
    sequence: AtomicU64,
    write_lock: Mutex<()>,
}

fn cf_handle<'a>(db: &'a DB, name: &str) -> Result<&'a ColumnFamily, StorageError> {
    db.cf_handle(name)
        .ok_or_else(|| StorageError::ColumnFamilyNotFound(name.to_string()))
}

impl Storage {
    /// Open storage at the given path, creating it if necessary.
    ///
    /// Fails if the path is unwritable, the store is corrupt, or it was
    /// written with a different schema version.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        info!("Opening artifact storage at {:?}", path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);
        db_opts.set_max_background_jobs(2);

        let db = DB::open_cf_descriptors(&db_opts, path, build_cf_descriptors())?;

        Self::check_schema(&db)?;
        let sequence = Self::load_sequence(&db)?;
        debug!(next_sequence = sequence, "Loaded write sequence");

        Ok(Self {
            db: RwLock::new(Some(db)),
            path: path.to_path_buf(),
            sequence: AtomicU64::new(sequence),
            write_lock: Mutex::new(()),
        })
    }

    /// Verify (or stamp, for a fresh store) the schema version.
    fn check_schema(db: &DB) -> Result<(), StorageError> {
        let meta = cf_handle(db, CF_META)?;

        match db.get_cf(meta, META_SCHEMA_VERSION)? {
            Some(bytes) => {
                let version = decode_u32(&bytes)
                    .map_err(|e| StorageError::IncompatibleSchema(e.to_string()))?;
                if version != SCHEMA_VERSION {
                    return Err(StorageError::IncompatibleSchema(format!(
                        "store has schema version {}, expected {}",
                        version, SCHEMA_VERSION
                    )));
                }
            }
            None => {
                let mut opts = WriteOptions::default();
                opts.set_sync(true);
                db.put_cf_opt(meta, META_SCHEMA_VERSION, SCHEMA_VERSION.to_be_bytes(), &opts)?;
                info!(version = SCHEMA_VERSION, "Initialized new artifact store");
            }
        }
        Ok(())
    }

    fn load_sequence(db: &DB) -> Result<u64, StorageError> {
        let meta = cf_handle(db, CF_META)?;
        match db.get_cf(meta, META_NEXT_SEQUENCE)? {
            Some(bytes) => decode_u64(&bytes),
            None => Ok(0),
        }
    }

    /// Run `f` against the open database, or fail if the store was closed.
    fn with_db<T>(
        &self,
        f: impl FnOnce(&DB) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let guard = self
            .db
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        let db = guard.as_ref().ok_or(StorageError::NotInitialized)?;
        f(db)
    }

    /// Insert or fully replace the record for `record.id()`.
    ///
    /// The write is committed synchronously before returning. Concurrent
    /// writes to the same id are serialized; the later call wins.
    pub fn put_artifact(&self, record: ArtifactRecord) -> Result<StoredArtifact, StorageError> {
        self.with_db(|db| {
            let artifacts = cf_handle(db, CF_ARTIFACTS)?;
            let meta = cf_handle(db, CF_META)?;

            let _write = self
                .write_lock
                .lock()
                .map_err(|e| StorageError::Lock(e.to_string()))?;

            let sequence = self.sequence.load(Ordering::SeqCst);
            let stored = StoredArtifact::new(record, sequence);
            let key = ArtifactKey::new(stored.id());

            let mut batch = WriteBatch::default();
            batch.put_cf(artifacts, key.to_bytes(), stored.to_bytes()?);
            batch.put_cf(meta, META_NEXT_SEQUENCE, (sequence + 1).to_be_bytes());

            let mut opts = WriteOptions::default();
            opts.set_sync(true);
            db.write_opt(batch, &opts)?;

            // Advance only after the batch committed so a failed write
            // leaves no gap between memory and disk.
            self.sequence.store(sequence + 1, Ordering::SeqCst);

            debug!(id = %stored.id(), kind = %stored.record.kind(), sequence, "Stored artifact");
            Ok(stored)
        })
    }

    /// Get a stored artifact by id.
    pub fn get_artifact(&self, id: &str) -> Result<Option<StoredArtifact>, StorageError> {
        self.with_db(|db| {
            let artifacts = cf_handle(db, CF_ARTIFACTS)?;
            match db.get_cf(artifacts, ArtifactKey::new(id).to_bytes())? {
                Some(bytes) => Ok(Some(StoredArtifact::from_bytes(&bytes)?)),
                None => Ok(None),
            }
        })
    }

    /// Read every stored artifact from a single snapshot.
    pub fn scan_artifacts(&self) -> Result<Vec<StoredArtifact>, StorageError> {
        self.with_db(|db| {
            let artifacts = cf_handle(db, CF_ARTIFACTS)?;
            let snapshot = db.snapshot();
            let prefix = ArtifactKey::prefix();

            let iter =
                snapshot.iterator_cf(artifacts, IteratorMode::From(prefix, Direction::Forward));

            let mut results = Vec::new();
            for item in iter {
                let (key, value) = item?;
                if !key.starts_with(prefix) {
                    break;
                }
                results.push(StoredArtifact::from_bytes(&value)?);
            }
            Ok(results)
        })
    }

    /// Flush pending writes and release the database handle.
    ///
    /// Waits for in-flight reads and writes. Closing an already closed
    /// store is a no-op.
    pub fn close(&self) -> Result<(), StorageError> {
        let mut guard = self
            .db
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        if let Some(db) = guard.take() {
            for cf_name in ALL_CF_NAMES {
                if let Some(cf) = db.cf_handle(cf_name) {
                    db.flush_cf(cf)?;
                }
            }
            drop(db);
            info!("Closed artifact storage at {:?}", self.path);
        }
        Ok(())
    }

    #[cfg(test)]
    fn is_open(&self) -> bool {
        self.db.read().map(|guard| guard.is_some()).unwrap_or(false)
    }

    /// Get store statistics.
    pub fn get_stats(&self) -> Result<StorageStats, StorageError> {
        let mut stats = StorageStats::default();

        for stored in self.scan_artifacts()? {
            match stored.record.kind() {
                ArtifactKind::Plan => stats.plan_count += 1,
                ArtifactKind::Ledger => stats.ledger_count += 1,
            }
        }
        stats.next_sequence = self.sequence.load(Ordering::SeqCst);
        stats.disk_usage_bytes = self.get_disk_usage();

        Ok(stats)
    }

    fn get_disk_usage(&self) -> u64 {
        let mut total_size = 0u64;

        if let Ok(entries) = std::fs::read_dir(&self.path) {
            for entry in entries.flatten() {
                if let Ok(metadata) = entry.metadata() {
                    total_size += metadata.len();
                }
            }
        }

        total_size
    }
}

/// Statistics about the store.
#[derive(Debug, Default, Clone)]
pub struct StorageStats {
    /// Number of plan records
    pub plan_count: u64,
    /// Number of ledger records
    pub ledger_count: u64,
    /// Sequence the next write will receive
    pub next_sequence: u64,
    /// Total disk usage in bytes
    pub disk_usage_bytes: u64,
}

impl StorageStats {
    pub fn total(&self) -> u64 {
        self.plan_count + self.ledger_count
    }
}

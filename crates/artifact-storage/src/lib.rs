//! Storage layer for the artifact index.
//!
//! Provides RocksDB-backed storage with:
//! - Column family isolation for records and store metadata
//! - Upsert-by-id with atomic, synchronous write batches
//! - Snapshot scans so readers never observe a torn record
//! - Schema version check on open

pub mod column_families;
pub mod db;
pub mod error;
pub mod keys;

pub use db::{Storage, StorageStats, SCHEMA_VERSION};
pub use error::StorageError;
pub use keys::ArtifactKey;

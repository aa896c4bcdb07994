//! Column family definitions for RocksDB.
//!
//! - artifacts: one entry per record id (point writes, full scans)
//! - meta: schema version and the write sequence counter

use rocksdb::{ColumnFamilyDescriptor, Options};

/// Column family name for artifact records
pub const CF_ARTIFACTS: &str = "artifacts";

/// Column family name for store metadata
pub const CF_META: &str = "meta";

/// All column family names
pub const ALL_CF_NAMES: &[&str] = &[CF_ARTIFACTS, CF_META];

/// Records are small JSON blobs; compress them.
fn artifacts_options() -> Options {
    let mut opts = Options::default();
    opts.set_compression_type(rocksdb::DBCompressionType::Zstd);
    opts
}

/// Build all column family descriptors
pub fn build_cf_descriptors() -> Vec<ColumnFamilyDescriptor> {
    vec![
        ColumnFamilyDescriptor::new(CF_ARTIFACTS, artifacts_options()),
        ColumnFamilyDescriptor::new(CF_META, Options::default()),
    ]
}

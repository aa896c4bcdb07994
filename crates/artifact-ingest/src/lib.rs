//! # artifact-ingest
//!
//! Turns plan and ledger documents on disk into typed records and feeds
//! them to the artifact index.
//!
//! - [`source`]: recognizes artifact paths (`thoughts/shared/plans/*.md`,
//!   `thoughts/ledgers/CONTINUITY_*.md`)
//! - [`extractor`]: pure text -> record extraction, one strategy per kind
//! - [`hook`]: auto-index on file writes and bulk directory re-index

pub mod error;
pub mod extractor;
pub mod hook;
pub mod markdown;
pub mod source;

pub use error::IngestError;
pub use extractor::{LedgerExtractor, PlanExtractor, RecordExtractor};
pub use hook::{AutoIndexer, IngestSummary};
pub use source::{classify_path, ArtifactSource};

//! # artifact-index
//!
//! Single entry point for indexing and recalling plans and ledgers.
//!
//! An [`ArtifactIndex`] is created once per process, initialized, used for
//! any number of index/search calls, and closed:
//!
//! ```no_run
//! use artifact_index::{ArtifactIndex, IndexConfig};
//! use artifact_types::PlanRecord;
//!
//! # fn main() -> Result<(), artifact_index::IndexError> {
//! let index = ArtifactIndex::new(IndexConfig::new("/tmp/artifact-index/context.db"));
//! index.initialize()?;
//! index.index_plan(PlanRecord::new("plan-1", "API Refactoring Plan"))?;
//! let hits = index.search("refactoring")?;
//! index.close()?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod index;

pub use artifact_search::SearchOptions;
pub use error::IndexError;
pub use index::{ArtifactIndex, IndexConfig, IndexState};

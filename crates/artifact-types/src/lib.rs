//! # artifact-types
//!
//! Shared domain types for the Artifact Memory Index.
//!
//! This crate defines the data structures used throughout the workspace:
//! - Records: plans and work-session ledgers written by the assistant
//! - Results: kind-tagged search hits
//! - Settings: layered configuration
//!
//! ## Usage
//!
//! ```rust
//! use artifact_types::{ArtifactRecord, PlanRecord};
//!
//! let plan = PlanRecord::new("plan-1", "API Refactoring Plan");
//! let record = ArtifactRecord::from(plan);
//! assert_eq!(record.id(), "plan-1");
//! ```

pub mod config;
pub mod error;
pub mod record;
pub mod result;

pub use config::{FieldWeightSettings, SearchSettings, Settings};
pub use error::ArtifactError;
pub use record::{ArtifactKind, ArtifactRecord, LedgerRecord, PlanRecord, StoredArtifact};
pub use result::SearchResult;

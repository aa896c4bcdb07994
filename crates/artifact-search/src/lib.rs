//! # artifact-search
//!
//! Full-text relevance ranking for the artifact index using Tantivy.
//!
//! Each plan and ledger field is indexed as its own Tantivy field; a query
//! is tokenized the same way and parsed with per-field boosts taken from
//! the configured weights.
//!
//! ## Features
//! - SimpleTokenizer + LowerCaser shared by fields and queries
//! - Per-field boosts (title/goal highest, file paths lowest) applied at query time
//! - BM25 divided by the square root of record length, zero-score records excluded
//! - Recency tie-break and optional type filter

pub mod document;
pub mod error;
pub mod index;
pub mod indexer;
pub mod schema;
pub mod searcher;
pub mod tokenizer;
pub mod weights;

pub use document::artifact_to_doc;
pub use error::SearchError;
pub use index::SearchIndex;
pub use indexer::ArtifactIndexer;
pub use schema::{build_artifact_schema, ArtifactSchema};
pub use searcher::{ArtifactHit, ArtifactSearcher, SearchOptions, MAX_SEARCH_LIMIT};
pub use tokenizer::{query_terms, tokenize};
pub use weights::FieldWeights;

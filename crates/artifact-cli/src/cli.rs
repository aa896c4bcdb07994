//! CLI argument parsing for `artifact-memory`.
//!
//! CLI flags override every other configuration source.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use artifact_types::ArtifactKind;

/// Artifact Memory
///
/// Searchable memory of plans and session ledgers for coding agents.
#[derive(Parser, Debug)]
#[command(name = "artifact-memory")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/artifact-index/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Override database path
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index artifact files, or directories walked recursively
    Index {
        /// Files or directories to index
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Search indexed plans and ledgers
    Search {
        /// Free-text query
        query: String,

        /// Only return one kind of artifact (plan, ledger)
        #[arg(short = 't', long = "type")]
        kind: Option<ArtifactKind>,

        /// Maximum results (default from config, capped at 50)
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a stored record
    Show {
        /// Record id, e.g. plan-api-refactor
        id: String,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show record counts and store location
    Status,

    /// Handle a tool hook event read from stdin
    ///
    /// Always answers `{"continue":true}` so a failed index never blocks
    /// the agent.
    Hook,
}

//! Artifact Memory
//!
//! Searchable memory of implementation plans and session ledgers.
//!
//! # Usage
//!
//! ```bash
//! artifact-memory index thoughts/
//! artifact-memory search "graphql migration" [--type plan] [--limit N] [--json]
//! artifact-memory show plan-api-refactor [--json]
//! artifact-memory status
//! echo '{"tool_name":"Write","tool_input":{"file_path":"..."}}' | artifact-memory hook
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/artifact-index/config.toml)
//! 3. Environment variables (ARTIFACT_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use artifact_cli::{run, Cli};

fn main() -> Result<()> {
    run(Cli::parse())
}

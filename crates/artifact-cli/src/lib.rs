//! Artifact memory CLI library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (index, search, show, status, hook)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{
    handle_hook, index_paths, load_settings, open_index, run, search, show, show_status,
};

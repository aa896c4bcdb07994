//! Configuration loading for the artifact index.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! Config file lives at `<config-dir>/artifact-index/config.toml`; the store
//! defaults to `<config-dir>/artifact-index/context.db`.

use config::{Config, Environment, File};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ArtifactError;

/// Application name used for the per-user configuration directory.
pub const APP_NAME: &str = "artifact-index";

/// Default number of search results returned to the caller.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Relevance weights for each indexed field.
///
/// Only these keys can be overridden; unknown keys in a config file are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldWeightSettings {
    /// Plan title
    #[serde(default = "default_primary_weight")]
    pub title: f32,

    /// Plan overview
    #[serde(default = "default_overview_weight")]
    pub overview: f32,

    /// Plan approach
    #[serde(default = "default_body_weight")]
    pub approach: f32,

    /// Ledger goal
    #[serde(default = "default_primary_weight")]
    pub goal: f32,

    /// Ledger session name
    #[serde(default = "default_overview_weight")]
    pub session_name: f32,

    /// Ledger current state
    #[serde(default = "default_body_weight")]
    pub state_now: f32,

    /// Ledger key decisions
    #[serde(default = "default_body_weight")]
    pub key_decisions: f32,

    /// Path segments from files read/modified
    #[serde(default = "default_files_weight")]
    pub files: f32,
}

fn default_primary_weight() -> f32 {
    3.0
}

fn default_overview_weight() -> f32 {
    2.0
}

fn default_body_weight() -> f32 {
    1.5
}

fn default_files_weight() -> f32 {
    0.5
}

impl Default for FieldWeightSettings {
    fn default() -> Self {
        Self {
            title: default_primary_weight(),
            overview: default_overview_weight(),
            approach: default_body_weight(),
            goal: default_primary_weight(),
            session_name: default_overview_weight(),
            state_now: default_body_weight(),
            key_decisions: default_body_weight(),
            files: default_files_weight(),
        }
    }
}

impl FieldWeightSettings {
    /// Validate that every weight is finite and non-negative.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("title", self.title),
            ("overview", self.overview),
            ("approach", self.approach),
            ("goal", self.goal),
            ("session_name", self.session_name),
            ("state_now", self.state_now),
            ("key_decisions", self.key_decisions),
            ("files", self.files),
        ];
        for (name, weight) in fields {
            if !weight.is_finite() || weight < 0.0 {
                return Err(format!("weight {} must be >= 0, got {}", name, weight));
            }
        }
        Ok(())
    }
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Results returned when the caller does not pass a limit
    #[serde(default = "default_search_limit")]
    pub default_limit: usize,

    #[serde(default)]
    pub weights: FieldWeightSettings,
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_limit: default_search_limit(),
            weights: FieldWeightSettings::default(),
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path to the RocksDB store
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub search: SearchSettings,
}

fn config_dir() -> PathBuf {
    ProjectDirs::from("", "", APP_NAME)
        .map(|p| p.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".").join(APP_NAME))
}

fn default_db_path() -> String {
    config_dir().join("context.db").to_string_lossy().to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            log_level: default_log_level(),
            search: SearchSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (`<config-dir>/artifact-index/config.toml`)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (`ARTIFACT_DB_PATH`, `ARTIFACT_SEARCH__DEFAULT_LIMIT`, ...)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, ArtifactError> {
        let default_config_path = config_dir().join("config");

        let mut builder = Config::builder()
            .set_default("db_path", default_db_path())
            .map_err(|e| ArtifactError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| ArtifactError::Config(e.to_string()))?
            .set_default("search.default_limit", default_search_limit() as i64)
            .map_err(|e| ArtifactError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Double underscore separates nested keys so `db_path` stays one key.
        builder = builder.add_source(
            Environment::with_prefix("ARTIFACT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| ArtifactError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| ArtifactError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.search.default_limit == 0 {
            return Err(ArtifactError::Config(
                "search.default_limit must be > 0".to_string(),
            ));
        }
        self.search
            .weights
            .validate()
            .map_err(ArtifactError::Config)
    }

    /// Expand `~` in db_path to the user's home directory
    pub fn expanded_db_path(&self) -> PathBuf {
        if let Some(rest) = self.db_path.strip_prefix("~/") {
            if let Some(dirs) = BaseDirs::new() {
                return dirs.home_dir().join(rest);
            }
        }
        PathBuf::from(&self.db_path)
    }
}

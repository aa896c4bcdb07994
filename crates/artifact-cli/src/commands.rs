//! Command implementations for `artifact-memory`.
//!
//! Handles:
//! - index: extract and upsert artifact files
//! - search / show: read back ranked results and stored records
//! - status: record counts and store location
//! - hook: fail-open auto-index for tool events on stdin

use std::io::{BufRead, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use backoff::{backoff::Backoff, ExponentialBackoff};
use serde::Deserialize;
use tracing::{debug, info, warn};

use artifact_index::{ArtifactIndex, SearchOptions};
use artifact_ingest::AutoIndexer;
use artifact_types::{ArtifactKind, ArtifactRecord, SearchResult, Settings};

use crate::cli::{Cli, Commands};

/// Response the agent expects from every hook invocation.
pub const HOOK_CONTINUE: &str = r#"{"continue":true}"#;

/// How long a hook waits for another process to release the store.
pub const HOOK_OPEN_TIMEOUT: Duration = Duration::from_secs(5);

/// Load configuration and apply CLI overrides (highest precedence).
pub fn load_settings(
    config_path: Option<&str>,
    db_path_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;

    if let Some(db_path) = db_path_override {
        settings.db_path = db_path.to_string();
    }
    if let Some(log_level) = log_level_override {
        settings.log_level = log_level.to_string();
    }

    Ok(settings)
}

/// Install the tracing subscriber. Logs go to stderr so stdout stays clean
/// for results and hook responses.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Open and initialize the index described by `settings`.
pub fn open_index(settings: &Settings) -> Result<Arc<ArtifactIndex>> {
    let index = ArtifactIndex::from_settings(settings);
    index
        .initialize()
        .with_context(|| format!("Failed to open index at {}", settings.db_path))?;
    Ok(Arc::new(index))
}

/// Open the index, retrying with exponential backoff while another process
/// holds the store lock.
///
/// Any other failure is returned immediately.
pub fn open_index_with_retry(
    settings: &Settings,
    max_elapsed: Duration,
) -> Result<Arc<ArtifactIndex>> {
    let mut backoff = ExponentialBackoff {
        current_interval: Duration::from_millis(50),
        initial_interval: Duration::from_millis(50),
        max_interval: Duration::from_secs(1),
        max_elapsed_time: Some(max_elapsed),
        ..Default::default()
    };

    let index = ArtifactIndex::from_settings(settings);
    let mut attempts = 0;

    loop {
        attempts += 1;
        let err = match index.initialize() {
            Ok(()) => return Ok(Arc::new(index)),
            Err(e) if e.is_lock_contention() => e,
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to open index at {}", settings.db_path));
            }
        };

        match backoff.next_backoff() {
            Some(duration) => {
                debug!(
                    attempt = attempts,
                    retry_in_ms = duration.as_millis(),
                    "Index store is locked, retrying"
                );
                std::thread::sleep(duration);
            }
            None => {
                return Err(err).with_context(|| {
                    format!(
                        "Index at {} still locked after {} attempts",
                        settings.db_path, attempts
                    )
                });
            }
        }
    }
}

/// Dispatch a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(
        cli.config.as_deref(),
        cli.db_path.as_deref(),
        cli.log_level.as_deref(),
    )?;
    init_logging(&settings)?;
    debug!(db_path = %settings.db_path, "Configuration loaded");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Commands::Hook = cli.command {
        let stdin = std::io::stdin();
        handle_hook(&settings, stdin.lock(), &mut out);
        return Ok(());
    }

    let index = open_index(&settings)?;
    let result = match cli.command {
        Commands::Index { paths } => index_paths(&index, &paths, &mut out),
        Commands::Search {
            query,
            kind,
            limit,
            json,
        } => {
            let options = search_options(&settings, kind, limit);
            search(&index, &query, &options, json, &mut out)
        }
        Commands::Show { id, json } => show(&index, &id, json, &mut out),
        Commands::Status => show_status(&index, &mut out),
        Commands::Hook => Ok(()),
    };

    index.close().context("Failed to close index")?;
    result
}

/// Options for a CLI search: configured default limit unless overridden.
pub fn search_options(
    settings: &Settings,
    kind: Option<ArtifactKind>,
    limit: Option<usize>,
) -> SearchOptions {
    let options = SearchOptions::new().with_limit(limit.unwrap_or(settings.search.default_limit));
    match kind {
        Some(kind) => options.with_kind(kind),
        None => options,
    }
}

/// Index each path; directories are walked for recognized artifacts.
pub fn index_paths(
    index: &Arc<ArtifactIndex>,
    paths: &[PathBuf],
    out: &mut impl Write,
) -> Result<()> {
    let indexer = AutoIndexer::new(Arc::clone(index));

    for path in paths {
        if path.is_dir() {
            let summary = indexer
                .index_directory(path)
                .with_context(|| format!("Failed to index {}", path.display()))?;
            writeln!(
                out,
                "{}: indexed {}, skipped {}, failed {}",
                path.display(),
                summary.indexed,
                summary.skipped,
                summary.failed
            )?;
            continue;
        }

        match indexer
            .on_file_written(path)
            .with_context(|| format!("Failed to index {}", path.display()))?
        {
            Some(record) => writeln!(out, "Indexed {} ({})", record.id(), path.display())?,
            None => writeln!(out, "Skipped {} (not a plan or ledger)", path.display())?,
        }
    }

    Ok(())
}

pub fn search(
    index: &ArtifactIndex,
    query: &str,
    options: &SearchOptions,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let results = index.search_with(query, options).context("Search failed")?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &results)?;
        writeln!(out)?;
        return Ok(());
    }

    if results.is_empty() {
        writeln!(out, "No matching artifacts")?;
        return Ok(());
    }
    for (rank, result) in results.iter().enumerate() {
        write_result(out, rank + 1, result)?;
    }
    Ok(())
}

fn write_result(out: &mut impl Write, rank: usize, result: &SearchResult) -> Result<()> {
    writeln!(
        out,
        "{}. [{}] {} ({:.3})",
        rank, result.kind, result.title, result.score
    )?;
    writeln!(out, "   id:   {}", result.id)?;
    if !result.file_path.is_empty() {
        writeln!(out, "   file: {}", result.file_path)?;
    }
    if !result.summary.is_empty() {
        writeln!(out, "   {}", result.summary)?;
    }
    Ok(())
}

pub fn show(index: &ArtifactIndex, id: &str, json: bool, out: &mut impl Write) -> Result<()> {
    let record = index
        .get(id)
        .context("Lookup failed")?
        .with_context(|| format!("No artifact with id {}", id))?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &record)?;
        writeln!(out)?;
        return Ok(());
    }

    match &record {
        ArtifactRecord::Plan(plan) => {
            writeln!(out, "Plan: {}", plan.title)?;
            writeln!(out, "ID: {}", plan.id)?;
            writeln!(out, "File: {}", plan.file_path)?;
            write_section(out, "Overview", &plan.overview)?;
            write_section(out, "Approach", &plan.approach)?;
        }
        ArtifactRecord::Ledger(ledger) => {
            writeln!(out, "Ledger: {}", ledger.session_name)?;
            writeln!(out, "ID: {}", ledger.id)?;
            writeln!(out, "File: {}", ledger.file_path)?;
            write_section(out, "Goal", &ledger.goal)?;
            write_section(out, "Now", &ledger.state_now)?;
            write_section(out, "Key Decisions", &ledger.key_decisions)?;
            write_section(out, "Files Read", &ledger.files_read.join("\n"))?;
            write_section(out, "Files Modified", &ledger.files_modified.join("\n"))?;
        }
    }
    Ok(())
}

fn write_section(out: &mut impl Write, heading: &str, body: &str) -> Result<()> {
    if !body.is_empty() {
        writeln!(out, "\n{}:\n{}", heading, body)?;
    }
    Ok(())
}

pub fn show_status(index: &ArtifactIndex, out: &mut impl Write) -> Result<()> {
    let stats = index.stats().context("Failed to read index stats")?;

    writeln!(out, "Artifact index: {}", index.config().db_path.display())?;
    writeln!(out, "  Plans:      {}", stats.plan_count)?;
    writeln!(out, "  Ledgers:    {}", stats.ledger_count)?;
    writeln!(out, "  Next seq:   {}", stats.next_sequence)?;
    writeln!(out, "  Disk usage: {} bytes", stats.disk_usage_bytes)?;
    Ok(())
}

/// Tool event as delivered by the agent's hook runner.
#[derive(Debug, Deserialize)]
struct ToolEvent {
    #[serde(default, alias = "tool")]
    tool_name: String,
    #[serde(default)]
    tool_input: Option<ToolInput>,
}

#[derive(Debug, Deserialize)]
struct ToolInput {
    #[serde(default, alias = "path")]
    file_path: Option<String>,
}

/// Read one tool event from `input` and auto-index the written file.
///
/// Never fails: every error is logged and the continue response is still
/// written.
pub fn handle_hook(settings: &Settings, mut input: impl BufRead, out: &mut impl Write) {
    if let Err(e) = process_hook(settings, &mut input) {
        warn!(error = %e, "Hook processing failed");
    }
    if let Err(e) = writeln!(out, "{}", HOOK_CONTINUE) {
        warn!(error = %e, "Failed to write hook response");
    }
}

fn process_hook(settings: &Settings, input: &mut impl BufRead) -> Result<()> {
    let mut raw = String::new();
    input.read_to_string(&mut raw).context("Failed to read hook event")?;
    if raw.trim().is_empty() {
        return Ok(());
    }

    let event: ToolEvent = serde_json::from_str(&raw).context("Invalid hook event")?;
    let file_path = event.tool_input.and_then(|input| input.file_path);

    if !event
        .tool_name
        .eq_ignore_ascii_case(artifact_ingest::hook::WRITE_TOOL)
        || file_path.is_none()
    {
        debug!(tool = %event.tool_name, "Ignoring tool event");
        return Ok(());
    }

    let index = open_index_with_retry(settings, HOOK_OPEN_TIMEOUT)?;
    let indexer = AutoIndexer::new(Arc::clone(&index));
    if let Some(record) = indexer.handle_tool_event(&event.tool_name, file_path.as_deref()) {
        info!(id = %record.id(), "Auto-indexed artifact");
    }
    index.close().context("Failed to close index")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Instant;
    use tempfile::TempDir;

    fn settings_in(dir: &TempDir) -> Settings {
        Settings {
            db_path: dir.path().join("context.db").to_string_lossy().to_string(),
            ..Settings::default()
        }
    }

    fn write_plan(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("thoughts/shared/plans/api-refactor.md");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            "# API Refactoring Plan\n\n## Overview\nRefactor REST API to GraphQL\n",
        )
        .unwrap();
        path
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    fn write_event(path: &std::path::Path) -> String {
        serde_json::json!({
            "hook_event_name": "PostToolUse",
            "tool_name": "Write",
            "tool_input": { "file_path": path.to_string_lossy() }
        })
        .to_string()
    }

    #[test]
    fn test_search_options_defaults_from_settings() {
        let mut settings = Settings::default();
        settings.search.default_limit = 7;

        let options = search_options(&settings, None, None);
        assert_eq!(options.limit, 7);
        assert_eq!(options.kind, None);

        let options = search_options(&settings, Some(ArtifactKind::Ledger), Some(3));
        assert_eq!(options.limit, 3);
        assert_eq!(options.kind, Some(ArtifactKind::Ledger));
    }

    #[test]
    fn test_index_then_search_and_show() {
        let dir = TempDir::new().unwrap();
        let index = open_index(&settings_in(&dir)).unwrap();
        let plan = write_plan(&dir);

        let mut buf = Vec::new();
        index_paths(&index, &[plan], &mut buf).unwrap();
        assert!(output(buf).contains("Indexed plan-api-refactor"));

        let mut buf = Vec::new();
        search(&index, "graphql", &SearchOptions::new(), false, &mut buf).unwrap();
        let text = output(buf);
        assert!(text.starts_with("1. [plan] API Refactoring Plan"));
        assert!(text.contains("id:   plan-api-refactor"));

        let mut buf = Vec::new();
        show(&index, "plan-api-refactor", false, &mut buf).unwrap();
        let text = output(buf);
        assert!(text.contains("Plan: API Refactoring Plan"));
        assert!(text.contains("Refactor REST API to GraphQL"));

        assert!(show(&index, "plan-missing", false, &mut Vec::new()).is_err());
    }

    #[test]
    fn test_search_json_output() {
        let dir = TempDir::new().unwrap();
        let index = open_index(&settings_in(&dir)).unwrap();
        index_paths(&index, &[write_plan(&dir)], &mut Vec::new()).unwrap();

        let mut buf = Vec::new();
        search(&index, "graphql", &SearchOptions::new(), true, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        let results = value.as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["type"], "plan");
        assert_eq!(results[0]["id"], "plan-api-refactor");
    }

    #[test]
    fn test_search_no_results() {
        let dir = TempDir::new().unwrap();
        let index = open_index(&settings_in(&dir)).unwrap();

        let mut buf = Vec::new();
        search(&index, "anything", &SearchOptions::new(), false, &mut buf).unwrap();
        assert_eq!(output(buf), "No matching artifacts\n");
    }

    #[test]
    fn test_index_directory_and_status() {
        let dir = TempDir::new().unwrap();
        let index = open_index(&settings_in(&dir)).unwrap();
        write_plan(&dir);
        let ledger = dir.path().join("thoughts/ledgers/CONTINUITY_db.md");
        fs::create_dir_all(ledger.parent().unwrap()).unwrap();
        fs::write(&ledger, "## Goal\nMigrate to PostgreSQL\n").unwrap();

        let mut buf = Vec::new();
        index_paths(&index, &[dir.path().join("thoughts")], &mut buf).unwrap();
        assert!(output(buf).contains("indexed 2, skipped 0, failed 0"));

        let mut buf = Vec::new();
        show_status(&index, &mut buf).unwrap();
        let text = output(buf);
        assert!(text.contains("Plans:      1"));
        assert!(text.contains("Ledgers:    1"));
    }

    #[test]
    fn test_hook_indexes_written_plan() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir);
        let event = write_event(&write_plan(&dir));

        let mut buf = Vec::new();
        handle_hook(&settings, event.as_bytes(), &mut buf);
        assert_eq!(output(buf).trim(), HOOK_CONTINUE);

        let index = open_index(&settings).unwrap();
        assert_eq!(index.search("graphql").unwrap().len(), 1);
    }

    #[test]
    fn test_hook_is_fail_open() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir);

        for input in ["not json", "", r#"{"tool_name":"Read"}"#] {
            let mut buf = Vec::new();
            handle_hook(&settings, input.as_bytes(), &mut buf);
            assert_eq!(output(buf).trim(), HOOK_CONTINUE);
        }
    }

    #[test]
    fn test_hook_waits_for_store_held_elsewhere() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir);
        let event = write_event(&write_plan(&dir));

        let holder = open_index(&settings).unwrap();
        let hook = {
            let settings = settings.clone();
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                handle_hook(&settings, event.as_bytes(), &mut buf);
                output(buf)
            })
        };

        std::thread::sleep(Duration::from_millis(300));
        holder.close().unwrap();

        assert_eq!(hook.join().unwrap().trim(), HOOK_CONTINUE);
        let index = open_index(&settings).unwrap();
        let results = index.search("graphql").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "plan-api-refactor");
    }

    #[test]
    fn test_open_retry_gives_up_after_deadline() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir);
        let _holder = open_index(&settings).unwrap();

        let started = Instant::now();
        let Err(err) = open_index_with_retry(&settings, Duration::from_millis(200)) else {
            panic!("opened a store held by another owner");
        };
        assert!(err.to_string().contains("still locked"));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_open_retry_does_not_retry_other_failures() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("context.db");
        fs::write(&path, b"not a database").unwrap();
        let settings = Settings {
            db_path: path.to_string_lossy().to_string(),
            ..Settings::default()
        };

        let Err(err) = open_index_with_retry(&settings, Duration::from_secs(30)) else {
            panic!("opened a regular file as a store");
        };
        assert!(err.to_string().contains("Failed to open index"));
    }
}

//! End-to-end workflow: agent writes documents, hook indexes them, a later
//! session recalls them through search.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use artifact_cli::commands::{handle_hook, index_paths, open_index, search, HOOK_CONTINUE};
use artifact_index::SearchOptions;
use artifact_types::{ArtifactKind, Settings};

struct Workspace {
    dir: TempDir,
    settings: Settings,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let settings = Settings {
            db_path: dir.path().join("store/context.db").to_string_lossy().to_string(),
            ..Settings::default()
        };
        Self { dir, settings }
    }

    fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn hook_write(&self, path: &Path) {
        let event = serde_json::json!({
            "hook_event_name": "PostToolUse",
            "tool_name": "Write",
            "tool_input": { "file_path": path.to_string_lossy() },
        })
        .to_string();

        let mut out = Vec::new();
        handle_hook(&self.settings, event.as_bytes(), &mut out);
        assert_eq!(String::from_utf8(out).unwrap().trim(), HOOK_CONTINUE);
    }
}

#[test]
fn test_hook_writes_are_recalled_by_later_session() {
    let ws = Workspace::new();

    let plan = ws.write(
        "thoughts/shared/plans/2024-01-15-api-refactor.md",
        "# API Refactoring Plan\n\n## Overview\nRefactor REST API to GraphQL\n\n\
         ## Approach\nIncremental migration\n",
    );
    let ledger = ws.write(
        "thoughts/ledgers/CONTINUITY_database-migration.md",
        "## Goal\nMigrate from MySQL to PostgreSQL\n\n\
         ## State\n- Now: Schema conversion in progress\n\n\
         ## File Operations\n### Modified\n- `src/db/config.ts`\n",
    );
    ws.hook_write(&plan);
    ws.hook_write(&ledger);

    // New process, same store.
    let index = open_index(&ws.settings).unwrap();

    let results = index.search("graphql").unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "plan-2024-01-15-api-refactor");

    let results = index
        .search_with("config", &SearchOptions::new().with_kind(ArtifactKind::Ledger))
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "ledger-database-migration");
    assert_eq!(results[0].summary, "Migrate from MySQL to PostgreSQL");
}

#[test]
fn test_bulk_index_then_json_search() {
    let ws = Workspace::new();
    for (name, title) in [("auth", "OAuth Login"), ("cache", "Redis Cache Layer")] {
        ws.write(
            &format!("thoughts/shared/plans/{}.md", name),
            &format!("# {}\n\n## Overview\n{} work\n", title, name),
        );
    }
    ws.write("thoughts/shared/handoffs/old.md", "# OAuth handoff\n");

    let index = open_index(&ws.settings).unwrap();
    let mut out = Vec::new();
    index_paths(&index, &[ws.dir.path().join("thoughts")], &mut out).unwrap();
    assert!(String::from_utf8(out)
        .unwrap()
        .contains("indexed 2, skipped 1, failed 0"));

    let mut out = Vec::new();
    search(&index, "oauth", &SearchOptions::new(), true, &mut out).unwrap();
    let results: Vec<serde_json::Value> = serde_json::from_slice(&out).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], "plan-auth");
    assert_eq!(results[0]["title"], "OAuth Login");
}

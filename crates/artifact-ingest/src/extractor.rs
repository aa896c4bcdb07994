//! Record extraction strategies.
//!
//! An extractor is a pure function from document text to a typed record.
//! Missing sections produce empty fields; extraction never fails.

use artifact_types::{ArtifactKind, ArtifactRecord, LedgerRecord, PlanRecord};

use crate::markdown::{bullet_items, first_line, labeled_bullet, section, title};
use crate::source::ArtifactSource;

/// Strategy turning one kind of document into a record.
///
/// Implement this to support another document shape without touching the
/// storage or ranking engines.
pub trait RecordExtractor: Send + Sync {
    /// Kind of record this extractor produces.
    fn kind(&self) -> ArtifactKind;

    /// Build a record from raw document text.
    fn extract(&self, content: &str, source: &ArtifactSource) -> ArtifactRecord;
}

/// Plans: `# Title`, `## Overview`, `## Approach`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanExtractor;

impl RecordExtractor for PlanExtractor {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Plan
    }

    fn extract(&self, content: &str, source: &ArtifactSource) -> ArtifactRecord {
        let plan = PlanRecord::new(
            source.record_id(),
            title(content).unwrap_or_else(|| source.name.clone()),
        )
        .with_file_path(source.path_str())
        .with_overview(section(content, 2, "Overview").unwrap_or_default())
        .with_approach(section(content, 2, "Approach").unwrap_or_default());

        ArtifactRecord::Plan(plan)
    }
}

/// Ledgers: `## Goal`, `- Now:`, `## Key Decisions`, and
/// `## File Operations` with `### Read` / `### Modified` bullet lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerExtractor;

impl RecordExtractor for LedgerExtractor {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Ledger
    }

    fn extract(&self, content: &str, source: &ArtifactSource) -> ArtifactRecord {
        let file_ops = section(content, 2, "File Operations").unwrap_or_default();
        let files_read = section(&file_ops, 3, "Read")
            .map(|body| bullet_items(&body))
            .unwrap_or_default();
        let files_modified = section(&file_ops, 3, "Modified")
            .map(|body| bullet_items(&body))
            .unwrap_or_default();

        let ledger = LedgerRecord::new(source.record_id(), source.name.clone())
            .with_file_path(source.path_str())
            .with_goal(
                section(content, 2, "Goal")
                    .map(|body| first_line(&body))
                    .unwrap_or_default(),
            )
            .with_state_now(labeled_bullet(content, "Now").unwrap_or_default())
            .with_key_decisions(section(content, 2, "Key Decisions").unwrap_or_default())
            .with_files_read(files_read)
            .with_files_modified(files_modified);

        ArtifactRecord::Ledger(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PLAN: &str = "\
# API Refactoring Plan

## Overview

Refactor REST API to GraphQL.

## Approach

Incremental migration with adapter layer.

## Risks

Schema drift.
";

    const LEDGER: &str = "\
# Session: database-migration
Updated: 2024-01-15

## Goal
Migrate from MySQL to PostgreSQL
Success: all tables converted

## State
- Done: Dumped schema
- Now: Schema conversion in progress
- Next: Data copy

## Key Decisions
- Use pgloader for data migration
- Keep MySQL read-only during cutover

## File Operations
### Read
- `src/db/schema.ts`
- `src/db/migrations/001.sql`

### Modified
- `src/db/config.ts`
";

    #[test]
    fn test_extract_plan() {
        let source = ArtifactSource::new(ArtifactKind::Plan, "api-refactor", "/t/plan.md");
        let record = PlanExtractor.extract(PLAN, &source);

        match record {
            ArtifactRecord::Plan(plan) => {
                assert_eq!(plan.id, "plan-api-refactor");
                assert_eq!(plan.title, "API Refactoring Plan");
                assert_eq!(plan.overview, "Refactor REST API to GraphQL.");
                assert_eq!(plan.approach, "Incremental migration with adapter layer.");
                assert_eq!(plan.file_path, "/t/plan.md");
            }
            other => panic!("expected plan, got {:?}", other),
        }
    }

    #[test]
    fn test_plan_without_sections_falls_back_to_slug() {
        let source = ArtifactSource::new(ArtifactKind::Plan, "scratch", "/t/scratch.md");
        let record = PlanExtractor.extract("just some notes", &source);

        match record {
            ArtifactRecord::Plan(plan) => {
                assert_eq!(plan.title, "scratch");
                assert_eq!(plan.overview, "");
                assert_eq!(plan.approach, "");
            }
            other => panic!("expected plan, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_ledger() {
        let source = ArtifactSource::new(ArtifactKind::Ledger, "database-migration", "/t/l.md");
        let record = LedgerExtractor.extract(LEDGER, &source);

        match record {
            ArtifactRecord::Ledger(ledger) => {
                assert_eq!(ledger.id, "ledger-database-migration");
                assert_eq!(ledger.session_name, "database-migration");
                assert_eq!(ledger.goal, "Migrate from MySQL to PostgreSQL");
                assert_eq!(ledger.state_now, "Schema conversion in progress");
                assert!(ledger.key_decisions.contains("pgloader"));
                assert!(ledger.key_decisions.contains("read-only"));
                assert_eq!(
                    ledger.files_read,
                    vec!["src/db/schema.ts", "src/db/migrations/001.sql"]
                );
                assert_eq!(ledger.files_modified, vec!["src/db/config.ts"]);
            }
            other => panic!("expected ledger, got {:?}", other),
        }
    }

    #[test]
    fn test_ledger_missing_sections_are_empty() {
        let source = ArtifactSource::new(ArtifactKind::Ledger, "bare", "/t/bare.md");
        let record = LedgerExtractor.extract("## Goal\nShip it\n", &source);

        match record {
            ArtifactRecord::Ledger(ledger) => {
                assert_eq!(ledger.goal, "Ship it");
                assert_eq!(ledger.state_now, "");
                assert_eq!(ledger.key_decisions, "");
                assert!(ledger.files_read.is_empty());
                assert!(ledger.files_modified.is_empty());
            }
            other => panic!("expected ledger, got {:?}", other),
        }
    }
}

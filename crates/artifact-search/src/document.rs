//! Conversion from stored artifacts to Tantivy documents.

use tantivy::schema::Field;
use tantivy::TantivyDocument;

use artifact_types::{ArtifactRecord, StoredArtifact};

use crate::schema::ArtifactSchema;
use crate::tokenizer::tokenize;

/// Searchable text of a record, paired with the field it is indexed under.
///
/// File paths yield one entry per path. Empty fields are skipped.
pub fn field_texts<'a>(
    schema: &ArtifactSchema,
    record: &'a ArtifactRecord,
) -> Vec<(Field, &'a str)> {
    let mut texts: Vec<(Field, &'a str)> = match record {
        ArtifactRecord::Plan(plan) => vec![
            (schema.title, plan.title.as_str()),
            (schema.overview, plan.overview.as_str()),
            (schema.approach, plan.approach.as_str()),
        ],
        ArtifactRecord::Ledger(ledger) => {
            let mut texts = vec![
                (schema.goal, ledger.goal.as_str()),
                (schema.session_name, ledger.session_name.as_str()),
                (schema.state_now, ledger.state_now.as_str()),
                (schema.key_decisions, ledger.key_decisions.as_str()),
            ];
            let paths = ledger.files_read.iter().chain(ledger.files_modified.iter());
            texts.extend(paths.map(|path| (schema.files, path.as_str())));
            texts
        }
    };
    texts.retain(|(_, text)| !text.trim().is_empty());
    texts
}

/// Convert a stored artifact to a Tantivy document.
///
/// `length` is the token count over every searchable field.
pub fn artifact_to_doc(schema: &ArtifactSchema, stored: &StoredArtifact) -> TantivyDocument {
    let mut doc = TantivyDocument::default();
    doc.add_text(schema.id, stored.id());
    doc.add_text(schema.kind, stored.record.kind().as_str());

    let mut length = 0u64;
    for (field, text) in field_texts(schema, &stored.record) {
        length += tokenize(text).len() as u64;
        doc.add_text(field, text);
    }

    doc.add_u64(schema.sequence, stored.sequence);
    doc.add_u64(schema.length, length);
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::build_artifact_schema;
    use artifact_types::{LedgerRecord, PlanRecord};
    use tantivy::schema::Value;

    #[test]
    fn test_plan_to_doc() {
        let schema = build_artifact_schema();
        let stored = StoredArtifact::new(
            ArtifactRecord::from(
                PlanRecord::new("plan-1", "GraphQL Plan")
                    .with_overview("Move to GraphQL")
                    .with_approach("adapter layer"),
            ),
            4,
        );

        let doc = artifact_to_doc(&schema, &stored);

        let id = doc.get_first(schema.id).and_then(|v| v.as_str());
        assert_eq!(id, Some("plan-1"));
        let kind = doc.get_first(schema.kind).and_then(|v| v.as_str());
        assert_eq!(kind, Some("plan"));
        assert_eq!(doc.get_first(schema.sequence).and_then(|v| v.as_u64()), Some(4));
        assert_eq!(doc.get_first(schema.length).and_then(|v| v.as_u64()), Some(7));
        assert!(doc.get_first(schema.goal).is_none());
    }

    #[test]
    fn test_ledger_paths_are_separate_values() {
        let schema = build_artifact_schema();
        let record = ArtifactRecord::from(
            LedgerRecord::new("ledger-1", "feature-work")
                .with_goal("Implement new feature")
                .with_files_read(["src/a.ts"])
                .with_files_modified(["src/db/config.ts"]),
        );

        let files: Vec<&str> = field_texts(&schema, &record)
            .into_iter()
            .filter(|(field, _)| *field == schema.files)
            .map(|(_, text)| text)
            .collect();
        assert_eq!(files, vec!["src/a.ts", "src/db/config.ts"]);

        let doc = artifact_to_doc(&schema, &StoredArtifact::new(record, 0));
        // goal 3 + session 2 + paths 3 + 4
        assert_eq!(doc.get_first(schema.length).and_then(|v| v.as_u64()), Some(12));
    }

    #[test]
    fn test_empty_fields_are_skipped() {
        let schema = build_artifact_schema();
        let record = ArtifactRecord::from(LedgerRecord::new("ledger-empty", ""));
        assert!(field_texts(&schema, &record).is_empty());

        let doc = artifact_to_doc(&schema, &StoredArtifact::new(record, 0));
        assert_eq!(doc.get_first(schema.length).and_then(|v| v.as_u64()), Some(0));
    }
}

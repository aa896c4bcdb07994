//! Tantivy schema for plan and ledger artifacts.
//!
//! Every weighted record field gets its own text field so the query parser
//! can boost it independently. File paths share one multi-valued field.

use tantivy::schema::{
    Field, IndexRecordOption, NumericOptions, Schema, TextFieldIndexing, TextOptions, STORED,
    STRING,
};

use crate::tokenizer::ARTIFACT_TOKENIZER;

/// Fast field holding the store write sequence (recency tie-break)
pub const SEQUENCE_FIELD: &str = "sequence";

/// Fast field holding the record's total token count
pub const LENGTH_FIELD: &str = "length";

/// Schema field handles for efficient access
#[derive(Debug, Clone)]
pub struct ArtifactSchema {
    schema: Schema,
    /// Record id, the upsert key (STRING | STORED)
    pub id: Field,
    /// "plan" or "ledger" (STRING)
    pub kind: Field,
    pub title: Field,
    pub overview: Field,
    pub approach: Field,
    pub goal: Field,
    pub session_name: Field,
    pub state_now: Field,
    pub key_decisions: Field,
    /// One value per file read or modified
    pub files: Field,
    pub sequence: Field,
    pub length: Field,
}

impl ArtifactSchema {
    /// Get the underlying Tantivy schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

fn text_options() -> TextOptions {
    let indexing = TextFieldIndexing::default()
        .set_tokenizer(ARTIFACT_TOKENIZER)
        .set_index_option(IndexRecordOption::WithFreqsAndPositions);
    TextOptions::default().set_indexing_options(indexing)
}

/// Build the artifact search schema.
///
/// Schema fields:
/// - id: STRING | STORED - primary key
/// - kind: STRING - type filter
/// - title, overview, approach: plan text
/// - goal, session_name, state_now, key_decisions: ledger text
/// - files: path segments of files read or modified
/// - sequence, length: FAST u64 used when ranking
pub fn build_artifact_schema() -> ArtifactSchema {
    let mut schema_builder = Schema::builder();

    let id = schema_builder.add_text_field("id", STRING | STORED);
    let kind = schema_builder.add_text_field("kind", STRING);

    let title = schema_builder.add_text_field("title", text_options());
    let overview = schema_builder.add_text_field("overview", text_options());
    let approach = schema_builder.add_text_field("approach", text_options());

    let goal = schema_builder.add_text_field("goal", text_options());
    let session_name = schema_builder.add_text_field("session_name", text_options());
    let state_now = schema_builder.add_text_field("state_now", text_options());
    let key_decisions = schema_builder.add_text_field("key_decisions", text_options());

    let files = schema_builder.add_text_field("files", text_options());

    let sequence =
        schema_builder.add_u64_field(SEQUENCE_FIELD, NumericOptions::default().set_fast());
    let length = schema_builder.add_u64_field(LENGTH_FIELD, NumericOptions::default().set_fast());

    ArtifactSchema {
        schema: schema_builder.build(),
        id,
        kind,
        title,
        overview,
        approach,
        goal,
        session_name,
        state_now,
        key_decisions,
        files,
        sequence,
        length,
    }
}

//! Search implementation using field-boosted BM25 scoring.
//!
//! The BM25 score is divided by the square root of the record's token count,
//! so a short record that matches beats a long one that mentions the term in
//! passing. Equal scores are ordered most recently indexed first.

use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, ConstScoreQuery, Occur, Query, QueryParser, TermQuery};
use tantivy::schema::{IndexRecordOption, Value};
use tantivy::{DocId, IndexReader, Score, SegmentReader, TantivyDocument, Term};
use tracing::{debug, info};

use artifact_types::config::DEFAULT_SEARCH_LIMIT;
use artifact_types::ArtifactKind;

use crate::error::SearchError;
use crate::index::SearchIndex;
use crate::schema::{ArtifactSchema, LENGTH_FIELD, SEQUENCE_FIELD};
use crate::tokenizer::query_terms;
use crate::weights::FieldWeights;

/// Upper bound on results per query, keeps responses compact for an LLM context.
pub const MAX_SEARCH_LIMIT: usize = 50;

/// Search options for filtering and limiting results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Filter by record kind (None = all kinds)
    pub kind: Option<ArtifactKind>,
    /// Maximum results to return; 0 means the default
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self {
            kind: None,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_kind(mut self, kind: ArtifactKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn plans_only() -> Self {
        Self::new().with_kind(ArtifactKind::Plan)
    }

    pub fn ledgers_only() -> Self {
        Self::new().with_kind(ArtifactKind::Ledger)
    }

    /// Limit actually applied: 0 falls back to the default, large values are capped.
    pub fn effective_limit(&self) -> usize {
        match self.limit {
            0 => DEFAULT_SEARCH_LIMIT,
            n => n.min(MAX_SEARCH_LIMIT),
        }
    }
}

/// A ranked document id.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactHit {
    pub id: String,
    /// BM25 score divided by the square root of the record's token count
    pub score: f32,
}

/// Searcher over the artifact index.
pub struct ArtifactSearcher {
    reader: IndexReader,
    schema: ArtifactSchema,
    /// None when every field weight is zero
    query_parser: Option<QueryParser>,
}

impl ArtifactSearcher {
    /// Create a searcher that boosts each field by its configured weight.
    pub fn new(index: &SearchIndex, reader: IndexReader, weights: &FieldWeights) -> Self {
        let boosts = weights.boosts(index.schema());
        let query_parser = (!boosts.is_empty()).then(|| {
            let fields = boosts.iter().map(|(field, _)| *field).collect();
            let mut parser = QueryParser::for_index(index.index(), fields);
            for (field, boost) in &boosts {
                parser.set_field_boost(*field, *boost);
            }
            parser
        });

        Self {
            reader,
            schema: index.schema().clone(),
            query_parser,
        }
    }

    /// Rank indexed artifacts against `query`.
    ///
    /// A query without tokens yields no results. Only records matching at
    /// least one query token are collected.
    pub fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<ArtifactHit>, SearchError> {
        let tokens = query_terms(query);
        let Some(parser) = &self.query_parser else {
            return Ok(Vec::new());
        };
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        // Tokens are already analyzed, so the joined string has no syntax.
        let text_query = parser.parse_query(&tokens.join(" "))?;

        let final_query: Box<dyn Query> = match options.kind {
            Some(kind) => {
                let kind_term = Term::from_field_text(self.schema.kind, kind.as_str());
                let kind_query = TermQuery::new(kind_term, IndexRecordOption::Basic);
                Box::new(BooleanQuery::new(vec![
                    (Occur::Must, text_query),
                    (
                        Occur::Must,
                        Box::new(ConstScoreQuery::new(Box::new(kind_query), 0.0)),
                    ),
                ]))
            }
            None => text_query,
        };

        let collector = TopDocs::with_limit(options.effective_limit()).tweak_score(
            |segment_reader: &SegmentReader| {
                let fast_fields = segment_reader.fast_fields();
                let sequence = fast_fields.u64(SEQUENCE_FIELD).ok();
                let length = fast_fields.u64(LENGTH_FIELD).ok();

                move |doc: DocId, score: Score| {
                    let tokens = length
                        .as_ref()
                        .and_then(|column| column.first(doc))
                        .unwrap_or(1)
                        .max(1);
                    let recency = sequence
                        .as_ref()
                        .and_then(|column| column.first(doc))
                        .unwrap_or(0);
                    (score / (tokens as f32).sqrt(), recency)
                }
            },
        );

        let searcher = self.reader.searcher();
        let top_docs = searcher.search(&final_query, &collector)?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for ((score, _recency), doc_address) in top_docs {
            let doc: TantivyDocument = searcher.doc(doc_address)?;
            let Some(id) = doc.get_first(self.schema.id).and_then(|v| v.as_str()) else {
                debug!(?doc_address, "Skipping document without id");
                continue;
            };
            hits.push(ArtifactHit {
                id: id.to_string(),
                score,
            });
        }

        info!(
            query,
            tokens = tokens.len(),
            results = hits.len(),
            "Artifact search complete"
        );
        Ok(hits)
    }
}

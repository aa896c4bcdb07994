//! Tokenizer shared by indexed fields and queries.
//!
//! Text is split on non-alphanumeric characters and lower-cased, so
//! `src/db/config.ts` is searchable as `src`, `db`, `config` and `ts`.
//! Short words and numbers are kept.

use std::collections::HashSet;

use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, TextAnalyzer, TokenStream};
use tantivy::Index;

/// Name the artifact analyzer is registered under
pub const ARTIFACT_TOKENIZER: &str = "artifact";

/// SimpleTokenizer followed by LowerCaser.
pub fn artifact_analyzer() -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .build()
}

/// Make the artifact analyzer available to fields of `index`.
pub fn register_tokenizer(index: &Index) {
    index
        .tokenizers()
        .register(ARTIFACT_TOKENIZER, artifact_analyzer());
}

/// Tokens of `text` as the index sees them.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut analyzer = artifact_analyzer();
    let mut stream = analyzer.token_stream(text);
    let mut tokens = Vec::new();
    while stream.advance() {
        tokens.push(stream.token().text.clone());
    }
    tokens
}

/// Distinct query tokens in first-seen order.
pub fn query_terms(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(query)
        .into_iter()
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_splits_punctuation() {
        assert_eq!(
            tokenize("Refactor REST-API to GraphQL!"),
            vec!["refactor", "rest", "api", "to", "graphql"]
        );
    }

    #[test]
    fn test_tokenize_splits_paths_into_segments() {
        assert_eq!(
            tokenize("src/db/migrations/001.sql"),
            vec!["src", "db", "migrations", "001", "sql"]
        );
    }

    #[test]
    fn test_tokenize_empty_and_whitespace() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t").is_empty());
        assert!(tokenize("--- ... ///").is_empty());
    }

    #[test]
    fn test_query_terms_deduplicates() {
        assert_eq!(
            query_terms("GraphQL graphql migration GRAPHQL"),
            vec!["graphql", "migration"]
        );
    }
}

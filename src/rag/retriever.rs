//! Keyword-overlap retrieval over the in-memory dataset

use std::sync::Arc;

use tracing::debug;

use crate::dataset::Dataset;
use crate::rag::tokenizer::tokenize;
use crate::rag::MatchType;
use crate::rag::SearchResult;

/// Ranks dataset records against a query by token overlap
///
/// A record's score is the number of query-token occurrences found in the
/// record's `title + " " + description` token set. Repeated query words count
/// once per occurrence, so "solar solar lamp" weighs "solar" twice.
#[derive(Debug, Clone)]
pub struct Retriever {
    dataset: Arc<Dataset>,
}

impl Retriever {
    /// Create a new retriever
    #[must_use]
    pub const fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    /// Score every record, highest first, ties in dataset order
    #[must_use]
    pub fn score_all(&self, query: &str) -> Vec<SearchResult> {
        let query_tokens = tokenize(query);

        let mut scored: Vec<SearchResult> = self
            .dataset
            .entries()
            .iter()
            .enumerate()
            .map(|(position, entry)| {
                let score = query_tokens
                    .iter()
                    .filter(|token| entry.tokens.contains(*token))
                    .count();
                SearchResult {
                    record: entry.record.clone(),
                    score,
                    position,
                    match_type: if score > 0 {
                        MatchType::Keyword
                    } else {
                        MatchType::Backfill
                    },
                }
            })
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored
    }

    /// Top `top_k` records, padded with zero-overlap records when too few match
    #[must_use]
    pub fn rank(&self, query: &str, top_k: usize) -> Vec<SearchResult> {
        debug!("Ranking {} records for query: {}", self.dataset.len(), query);

        let scored = self.score_all(query);
        let (matched, unmatched): (Vec<_>, Vec<_>) =
            scored.into_iter().partition(|result| result.score > 0);

        let mut results: Vec<SearchResult> = matched.into_iter().take(top_k).collect();
        if results.len() < top_k {
            let missing = top_k - results.len();
            results.extend(unmatched.into_iter().take(missing));
        }

        debug!(
            "Ranked {} results ({} keyword matches)",
            results.len(),
            results
                .iter()
                .filter(|r| r.match_type == MatchType::Keyword)
                .count()
        );
        results
    }

    /// Up to `limit` records that share at least one token with the query
    #[must_use]
    pub fn matching(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        self.score_all(query)
            .into_iter()
            .take_while(|result| result.score > 0)
            .take(limit)
            .collect()
    }

    /// Get dataset reference
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

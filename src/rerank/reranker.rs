//! Document reranking stage
//!
//! Reorders retrieved candidates by cross-encoder relevance and keeps
//! the top N. Document identity (metadata) passes through untouched.
//! If the scoring capability fails, the stage fails open: the original
//! retrieval order is kept, capped to the same top N.

use std::sync::Arc;

use crate::rerank::scorer::RelevanceScorer;
use crate::types::{Document, RerankResult};

/// Default number of documents kept after reranking
pub const DEFAULT_TOP_N: usize = 5;

pub struct Reranker {
    scorer: Arc<dyn RelevanceScorer>,
    top_n: usize,
    verbose: bool,
}

impl Reranker {
    pub fn new(scorer: Arc<dyn RelevanceScorer>, top_n: usize, verbose: bool) -> Self {
        Self {
            scorer,
            top_n: top_n.max(1),
            verbose,
        }
    }

    /// Rerank documents for a query; never fails
    ///
    /// An empty input returns an empty result without invoking the
    /// scorer at all.
    pub async fn rerank(&self, query: &str, documents: Vec<Document>) -> RerankResult {
        if documents.is_empty() {
            return RerankResult::empty();
        }

        let original_count = documents.len();
        let candidates: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();

        match self.scorer.score_pairs(query, &candidates).await {
            Ok(mut scores) => {
                scores.sort_by(|a, b| {
                    b.score
                        .partial_cmp(&a.score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });

                let mut seen = vec![false; documents.len()];
                let mut reranked = Vec::with_capacity(self.top_n);
                for pair in scores {
                    // Indices outside the submitted list or repeated by a
                    // misbehaving endpoint are ignored
                    if pair.index >= documents.len() || seen[pair.index] {
                        continue;
                    }
                    seen[pair.index] = true;
                    reranked.push(documents[pair.index].clone());
                    if reranked.len() == self.top_n {
                        break;
                    }
                }

                if self.verbose {
                    eprintln!("[RERANK] {} -> {} documentos", original_count, reranked.len());
                }

                let final_count = reranked.len();
                RerankResult {
                    documents: reranked,
                    original_count,
                    final_count,
                }
            }
            Err(e) => {
                if self.verbose {
                    eprintln!("[RERANK] fallo del scorer, se mantiene el orden original: {}", e);
                }
                let mut documents = documents;
                documents.truncate(self.top_n);
                let final_count = documents.len();
                RerankResult {
                    documents,
                    original_count,
                    final_count,
                }
            }
        }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::errors::{RagError, Result};
    use crate::rerank::scorer::PairScore;

    struct FixedScorer {
        scores: Vec<PairScore>,
        calls: AtomicUsize,
    }

    impl FixedScorer {
        fn new(scores: Vec<(usize, f32)>) -> Self {
            Self {
                scores: scores
                    .into_iter()
                    .map(|(index, score)| PairScore { index, score })
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RelevanceScorer for FixedScorer {
        async fn score_pairs(&self, _query: &str, _candidates: &[String]) -> Result<Vec<PairScore>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.scores.clone())
        }
    }

    struct FailingScorer;

    #[async_trait]
    impl RelevanceScorer for FailingScorer {
        async fn score_pairs(&self, _query: &str, _candidates: &[String]) -> Result<Vec<PairScore>> {
            Err(RagError::RerankApi("unavailable".to_string()))
        }
    }

    fn docs(n: usize) -> Vec<Document> {
        (0..n)
            .map(|i| {
                let mut metadata = serde_json::Map::new();
                metadata.insert("id".to_string(), serde_json::json!(i));
                Document::with_metadata(format!("documento {}", i), metadata)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_orders_by_descending_score() {
        let scorer = Arc::new(FixedScorer::new(vec![(0, 0.2), (1, 0.9), (2, 0.5)]));
        let reranker = Reranker::new(scorer, 5, false);
        let result = reranker.rerank("consulta", docs(3)).await;

        assert_eq!(result.original_count, 3);
        assert_eq!(result.final_count, 3);
        let ids: Vec<i64> = result
            .documents
            .iter()
            .map(|d| d.metadata["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 0]);
    }

    #[tokio::test]
    async fn test_caps_at_top_n() {
        let scorer = Arc::new(FixedScorer::new(
            (0..10).map(|i| (i, 1.0 - i as f32 * 0.05)).collect(),
        ));
        let reranker = Reranker::new(scorer, 3, false);
        let result = reranker.rerank("consulta", docs(10)).await;
        assert_eq!(result.final_count, 3);
        assert_eq!(result.original_count, 10);
    }

    #[tokio::test]
    async fn test_metadata_survives_reranking() {
        let scorer = Arc::new(FixedScorer::new(vec![(1, 0.9), (0, 0.1)]));
        let reranker = Reranker::new(scorer, 5, false);
        let input = docs(2);
        let result = reranker.rerank("consulta", input.clone()).await;
        for doc in &result.documents {
            assert!(input.iter().any(|d| d == doc));
        }
    }

    #[tokio::test]
    async fn test_empty_input_skips_scorer() {
        let scorer = Arc::new(FixedScorer::new(vec![]));
        let reranker = Reranker::new(scorer.clone(), 5, false);
        let result = reranker.rerank("consulta", Vec::new()).await;
        assert_eq!(result, RerankResult::empty());
        assert_eq!(scorer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_scorer_failure_passes_through_capped() {
        let reranker = Reranker::new(Arc::new(FailingScorer), 2, false);
        let result = reranker.rerank("consulta", docs(4)).await;
        assert_eq!(result.original_count, 4);
        assert_eq!(result.final_count, 2);
        // Original retrieval order preserved
        assert_eq!(result.documents[0].content, "documento 0");
        assert_eq!(result.documents[1].content, "documento 1");
    }

    #[tokio::test]
    async fn test_bogus_indices_ignored() {
        let scorer = Arc::new(FixedScorer::new(vec![(7, 0.9), (1, 0.8), (1, 0.7), (0, 0.6)]));
        let reranker = Reranker::new(scorer, 5, false);
        let result = reranker.rerank("consulta", docs(2)).await;
        let ids: Vec<i64> = result
            .documents
            .iter()
            .map(|d| d.metadata["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 0]);
    }
}

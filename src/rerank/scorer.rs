//! Cross-encoder scoring capability
//!
//! Remote endpoint speaking the common rerank wire format:
//! POST /v1/rerank {model, query, documents, top_n} →
//! {results: [{index, relevance_score}]}.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{RagError, Result};

/// Default rerank endpoint (local cross-encoder server)
pub const DEFAULT_RERANK_URL: &str = "http://127.0.0.1:8080";

/// Default cross-encoder model
pub const DEFAULT_RERANK_MODEL: &str = "jina-reranker-v2-base-multilingual";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Relevance score for one (query, candidate) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairScore {
    /// Index into the candidate list as submitted
    pub index: usize,
    pub score: f32,
}

/// Scores (query, candidate) pairs with a finer-grained model than the
/// initial retrieval step
#[async_trait]
pub trait RelevanceScorer: Send + Sync {
    async fn score_pairs(&self, query: &str, candidates: &[String]) -> Result<Vec<PairScore>>;
}

/// HTTP client for a Jina-compatible rerank endpoint
pub struct RerankClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl RerankClient {
    pub fn new(base_url: &str, model: &str, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(RagError::HttpError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RelevanceScorer for RerankClient {
    async fn score_pairs(&self, query: &str, candidates: &[String]) -> Result<Vec<PairScore>> {
        let url = format!("{}/v1/rerank", self.base_url);

        let request = RerankRequest {
            model: self.model.clone(),
            query: query.to_string(),
            documents: candidates.to_vec(),
            top_n: candidates.len(),
        };

        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RagError::RerankApi(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            return Err(RagError::RerankApi(format!("HTTP {}", response.status())));
        }

        let rerank_response: RerankResponse = response
            .json()
            .await
            .map_err(|e| RagError::RerankApi(format!("Failed to parse response: {}", e)))?;

        Ok(rerank_response
            .results
            .into_iter()
            .map(|r| PairScore {
                index: r.index,
                score: r.relevance_score,
            })
            .collect())
    }
}

#[derive(Debug, Serialize)]
struct RerankRequest {
    model: String,
    query: String,
    documents: Vec<String>,
    top_n: usize,
}

#[derive(Debug, Deserialize)]
struct RerankResponse {
    #[serde(default)]
    results: Vec<RerankEntry>,
}

#[derive(Debug, Deserialize)]
struct RerankEntry {
    index: usize,
    relevance_score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = RerankClient::new("http://localhost:8080/", DEFAULT_RERANK_MODEL, None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{"results": [{"index": 1, "relevance_score": 0.92}, {"index": 0, "relevance_score": 0.41}]}"#;
        let response: RerankResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].index, 1);
    }
}

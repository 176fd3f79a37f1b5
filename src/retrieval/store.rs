//! Qdrant-backed document retrieval
//!
//! Embeds the query through the Ollama embeddings endpoint and runs a
//! filtered nearest-neighbor search. All qdrant wire-type conversion
//! stays inside this adapter.

use anyhow::Context;
use async_trait::async_trait;
use qdrant_client::{
    client::QdrantClient,
    qdrant::{
        condition::ConditionOneOf, r#match::MatchValue, with_payload_selector::SelectorOptions,
        Condition, FieldCondition, Filter, Match, RepeatedIntegers, RepeatedStrings, SearchPoints,
        Value as QdrantValue, WithPayloadSelector,
    },
};
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::errors::Result;
use crate::llm::OllamaClient;
use crate::retrieval::filter_expr::{FilterClause, FilterExpression};
use crate::types::{Document, FilterValue};

/// Nearest-neighbor search capability
#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    /// Search for passages matching `query` under `filter`
    ///
    /// An empty filter expression means unfiltered semantic search.
    async fn search(
        &self,
        query: &str,
        filter: &FilterExpression,
        top_k: usize,
    ) -> Result<Vec<Document>>;
}

/// Qdrant retriever with Ollama query embeddings
pub struct QdrantRetriever {
    client: QdrantClient,
    embedder: Arc<OllamaClient>,
    collection: String,
}

impl QdrantRetriever {
    /// Connect to a qdrant instance
    pub fn connect(url: &str, embedder: Arc<OllamaClient>, collection: &str) -> Result<Self> {
        let client = QdrantClient::from_url(url)
            .build()
            .context("Failed to create qdrant client")?;

        Ok(Self {
            client,
            embedder,
            collection: collection.to_string(),
        })
    }

    /// Check that the configured collection exists
    pub async fn health_check(&self) -> bool {
        self.client.collection_info(&self.collection).await.is_ok()
    }

    /// Number of points in the collection
    pub async fn collection_stats(&self) -> Result<u64> {
        let info = self
            .client
            .collection_info(&self.collection)
            .await
            .context("Failed to get collection info")?;

        Ok(info.result.and_then(|r| r.points_count).unwrap_or(0))
    }

    async fn search_inner(
        &self,
        query: &str,
        filter: &FilterExpression,
        top_k: usize,
    ) -> anyhow::Result<Vec<Document>> {
        let embedding = self
            .embedder
            .embed(query)
            .await
            .context("Failed to embed query")?;

        let search_result = self
            .client
            .search_points(&SearchPoints {
                collection_name: self.collection.clone(),
                vector: embedding,
                limit: top_k as u64,
                with_payload: Some(WithPayloadSelector {
                    selector_options: Some(SelectorOptions::Enable(true)),
                }),
                filter: filter_to_qdrant(filter),
                ..Default::default()
            })
            .await
            .context("Failed to search points")?;

        let documents = search_result
            .result
            .into_iter()
            .map(|point| payload_to_document(point.payload))
            .collect();

        Ok(documents)
    }
}

#[async_trait]
impl DocumentRetriever for QdrantRetriever {
    async fn search(
        &self,
        query: &str,
        filter: &FilterExpression,
        top_k: usize,
    ) -> Result<Vec<Document>> {
        self.search_inner(query, filter, top_k)
            .await
            .map_err(Into::into)
    }
}

/// Convert a filter expression to a qdrant `must` filter
///
/// Empty expressions convert to None (unfiltered search).
fn filter_to_qdrant(expr: &FilterExpression) -> Option<Filter> {
    if expr.is_empty() {
        return None;
    }

    let must = expr
        .iter()
        .map(|(field, clause)| {
            let match_value = match clause {
                FilterClause::Eq(FilterValue::Text(s)) => MatchValue::Keyword(s.clone()),
                FilterClause::Eq(FilterValue::Integer(n)) => MatchValue::Integer(*n),
                FilterClause::In(values) => in_match_value(values),
            };

            Condition {
                condition_one_of: Some(ConditionOneOf::Field(FieldCondition {
                    key: field.as_str().to_string(),
                    r#match: Some(Match {
                        match_value: Some(match_value),
                    }),
                    ..Default::default()
                })),
            }
        })
        .collect();

    Some(Filter {
        must,
        ..Default::default()
    })
}

/// Membership predicate; mixed-type lists match on their text members
fn in_match_value(values: &[FilterValue]) -> MatchValue {
    let integers: Vec<i64> = values.iter().filter_map(FilterValue::as_integer).collect();
    if integers.len() == values.len() {
        MatchValue::Integers(RepeatedIntegers { integers })
    } else {
        MatchValue::Keywords(RepeatedStrings {
            strings: values
                .iter()
                .filter_map(|v| v.as_text().map(str::to_string))
                .collect(),
        })
    }
}

/// Map a point payload to a Document
///
/// The passage text lives under `content` (legacy collections use
/// `document`); every other payload entry becomes metadata.
fn payload_to_document(
    payload: std::collections::HashMap<String, QdrantValue>,
) -> Document {
    let mut content = String::new();
    let mut metadata = serde_json::Map::new();

    for (key, value) in payload {
        match key.as_str() {
            "content" | "document" => {
                if let Some(text) = qdrant_value_to_string(&value) {
                    content = text;
                }
            }
            _ => {
                if let Some(json) = qdrant_to_json_value(&value) {
                    metadata.insert(key, json);
                }
            }
        }
    }

    Document { content, metadata }
}

fn qdrant_to_json_value(value: &QdrantValue) -> Option<JsonValue> {
    use qdrant_client::qdrant::value::Kind;
    value.kind.as_ref().and_then(|kind| match kind {
        Kind::StringValue(s) => Some(JsonValue::String(s.clone())),
        Kind::IntegerValue(i) => Some(JsonValue::Number((*i).into())),
        Kind::DoubleValue(f) => serde_json::Number::from_f64(*f).map(JsonValue::Number),
        Kind::BoolValue(b) => Some(JsonValue::Bool(*b)),
        _ => None,
    })
}

fn qdrant_value_to_string(value: &QdrantValue) -> Option<String> {
    use qdrant_client::qdrant::value::Kind;
    value.kind.as_ref().and_then(|kind| match kind {
        Kind::StringValue(s) => Some(s.clone()),
        _ => None,
    })
}

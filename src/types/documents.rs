//! Retrieved document and pipeline result types

use serde::{Deserialize, Serialize};

use crate::types::classification::Category;
use crate::types::filters::DiscardedFilter;

/// Opaque passage returned by the retrieval capability
///
/// Metadata is the document's identity and must survive reranking
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: serde_json::Map::new(),
        }
    }

    pub fn with_metadata(
        content: impl Into<String>,
        metadata: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }
}

/// Result of the reranking stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankResult {
    pub documents: Vec<Document>,
    pub original_count: usize,
    pub final_count: usize,
}

impl RerankResult {
    pub fn empty() -> Self {
        Self {
            documents: Vec::new(),
            original_count: 0,
            final_count: 0,
        }
    }
}

/// Final answer assembled by the orchestrator
///
/// Always structurally valid: stage failures degrade the content, and
/// only composition failures or an empty input populate `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Original question as received
    pub question: String,
    /// Spell-corrected question, present only when a correction was applied
    #[serde(default)]
    pub corrected_question: Option<String>,
    pub category: Category,
    pub generated_answer: String,
    pub retrieved_context: Vec<String>,
    /// Filters rejected during validation, kept for diagnostics
    #[serde(default)]
    pub discarded_filters: Vec<DiscardedFilter>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PipelineResult {
    /// Result for a rejected (empty) input question
    pub fn rejected(question: &str, error: impl Into<String>) -> Self {
        Self {
            question: question.to_string(),
            corrected_question: None,
            category: Category::General,
            generated_answer: String::new(),
            retrieved_context: Vec::new(),
            discarded_filters: Vec::new(),
            error: Some(error.into()),
        }
    }
}

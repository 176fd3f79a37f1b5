//! Semantic category classifier
//!
//! One structured completion constrained to the four-category enum.
//! Output is cleaned field by field; anything unparseable degrades to
//! the default classification instead of aborting the pipeline.

use std::sync::Arc;

use crate::llm::CompletionModel;
use crate::routing::prompts::SEMANTIC_ROUTER_SYSTEM_PROMPT;
use crate::types::{Category, ClassificationResult};

/// Classifies which document family a question targets
pub struct CategoryClassifier {
    llm: Arc<dyn CompletionModel>,
    verbose: bool,
}

impl CategoryClassifier {
    pub fn new(llm: Arc<dyn CompletionModel>, verbose: bool) -> Self {
        Self { llm, verbose }
    }

    /// Classify a question; never fails
    pub async fn classify(&self, question: &str) -> ClassificationResult {
        let user = format!("Clasifica esta pregunta: '{}'", question);

        let result = match self
            .llm
            .complete_json(SEMANTIC_ROUTER_SYSTEM_PROMPT, &user)
            .await
        {
            Ok(value) => clean_classification(&value),
            Err(e) => {
                if self.verbose {
                    eprintln!("[CLASSIFY] fallo del clasificador: {}", e);
                }
                ClassificationResult {
                    reasoning: "Error en clasificación".to_string(),
                    ..ClassificationResult::default()
                }
            }
        };

        if self.verbose {
            eprintln!(
                "[CLASSIFY] categoría={} confianza={:.2}",
                result.category, result.confidence
            );
        }

        result
    }
}

/// Field-by-field cleanup of raw classifier output
///
/// Unknown categories map to `general`, non-numeric confidence to 0.5,
/// out-of-range confidence is clamped, missing reasoning gets the
/// default text.
fn clean_classification(value: &serde_json::Value) -> ClassificationResult {
    let category = value
        .get("category")
        .and_then(|v| v.as_str())
        .and_then(Category::parse)
        .unwrap_or_default();

    let confidence = match value.get("confidence") {
        Some(v) => v
            .as_f64()
            .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
            .map(|c| c.clamp(0.0, 1.0))
            .unwrap_or(0.5),
        None => 0.5,
    };

    let reasoning = value
        .get("reasoning")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("Sin razonamiento")
        .to_string();

    ClassificationResult {
        category,
        confidence,
        reasoning,
    }
}

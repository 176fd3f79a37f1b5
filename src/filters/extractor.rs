//! Filter extractor
//!
//! One structured completion pulls variable metadata out of the
//! question text. Field values are coerced defensively (numbers may
//! arrive as strings); a total failure falls back to a regex scan for
//! an article number and a coarse source keyword.

use regex::Regex;
use std::sync::Arc;

use crate::errors::Result;
use crate::llm::CompletionModel;
use crate::routing::prompts::FILTER_EXTRACTOR_SYSTEM_PROMPT;
use crate::types::ExtractedFilters;

pub struct FilterExtractor {
    llm: Arc<dyn CompletionModel>,
    article_re: Regex,
    verbose: bool,
}

impl FilterExtractor {
    pub fn new(llm: Arc<dyn CompletionModel>, verbose: bool) -> Self {
        Self {
            llm,
            article_re: Regex::new(r"(?i)art[ií]culo\s+(\d+)").expect("article regex is valid"),
            verbose,
        }
    }

    /// Extract variable metadata from a question; never fails
    pub async fn extract(&self, question: &str) -> ExtractedFilters {
        match self.extract_with_model(question).await {
            Ok(filters) => {
                if self.verbose {
                    eprintln!("[EXTRACT] {:?}", filters);
                }
                filters
            }
            Err(e) => {
                if self.verbose {
                    eprintln!("[EXTRACT] fallo del extractor, se usa regex: {}", e);
                }
                self.regex_fallback(question)
            }
        }
    }

    async fn extract_with_model(&self, question: &str) -> Result<ExtractedFilters> {
        let user = format!("Pregunta: {}\n\nExtrae SOLO los metadatos variables mencionados:", question);
        let value = self
            .llm
            .complete_json(FILTER_EXTRACTOR_SYSTEM_PROMPT, &user)
            .await?;
        Ok(coerce_filters(&value))
    }

    /// Minimal pattern-based extraction used when the model is unusable
    fn regex_fallback(&self, question: &str) -> ExtractedFilters {
        let mut filters = ExtractedFilters::default();

        if let Some(captures) = self.article_re.captures(question) {
            filters.article_number = captures[1].parse().ok();
        }

        let lowered = question.to_lowercase();
        if lowered.contains("constitución") || lowered.contains("constitucion") {
            filters.source = Some("Constitución Política del Perú".to_string());
            filters.document_type = Some("constitucion".to_string());
        }

        filters
    }
}

/// Field-by-field coercion of raw extractor output
///
/// Integer fields accept numbers or numeric strings; anything else
/// becomes null. Unknown fields are ignored.
fn coerce_filters(value: &serde_json::Value) -> ExtractedFilters {
    ExtractedFilters {
        article_number: coerce_integer(value.get("article_number")),
        title: coerce_string(value.get("title")),
        year: coerce_integer(value.get("year")),
        source: coerce_string(value.get("source")),
        document_type: coerce_string(value.get("document_type")),
        topic: coerce_string(value.get("topic")),
    }
}

fn coerce_integer(value: Option<&serde_json::Value>) -> Option<i64> {
    let value = value?;
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn coerce_string(value: Option<&serde_json::Value>) -> Option<String> {
    value?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

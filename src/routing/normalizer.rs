//! Question normalizer (spell-check router)
//!
//! One structured completion per question. Fails open: any capability
//! or parse error passes the original question through unchanged.

use std::sync::Arc;

use crate::llm::CompletionModel;
use crate::routing::prompts::QUALITY_ROUTER_SYSTEM_PROMPT;
use crate::types::SpellCheck;

/// Outcome of the normalization stage
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Question text downstream stages should use
    pub question: String,
    /// True when a correction was applied
    pub corrected: bool,
}

/// Spell-check and correction stage
pub struct QuestionNormalizer {
    llm: Arc<dyn CompletionModel>,
    verbose: bool,
}

impl QuestionNormalizer {
    pub fn new(llm: Arc<dyn CompletionModel>, verbose: bool) -> Self {
        Self { llm, verbose }
    }

    /// Normalize a question; never fails
    pub async fn normalize(&self, question: &str) -> Normalized {
        let user = format!("Analiza esta pregunta: '{}'", question);

        let check = match self
            .llm
            .complete_json(QUALITY_ROUTER_SYSTEM_PROMPT, &user)
            .await
        {
            Ok(value) => serde_json::from_value::<SpellCheck>(value).unwrap_or_default(),
            Err(e) => {
                if self.verbose {
                    eprintln!("[NORMALIZE] fallo del corrector, se usa la pregunta original: {}", e);
                }
                SpellCheck::default()
            }
        };

        match check.corrected_question {
            Some(corrected) if check.has_spelling_errors && !corrected.trim().is_empty() => {
                if self.verbose {
                    eprintln!("[NORMALIZE] '{}' -> '{}'", question, corrected);
                }
                Normalized {
                    question: corrected,
                    corrected: true,
                }
            }
            _ => Normalized {
                question: question.to_string(),
                corrected: false,
            },
        }
    }
}

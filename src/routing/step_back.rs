//! Step-back question generator
//!
//! Produces a broader question exploring the principles behind the
//! original one, used for the dual-context retrieval variant. Fails
//! open: any error skips the variant rather than aborting.

use std::sync::Arc;

use crate::llm::CompletionModel;
use crate::routing::prompts::STEP_BACK_SYSTEM_PROMPT;

pub struct StepBackGenerator {
    llm: Arc<dyn CompletionModel>,
    verbose: bool,
}

impl StepBackGenerator {
    pub fn new(llm: Arc<dyn CompletionModel>, verbose: bool) -> Self {
        Self { llm, verbose }
    }

    /// Generate a step-back question, or None when generation fails
    pub async fn generate(&self, question: &str) -> Option<String> {
        let user = format!("Genera una pregunta step-back para: '{}'", question);

        match self.llm.complete_json(STEP_BACK_SYSTEM_PROMPT, &user).await {
            Ok(value) => {
                let step_back = value
                    .get("step_back_question")
                    .and_then(|v| v.as_str())
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string);

                if self.verbose {
                    match &step_back {
                        Some(q) => eprintln!("[STEP-BACK] '{}'", q),
                        None => eprintln!("[STEP-BACK] respuesta sin pregunta, se omite"),
                    }
                }

                step_back
            }
            Err(e) => {
                if self.verbose {
                    eprintln!("[STEP-BACK] fallo del generador, se omite: {}", e);
                }
                None
            }
        }
    }
}

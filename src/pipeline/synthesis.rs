//! Answer composition helpers
//!
//! Turns retrieved passages into the context block handed to the
//! language model and issues the composition call.

use std::sync::Arc;

use crate::errors::Result;
use crate::llm::CompletionModel;
use crate::routing::prompts::{
    RAG_BASIC_SYSTEM_PROMPT, RAG_SYSTEM_PROMPT, STEP_BACK_ANSWER_SYSTEM_PROMPT,
};
use crate::types::Document;

/// Join passage contents into one context block
pub fn docs_to_text(docs: &[Document]) -> String {
    docs.iter()
        .map(|d| d.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// De-duplicate documents by content, keeping the first occurrence
pub fn dedup_by_content(docs: Vec<Document>) -> Vec<Document> {
    let mut seen = std::collections::HashSet::new();
    docs.into_iter()
        .filter(|doc| seen.insert(doc.content.clone()))
        .collect()
}

/// Compose the final answer from the retrieved context
pub async fn compose_answer(
    llm: &Arc<dyn CompletionModel>,
    question: &str,
    context: &str,
) -> Result<String> {
    let user = format!("Contexto:\n{}\n\nPregunta: {}\n\nRespuesta:", context, question);
    llm.complete(RAG_SYSTEM_PROMPT, &user).await
}

/// Compose with the basic prompt (naive mode)
pub async fn compose_naive_answer(
    llm: &Arc<dyn CompletionModel>,
    question: &str,
    context: &str,
) -> Result<String> {
    let user = format!("Contexto:\n{}\n\nPregunta: {}", context, question);
    llm.complete(RAG_BASIC_SYSTEM_PROMPT, &user).await
}

/// Compose from a specific and a general (step-back) context
pub async fn compose_step_back_answer(
    llm: &Arc<dyn CompletionModel>,
    question: &str,
    normal_context: &str,
    step_back_context: &str,
) -> Result<String> {
    let user = format!(
        "Contexto General (de la pregunta step-back):\n{}\n\nContexto Específico (de la pregunta original):\n{}\n\nPregunta Original: {}\nRespuesta Concisa:",
        step_back_context, normal_context, question
    );
    llm.complete(STEP_BACK_ANSWER_SYSTEM_PROMPT, &user).await
}

//! Pipeline orchestrator
//!
//! Linear state machine over the routing, filtering, retrieval and
//! reranking stages. Each stage absorbs its own failures with the
//! fallback policy below; nothing short of an empty input or a
//! composition failure reaches the caller, and even those arrive as a
//! well-formed result rather than an error.
//!
//! Stage fallbacks:
//! - normalize: pass the original question through
//! - classify: category=general, confidence=0.5
//! - extract: regex-derived or empty filters
//! - validate: never fails, discards are data
//! - retrieve: empty document set after exhausting the cascade
//! - rerank: pass-through capped to top-N
//! - compose: surfaced in the result's `error` field

use std::sync::Arc;

use crate::filters::{validate_filters, FilterExtractor};
use crate::llm::CompletionModel;
use crate::pipeline::synthesis::{
    compose_answer, compose_naive_answer, compose_step_back_answer, dedup_by_content, docs_to_text,
};
use crate::rerank::{RelevanceScorer, Reranker};
use crate::retrieval::{DocumentRetriever, StrategyCascade};
use crate::routing::{CategoryClassifier, QuestionNormalizer, StepBackGenerator};
use crate::types::{Category, Document, PipelineResult};

/// Error message for an empty input question
pub const EMPTY_QUESTION_ERROR: &str = "La pregunta no puede estar vacía.";

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Documents requested per cascade strategy
    pub top_k: usize,
    /// Documents kept after reranking
    pub rerank_top_n: usize,
    /// Documents requested in naive mode
    pub naive_top_k: usize,
    /// Retrieve a broadened step-back context alongside the normal one
    pub enable_step_back: bool,
    /// Stage-tagged diagnostics on stderr
    pub verbose: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: 15,
            rerank_top_n: crate::rerank::DEFAULT_TOP_N,
            naive_top_k: 5,
            enable_step_back: false,
            verbose: false,
        }
    }
}

/// End-to-end question pipeline
pub struct RagPipeline {
    normalizer: QuestionNormalizer,
    classifier: CategoryClassifier,
    extractor: FilterExtractor,
    step_back: StepBackGenerator,
    cascade: StrategyCascade,
    reranker: Reranker,
    llm: Arc<dyn CompletionModel>,
    config: PipelineConfig,
}

impl RagPipeline {
    pub fn new(
        llm: Arc<dyn CompletionModel>,
        retriever: Arc<dyn DocumentRetriever>,
        scorer: Arc<dyn RelevanceScorer>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            normalizer: QuestionNormalizer::new(llm.clone(), config.verbose),
            classifier: CategoryClassifier::new(llm.clone(), config.verbose),
            extractor: FilterExtractor::new(llm.clone(), config.verbose),
            step_back: StepBackGenerator::new(llm.clone(), config.verbose),
            cascade: StrategyCascade::new(retriever, config.top_k, config.verbose),
            reranker: Reranker::new(scorer, config.rerank_top_n, config.verbose),
            llm,
            config,
        }
    }

    /// Answer a question; always returns a well-formed result
    pub async fn invoke(&self, question: &str) -> PipelineResult {
        if question.trim().is_empty() {
            return PipelineResult::rejected(question, EMPTY_QUESTION_ERROR);
        }

        let normalized = self.normalizer.normalize(question).await;
        let working = normalized.question.as_str();

        let classification = self.classifier.classify(working).await;
        let extracted = self.extractor.extract(working).await;
        let validated = validate_filters(&extracted);

        if self.config.verbose {
            for discard in &validated.discarded {
                eprintln!("[VALIDATE] descartado {}", discard);
            }
        }

        let step_back_question = if self.config.enable_step_back {
            self.step_back.generate(working).await
        } else {
            None
        };

        let (answer, context_docs, error) = match step_back_question {
            Some(step_back) => {
                // The two contexts are independent retrievals
                let (normal_docs, step_docs) = tokio::join!(
                    self.cascade.retrieve(working, &validated, classification.category),
                    self.cascade.retrieve_unfiltered(&step_back),
                );

                let reranked = self.reranker.rerank(working, normal_docs).await;
                let normal_context = docs_to_text(&reranked.documents);
                let step_context = docs_to_text(&step_docs);

                let merged = dedup_by_content(
                    reranked
                        .documents
                        .into_iter()
                        .chain(step_docs.into_iter())
                        .collect(),
                );

                match compose_step_back_answer(&self.llm, working, &normal_context, &step_context)
                    .await
                {
                    Ok(answer) => (answer, merged, None),
                    Err(e) => (String::new(), merged, Some(composition_error(&e))),
                }
            }
            None => {
                let documents = self
                    .cascade
                    .retrieve(working, &validated, classification.category)
                    .await;

                let reranked = self.reranker.rerank(working, documents).await;
                let context = docs_to_text(&reranked.documents);

                match compose_answer(&self.llm, working, &context).await {
                    Ok(answer) => (answer, reranked.documents, None),
                    Err(e) => (String::new(), reranked.documents, Some(composition_error(&e))),
                }
            }
        };

        PipelineResult {
            question: question.to_string(),
            corrected_question: normalized.corrected.then(|| normalized.question.clone()),
            category: classification.category,
            generated_answer: answer,
            retrieved_context: contents(&context_docs),
            discarded_filters: validated.discarded,
            error,
        }
    }

    /// Naive mode: one unfiltered search, basic prompt, no routing
    pub async fn invoke_naive(&self, question: &str) -> PipelineResult {
        if question.trim().is_empty() {
            return PipelineResult::rejected(question, EMPTY_QUESTION_ERROR);
        }

        let documents = self
            .cascade
            .retrieve_unfiltered_with_limit(question, self.config.naive_top_k)
            .await;
        let context = docs_to_text(&documents);

        let (answer, error) = match compose_naive_answer(&self.llm, question, &context).await {
            Ok(answer) => (answer, None),
            Err(e) => (String::new(), Some(composition_error(&e))),
        };

        PipelineResult {
            question: question.to_string(),
            corrected_question: None,
            category: Category::General,
            generated_answer: answer,
            retrieved_context: contents(&documents),
            discarded_filters: Vec::new(),
            error,
        }
    }
}

fn contents(docs: &[Document]) -> Vec<String> {
    docs.iter().map(|d| d.content.clone()).collect()
}

fn composition_error(e: &crate::errors::RagError) -> String {
    format!("Error al generar la respuesta: {}", e)
}

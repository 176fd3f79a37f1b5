//! End-to-end question pipeline
//!
//! Orchestrates normalize -> classify -> extract -> validate ->
//! cascade-retrieve -> rerank -> compose with per-stage fallbacks.

pub mod orchestrator;
pub mod synthesis;

pub use orchestrator::{PipelineConfig, RagPipeline, EMPTY_QUESTION_ERROR};
pub use synthesis::{dedup_by_content, docs_to_text};

//! LexRag - Retrieval-augmented legal assistant
//!
//! Answers natural-language questions about Peruvian legislation by
//! routing each question to the right document family, extracting and
//! validating metadata filters, retrieving passages through a cascade
//! of progressively relaxed filters, reranking them with a
//! cross-encoder, and composing an answer with a local Ollama model.
//!
//! # Architecture
//!
//! - routing: spell-check normalization + semantic classification
//! - filters: metadata extraction + vocabulary validation
//! - retrieval: filter expressions, strategy cascade, qdrant store
//! - rerank: cross-encoder reordering with fail-open pass-through
//! - pipeline: orchestration with per-stage fallbacks

pub mod errors;
pub mod types;
pub mod config;
pub mod llm;
pub mod routing;
pub mod filters;
pub mod retrieval;
pub mod rerank;
pub mod pipeline;
pub mod repl;
pub mod cli;

// Re-export commonly used types
pub use errors::{RagError, Result};
pub use pipeline::{PipelineConfig, RagPipeline};
pub use types::{Category, Document, PipelineResult};

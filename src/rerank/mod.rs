//! Cross-encoder reranking of retrieved candidates

pub mod reranker;
pub mod scorer;

pub use reranker::{Reranker, DEFAULT_TOP_N};
pub use scorer::{PairScore, RelevanceScorer, RerankClient};

//! Error types for the LexRag pipeline
//!
//! Provides a single crate-wide error enum with context propagation.
//! Every pipeline stage recovers locally; these errors only cross the
//! orchestrator boundary for composition failures.

use thiserror::Error;

/// Main error type for the LexRag system
#[derive(Error, Debug)]
pub enum RagError {
    /// Model output could not be parsed as the expected JSON shape
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Ollama API errors (completions, embeddings)
    #[error("Ollama API error: {0}")]
    OllamaApi(String),

    /// Rerank endpoint errors
    #[error("Rerank API error: {0}")]
    RerankApi(String),

    /// Vector search errors
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic errors with context
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, RagError>;

/// Convert anyhow errors (qdrant store adapter) to RagError
impl From<anyhow::Error> for RagError {
    fn from(err: anyhow::Error) -> Self {
        RagError::Retrieval(err.to_string())
    }
}

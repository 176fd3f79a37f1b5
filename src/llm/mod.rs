//! Language-model capability boundary
//!
//! The pipeline consumes completions through the `CompletionModel`
//! trait so tests can substitute deterministic mocks. The concrete
//! provider is an Ollama HTTP client.

pub mod client;
pub mod extract;

use async_trait::async_trait;

use crate::errors::Result;

pub use client::OllamaClient;

/// Text and structured completion capability
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Free-form completion from a (system, user) message pair
    async fn complete(&self, system: &str, user: &str) -> Result<String>;

    /// Completion constrained to a JSON object
    ///
    /// Implementations must return a parsed JSON object or an error;
    /// callers own the fallback policy for malformed output.
    async fn complete_json(&self, system: &str, user: &str) -> Result<serde_json::Value>;
}

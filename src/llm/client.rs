//! Ollama API client
//!
//! Non-streaming chat completions via POST /api/chat, structured
//! (JSON-constrained) completions via the same endpoint with
//! `"format": "json"`, and query embeddings via POST /api/embeddings.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{RagError, Result};
use crate::llm::extract::extract_json_object;
use crate::llm::CompletionModel;

/// Default Ollama API endpoint
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default chat model
pub const DEFAULT_MODEL: &str = "llama3.1:8b";

/// Default embedding model
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

/// Request timeout; local generation on CPU can be slow
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Ollama HTTP client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    embedding_model: String,
    temperature: f32,
}

impl OllamaClient {
    /// Create a new client with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_OLLAMA_URL, DEFAULT_MODEL, DEFAULT_EMBEDDING_MODEL, 0.0)
    }

    /// Create a client with custom configuration
    pub fn with_config(
        base_url: &str,
        model: &str,
        embedding_model: &str,
        temperature: f32,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(RagError::HttpError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            embedding_model: embedding_model.to_string(),
            temperature,
        })
    }

    /// One chat turn; `json_format` constrains output to a JSON object
    async fn chat(&self, system: &str, user: &str, json_format: bool) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            stream: false,
            format: json_format.then(|| "json".to_string()),
            options: ChatOptions {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::OllamaApi(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RagError::OllamaApi(format!("HTTP {}: {}", status, error_text)));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| RagError::OllamaApi(format!("Failed to parse response: {}", e)))?;

        Ok(chat_response.message.content)
    }

    /// Compute the embedding vector for a query text
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);

        let request = EmbeddingsRequest {
            model: self.embedding_model.clone(),
            prompt: text.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::OllamaApi(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            return Err(RagError::OllamaApi(format!(
                "Embeddings HTTP {}",
                response.status()
            )));
        }

        let embeddings: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| RagError::OllamaApi(format!("Failed to parse embedding: {}", e)))?;

        if embeddings.embedding.is_empty() {
            return Err(RagError::OllamaApi("Empty embedding returned".to_string()));
        }

        Ok(embeddings.embedding)
    }

    /// Check if the Ollama server is reachable
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/api/version", self.base_url);
        match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(2))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Get current chat model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CompletionModel for OllamaClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        self.chat(system, user, false).await
    }

    async fn complete_json(&self, system: &str, user: &str) -> Result<serde_json::Value> {
        let text = self.chat(system, user, true).await?;
        extract_json_object(&text).ok_or_else(|| {
            RagError::JsonParse(format!(
                "Model output is not a JSON object: {}",
                text.chars().take(120).collect::<String>()
            ))
        })
    }
}

/// Ollama chat request
#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    options: ChatOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatOptions {
    temperature: f32,
}

/// Ollama chat response (non-streaming)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest {
    model: String,
    prompt: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    #[serde(default)]
    embedding: Vec<f32>,
}

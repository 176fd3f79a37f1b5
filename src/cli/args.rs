//! Command-line argument parsing for LexRag
//!
//! Provides clap-based CLI with subcommands and per-run overrides of
//! the configured providers.

use clap::{Parser, Subcommand};

/// LexRag - Consultas sobre legislación peruana con modelos locales
#[derive(Parser, Debug)]
#[command(name = "lexrag")]
#[command(version)]
#[command(about = "Asistente legal RAG sobre Ollama y qdrant", long_about = None)]
pub struct Args {
    /// Question to answer (one-shot mode)
    #[arg(value_name = "PREGUNTA")]
    pub question: Option<String>,

    /// Ollama chat model
    #[arg(short, long)]
    pub model: Option<String>,

    /// Ollama base URL
    #[arg(long)]
    pub ollama_url: Option<String>,

    /// Qdrant base URL
    #[arg(long)]
    pub qdrant_url: Option<String>,

    /// Qdrant collection name
    #[arg(long)]
    pub collection: Option<String>,

    /// Documents requested per cascade strategy
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Retrieve a broadened step-back context as well
    #[arg(long)]
    pub step_back: bool,

    /// Skip routing and filtering (plain semantic search)
    #[arg(long)]
    pub naive: bool,

    /// Stage-tagged diagnostics on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start interactive chat mode
    Chat,

    /// Check that Ollama and qdrant are reachable
    Doctor,

    /// Display current configuration
    Config,
}

impl Args {
    /// A question is required when no subcommand is given
    pub fn validate(&self) -> Result<(), String> {
        if self.command.is_none() && self.question.is_none() {
            return Err(
                "Se requiere una pregunta. Usa 'lexrag \"<pregunta>\"' o un subcomando.".to_string(),
            );
        }
        Ok(())
    }
}

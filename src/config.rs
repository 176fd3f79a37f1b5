use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::llm::client::{DEFAULT_EMBEDDING_MODEL, DEFAULT_MODEL, DEFAULT_OLLAMA_URL};
use crate::rerank::scorer::{DEFAULT_RERANK_MODEL, DEFAULT_RERANK_URL};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub qdrant: QdrantConfig,
    #[serde(default)]
    pub rerank: RerankConfig,
    #[serde(default)]
    pub pipeline: PipelineSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
    pub embedding_model: String,
    pub temperature: f32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    pub url: String,
    pub collection: String,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:6334".to_string(),
            collection: "documentos_legales".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RerankConfig {
    pub url: String,
    pub model: String,
    pub top_n: usize,
    pub api_key: Option<String>,
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RERANK_URL.to_string(),
            model: DEFAULT_RERANK_MODEL.to_string(),
            top_n: crate::rerank::DEFAULT_TOP_N,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSection {
    pub top_k: usize,
    pub naive_top_k: usize,
    pub enable_step_back: bool,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            top_k: 15,
            naive_top_k: 5,
            enable_step_back: false,
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path()?)
    }

    pub fn load_from(config_path: PathBuf) -> Result<Self> {
        if !config_path.exists() {
            let config = Config::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(&config_path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &PathBuf) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(config_path, toml_string)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .context("Could not determine home directory")?;

        Ok(home.join(".lexrag").join("config.toml"))
    }
}

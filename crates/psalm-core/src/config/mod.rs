mod chunking_config;
pub mod defaults;
mod embedding_config;
mod generation_config;
mod index_config;
mod observability_config;
mod retrieval_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use chunking_config::ChunkingConfig;
pub use embedding_config::EmbeddingConfig;
pub use generation_config::GenerationConfig;
pub use index_config::{IndexConfig, StalenessPolicy};
pub use observability_config::ObservabilityConfig;
pub use retrieval_config::RetrievalConfig;

use crate::errors::{PsalmError, PsalmResult};

/// Top-level configuration. Every section falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PsalmConfig {
    pub embedding: EmbeddingConfig,
    pub generation: GenerationConfig,
    pub index: IndexConfig,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
    pub observability: ObservabilityConfig,
}

impl PsalmConfig {
    /// Parse a TOML document. Missing sections and keys keep their defaults.
    pub fn from_toml(input: &str) -> PsalmResult<Self> {
        toml::from_str(input).map_err(|e| PsalmError::ConfigError {
            reason: e.to_string(),
        })
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: &Path) -> PsalmResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| PsalmError::ConfigError {
            reason: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml(&raw)
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> PsalmResult<Self> {
        self.apply_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Recognised: `OLLAMA_HOST`, `OLLAMA_EMBED_MODEL`, `OLLAMA_LLM_MODEL`,
    /// `INDEX_PATH`, `CORPUS_PATH`, `PSALM_TIMEOUT_SECS`.
    pub fn apply_env_overrides<F>(mut self, lookup: F) -> PsalmResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("OLLAMA_HOST") {
            let host = host.trim_end_matches('/').to_string();
            self.embedding.base_url = host.clone();
            self.generation.base_url = host;
        }
        if let Some(model) = lookup("OLLAMA_EMBED_MODEL") {
            self.embedding.model = model;
        }
        if let Some(model) = lookup("OLLAMA_LLM_MODEL") {
            self.generation.model = model;
        }
        if let Some(path) = lookup("INDEX_PATH") {
            self.index.path = path;
        }
        if let Some(path) = lookup("CORPUS_PATH") {
            self.index.corpus_path = path;
        }
        if let Some(raw) = lookup("PSALM_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| PsalmError::ConfigError {
                reason: format!("PSALM_TIMEOUT_SECS must be an integer, got {raw:?}"),
            })?;
            self.embedding.timeout_secs = secs;
            self.generation.timeout_secs = secs;
        }
        Ok(self)
    }
}

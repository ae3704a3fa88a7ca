use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding capability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding provider: "ollama" or "hashing".
    pub provider: String,
    /// Model name sent to the provider and recorded in the index header.
    pub model: String,
    /// Base URL of the local model service.
    pub base_url: String,
    /// Upper bound for a single embed call (seconds).
    pub timeout_secs: u64,
    /// Units per embed request during index builds.
    pub batch_size: usize,
    /// Expected dimensionality. Required for "hashing"; validated for "ollama" when set.
    pub dimensions: Option<usize>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_EMBEDDING_PROVIDER.to_string(),
            model: defaults::DEFAULT_EMBED_MODEL.to_string(),
            base_url: defaults::DEFAULT_OLLAMA_HOST.to_string(),
            timeout_secs: defaults::DEFAULT_CAPABILITY_TIMEOUT_SECS,
            batch_size: defaults::DEFAULT_EMBEDDING_BATCH_SIZE,
            dimensions: None,
        }
    }
}

//! Embedder registry.
//!
//! The provider is chosen explicitly by configuration:
//! - `ollama`: local Ollama service (default)
//! - `hashing`: deterministic feature hashing, no service required

pub mod hashing_embedder;
pub mod ollama_embedder;

pub use hashing_embedder::HashingEmbedder;
pub use ollama_embedder::OllamaEmbedder;

use psalm_core::config::{defaults, EmbeddingConfig};
use psalm_core::errors::{InputError, PsalmError, PsalmResult};
use psalm_core::traits::IEmbedder;
use tracing::info;

/// Create the configured embedder. Unknown providers are a config error.
pub fn create_embedder(config: &EmbeddingConfig) -> PsalmResult<Box<dyn IEmbedder>> {
    match config.provider.as_str() {
        "ollama" => {
            let provider = OllamaEmbedder::from_config(config)?;
            info!(provider = "ollama", model = %config.model, "embedder configured");
            Ok(Box::new(provider))
        }
        "hashing" => {
            let dims = config
                .dimensions
                .unwrap_or(defaults::DEFAULT_HASHING_DIMENSIONS);
            info!(provider = "hashing", dims, "embedder configured");
            Ok(Box::new(HashingEmbedder::new(dims)))
        }
        other => Err(PsalmError::ConfigError {
            reason: format!("unknown embedding provider {other:?} (expected \"ollama\" or \"hashing\")"),
        }),
    }
}

/// Reject blank input before it reaches a provider.
pub(crate) fn ensure_non_empty(text: &str) -> PsalmResult<()> {
    if text.trim().is_empty() {
        return Err(InputError::EmptyText.into());
    }
    Ok(())
}

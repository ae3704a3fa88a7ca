use serde::{Deserialize, Serialize};

use super::defaults;

/// Reflection generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// LLM model name.
    pub model: String,
    /// Base URL of the local model service.
    pub base_url: String,
    /// Upper bound for a single generate call (seconds).
    pub timeout_secs: u64,
    /// System prompt framing the guide's voice.
    pub system_prompt: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: defaults::DEFAULT_LLM_MODEL.to_string(),
            base_url: defaults::DEFAULT_OLLAMA_HOST.to_string(),
            timeout_secs: defaults::DEFAULT_CAPABILITY_TIMEOUT_SECS,
            system_prompt: defaults::DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

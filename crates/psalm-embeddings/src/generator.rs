//! Ollama reflection generator.
//!
//! Calls `POST {base_url}/api/generate` without streaming. The returned text
//! is trimmed and handed back unparsed; emptiness is judged by the caller.

use std::time::Duration;

use psalm_core::config::GenerationConfig;
use psalm_core::errors::{Capability, CapabilityError, CapabilityFailure, PsalmResult};
use psalm_core::traits::IReflectionGenerator;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http;

/// Ollama text generation provider.
pub struct OllamaGenerator {
    client: Client,
    base_url: String,
    model: String,
    system_prompt: String,
}

#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    system: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl OllamaGenerator {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        timeout: Duration,
    ) -> PsalmResult<Self> {
        Ok(Self {
            client: http::build_client(Capability::Generation, timeout)?,
            base_url: base_url.into(),
            model: model.into(),
            system_prompt: system_prompt.into(),
        })
    }

    pub fn from_config(config: &GenerationConfig) -> PsalmResult<Self> {
        Self::new(
            config.base_url.clone(),
            config.model.clone(),
            config.system_prompt.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// User prompt sent alongside the system prompt.
    fn compose_prompt(passage: &str, intent: &str) -> String {
        format!("{}\n\nSelected Scripture:\n{}", intent.trim(), passage.trim())
    }
}

impl IReflectionGenerator for OllamaGenerator {
    fn generate(&self, passage: &str, intent: &str) -> PsalmResult<String> {
        let url = http::endpoint(&self.base_url, "/api/generate");
        let request = OllamaGenerateRequest {
            model: &self.model,
            prompt: Self::compose_prompt(passage, intent),
            system: &self.system_prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| http::transport_failure(Capability::Generation, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CapabilityError::generation(
                CapabilityFailure::Unreachable,
                format!("Ollama returned {status}: {body}"),
            )
            .into());
        }

        let body: OllamaGenerateResponse = response.json().map_err(|e| {
            CapabilityError::generation(http::classify(&e), format!("Ollama JSON parse error: {e}"))
        })?;

        debug!(model = %self.model, chars = body.response.len(), "reflection generated");
        Ok(body.response.trim().to_string())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Create the reflection generator from configuration.
pub fn create_generator(config: &GenerationConfig) -> PsalmResult<Box<dyn IReflectionGenerator>> {
    Ok(Box::new(OllamaGenerator::from_config(config)?))
}

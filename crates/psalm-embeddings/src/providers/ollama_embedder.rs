//! Ollama local embedding provider.
//!
//! Calls `POST {base_url}/api/embed` with a batch of inputs. Every request is
//! bounded by the configured timeout; a timeout is an embedding failure.

use std::time::Duration;

use psalm_core::config::EmbeddingConfig;
use psalm_core::errors::{Capability, CapabilityError, CapabilityFailure, PsalmResult};
use psalm_core::traits::IEmbedder;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::ensure_non_empty;
use crate::http;

/// Ollama embedding provider.
pub struct OllamaEmbedder {
    client: Client,
    base_url: String,
    model: String,
    dimensions: Option<usize>,
}

#[derive(Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaEmbedder {
    /// Create a provider. `dimensions`, when set, is enforced on every response.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        dimensions: Option<usize>,
        timeout: Duration,
    ) -> PsalmResult<Self> {
        Ok(Self {
            client: http::build_client(Capability::Embedding, timeout)?,
            base_url: base_url.into(),
            model: model.into(),
            dimensions,
        })
    }

    pub fn from_config(config: &EmbeddingConfig) -> PsalmResult<Self> {
        Self::new(
            config.base_url.clone(),
            config.model.clone(),
            config.dimensions,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Check if the Ollama server is reachable.
    pub fn health_check(&self) -> bool {
        let url = http::endpoint(&self.base_url, "/api/tags");
        match self.client.get(&url).send() {
            Ok(resp) if resp.status().is_success() => {
                debug!(model = %self.model, "Ollama health check passed");
                true
            }
            Ok(resp) => {
                warn!(status = %resp.status(), "Ollama health check failed");
                false
            }
            Err(e) => {
                warn!(error = %e, "Ollama unreachable");
                false
            }
        }
    }

    fn request_embeddings(&self, texts: &[String]) -> PsalmResult<Vec<Vec<f32>>> {
        for text in texts {
            ensure_non_empty(text)?;
        }
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = http::endpoint(&self.base_url, "/api/embed");
        let request = OllamaEmbedRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| http::transport_failure(Capability::Embedding, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CapabilityError::embedding(
                CapabilityFailure::Unreachable,
                format!("Ollama returned {status}: {body}"),
            )
            .into());
        }

        let body: OllamaEmbedResponse = response.json().map_err(|e| {
            CapabilityError::embedding(
                http::classify(&e),
                format!("Ollama JSON parse error: {e}"),
            )
        })?;

        self.validate(texts.len(), body.embeddings)
    }

    /// Reject anything that would corrupt ranking downstream.
    fn validate(&self, expected: usize, embeddings: Vec<Vec<f32>>) -> PsalmResult<Vec<Vec<f32>>> {
        if embeddings.len() != expected {
            return Err(CapabilityError::embedding(
                CapabilityFailure::MalformedResponse,
                format!("expected {expected} embeddings, got {}", embeddings.len()),
            )
            .into());
        }

        let width = embeddings.first().map(Vec::len).unwrap_or(0);
        for vector in &embeddings {
            if vector.is_empty() {
                return Err(CapabilityError::embedding(
                    CapabilityFailure::MalformedResponse,
                    "empty embedding vector",
                )
                .into());
            }
            if vector.len() != width {
                return Err(CapabilityError::embedding(
                    CapabilityFailure::MalformedResponse,
                    format!("ragged batch: {} vs {width} dimensions", vector.len()),
                )
                .into());
            }
            if vector.iter().any(|x| !x.is_finite()) {
                return Err(CapabilityError::embedding(
                    CapabilityFailure::MalformedResponse,
                    "non-finite value in embedding",
                )
                .into());
            }
        }

        if let Some(expected_dims) = self.dimensions {
            if width != expected_dims {
                return Err(CapabilityError::DimensionMismatch {
                    expected: expected_dims,
                    actual: width,
                }
                .into());
            }
        }

        debug!(count = embeddings.len(), dims = width, "Ollama embeddings received");
        Ok(embeddings)
    }
}

impl IEmbedder for OllamaEmbedder {
    fn embed(&self, text: &str) -> PsalmResult<Vec<f32>> {
        let input = [text.to_string()];
        let mut results = self.request_embeddings(&input)?;
        results.pop().ok_or_else(|| {
            CapabilityError::embedding(CapabilityFailure::MalformedResponse, "empty Ollama response")
                .into()
        })
    }

    fn embed_batch(&self, texts: &[String]) -> PsalmResult<Vec<Vec<f32>>> {
        self.request_embeddings(texts)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }
}

//! Shared blocking HTTP plumbing for the Ollama adapters.

use std::time::Duration;

use psalm_core::errors::{Capability, CapabilityError, CapabilityFailure, PsalmResult};
use reqwest::blocking::Client;

/// Build a blocking client whose every request is bounded by `timeout`.
pub(crate) fn build_client(capability: Capability, timeout: Duration) -> PsalmResult<Client> {
    Client::builder()
        .timeout(timeout)
        .gzip(true)
        .build()
        .map_err(|e| failure(capability, CapabilityFailure::Unreachable, e.to_string()))
}

/// Map a transport error onto the capability failure taxonomy.
pub(crate) fn classify(err: &reqwest::Error) -> CapabilityFailure {
    if err.is_timeout() {
        CapabilityFailure::Timeout
    } else if err.is_decode() || err.is_body() {
        CapabilityFailure::MalformedResponse
    } else {
        CapabilityFailure::Unreachable
    }
}

pub(crate) fn failure(
    capability: Capability,
    kind: CapabilityFailure,
    reason: impl Into<String>,
) -> psalm_core::PsalmError {
    match capability {
        Capability::Embedding => CapabilityError::embedding(kind, reason).into(),
        Capability::Generation => CapabilityError::generation(kind, reason).into(),
    }
}

pub(crate) fn transport_failure(capability: Capability, err: reqwest::Error) -> psalm_core::PsalmError {
    failure(capability, classify(&err), format!("Ollama HTTP error: {err}"))
}

/// Join a base URL and an API path without doubling slashes.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two out-of-process capabilities the core depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Embedding,
    Generation,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Embedding => f.write_str("embedding"),
            Capability::Generation => f.write_str("generation"),
        }
    }
}

/// How a capability call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityFailure {
    Timeout,
    Unreachable,
    MalformedResponse,
}

impl fmt::Display for CapabilityFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityFailure::Timeout => f.write_str("timed out"),
            CapabilityFailure::Unreachable => f.write_str("service unreachable"),
            CapabilityFailure::MalformedResponse => f.write_str("malformed response"),
        }
    }
}

/// Failures of the embedding or generation capability.
///
/// Non-recoverable for the current call. Never replaced by a default value.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("embedding unavailable ({kind}): {reason}")]
    EmbeddingUnavailable {
        kind: CapabilityFailure,
        reason: String,
    },

    #[error("generation unavailable ({kind}): {reason}")]
    GenerationUnavailable {
        kind: CapabilityFailure,
        reason: String,
    },

    #[error("generator returned an empty reflection")]
    EmptyReflection,

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl CapabilityError {
    /// Which capability this failure belongs to.
    pub fn capability(&self) -> Capability {
        match self {
            CapabilityError::EmbeddingUnavailable { .. }
            | CapabilityError::DimensionMismatch { .. } => Capability::Embedding,
            CapabilityError::GenerationUnavailable { .. } | CapabilityError::EmptyReflection => {
                Capability::Generation
            }
        }
    }

    pub fn embedding(kind: CapabilityFailure, reason: impl Into<String>) -> Self {
        CapabilityError::EmbeddingUnavailable {
            kind,
            reason: reason.into(),
        }
    }

    pub fn generation(kind: CapabilityFailure, reason: impl Into<String>) -> Self {
        CapabilityError::GenerationUnavailable {
            kind,
            reason: reason.into(),
        }
    }
}

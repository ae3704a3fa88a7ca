use serde::{Deserialize, Serialize};

use super::{CapabilityError, IndexError, InputError, StageError};

/// Workspace-wide result alias.
pub type PsalmResult<T> = Result<T, PsalmError>;

/// Top-level error. Every subsystem error folds into this.
#[derive(Debug, thiserror::Error)]
pub enum PsalmError {
    #[error("input error: {0}")]
    InputError(#[from] InputError),

    #[error("capability unavailable: {0}")]
    CapabilityError(#[from] CapabilityError),

    #[error("index integrity error: {0}")]
    IndexError(#[from] IndexError),

    #[error("out of order: {0}")]
    StageError(#[from] StageError),

    #[error("session busy: another transition is still in flight")]
    SessionBusy,

    #[error("index build incomplete after {embedded}/{total} units: {source}")]
    BuildIncomplete {
        embedded: usize,
        total: usize,
        #[source]
        source: CapabilityError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("config error: {reason}")]
    ConfigError { reason: String },
}

/// Coarse error category for the calling layer. Each maps to one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Input,
    CapabilityUnavailable,
    IndexIntegrity,
    OutOfOrder,
    Busy,
    Internal,
}

impl ErrorCategory {
    /// A stable sentence that explains the cause without exposing internals.
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorCategory::Input => "Write something first. Your words are the doorway.",
            ErrorCategory::CapabilityUnavailable => {
                "The local language service is unavailable. Check that it is running and try again."
            }
            ErrorCategory::IndexIntegrity => {
                "The passage index is missing or damaged. Rebuild it before seeking."
            }
            ErrorCategory::OutOfOrder => "That step is not open yet. Follow the path in order.",
            ErrorCategory::Busy => "Still working on the previous step. Please wait a moment.",
            ErrorCategory::Internal => "Something went wrong on this machine. See the logs.",
        }
    }
}

impl PsalmError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PsalmError::InputError(_) => ErrorCategory::Input,
            PsalmError::CapabilityError(_) | PsalmError::BuildIncomplete { .. } => {
                ErrorCategory::CapabilityUnavailable
            }
            PsalmError::IndexError(_) => ErrorCategory::IndexIntegrity,
            PsalmError::StageError(_) => ErrorCategory::OutOfOrder,
            PsalmError::SessionBusy => ErrorCategory::Busy,
            PsalmError::Io(_)
            | PsalmError::SerializationError(_)
            | PsalmError::ConfigError { .. } => ErrorCategory::Internal,
        }
    }

    /// Shortcut for [`ErrorCategory::user_message`].
    pub fn user_message(&self) -> &'static str {
        self.category().user_message()
    }
}

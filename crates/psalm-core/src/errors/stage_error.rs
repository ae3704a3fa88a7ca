use crate::models::Stage;

/// Out-of-order journey actions. The session is left unchanged.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("`{operation}` is not available at the {stage} stage")]
    StageGuard {
        operation: &'static str,
        stage: Stage,
    },

    #[error("no retrieval has been performed in this session yet")]
    NoRetrievalYet,

    #[error("unit {unit_id} is not among the most recent results")]
    InvalidSelection { unit_id: String },
}

/// Bad input rejected before any side effect.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("corpus is empty or contains only whitespace")]
    EmptyCorpus,

    #[error("query is empty or contains only whitespace")]
    EmptyQuery,

    #[error("text to embed is empty")]
    EmptyText,

    #[error("k must be at least 1, got {k}")]
    InvalidK { k: usize },

    #[error("no psalm verses found in source ({rows} rows scanned)")]
    NoPsalms { rows: usize },

    #[error("malformed corpus source: {reason}")]
    MalformedSource { reason: String },
}

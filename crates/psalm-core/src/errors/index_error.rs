/// Index artifact integrity errors. Fatal for the load attempt.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("no index found at {path}")]
    Missing { path: String },

    #[error("index at {path} is corrupt: {details}")]
    Corrupt { path: String, details: String },

    #[error("index at {path} is stale: built from corpus {indexed}, current corpus is {current}")]
    Stale {
        path: String,
        indexed: String,
        current: String,
    },
}

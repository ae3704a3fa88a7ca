use serde::{Deserialize, Serialize};

use super::defaults;

/// What to do when the corpus no longer matches the index checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalenessPolicy {
    /// Log a warning and load anyway.
    #[default]
    Warn,
    /// Refuse to load; the caller must rebuild.
    Refuse,
}

/// Index location and load policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Path of the persisted index artifact.
    pub path: String,
    /// Path of the corpus text the index is built from.
    pub corpus_path: String,
    pub staleness_policy: StalenessPolicy,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: defaults::DEFAULT_INDEX_PATH.to_string(),
            corpus_path: defaults::DEFAULT_CORPUS_PATH.to_string(),
            staleness_policy: StalenessPolicy::default(),
        }
    }
}

use serde::{Deserialize, Serialize};

use super::defaults;

/// Psalter preparation: how verses are grouped into passages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Verses per block for long psalms.
    pub block_verses: usize,
    /// Psalms with at most this many verses stay whole.
    pub whole_if_at_most: usize,
    /// Prefix each verse line with its number.
    pub include_verse_numbers: bool,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            block_verses: defaults::DEFAULT_BLOCK_VERSES,
            whole_if_at_most: defaults::DEFAULT_WHOLE_IF_AT_MOST,
            include_verse_numbers: defaults::DEFAULT_INCLUDE_VERSE_NUMBERS,
        }
    }
}

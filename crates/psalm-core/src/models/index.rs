use serde::{Deserialize, Serialize};

/// Header of a persisted index artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexHeader {
    pub format_version: u32,
    pub embedding_model_name: String,
    pub dimensionality: usize,
    pub unit_count: usize,
    pub corpus_checksum: String,
}

/// One unit's vector, in chunk order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    pub unit_id: String,
    pub order: usize,
    pub text: String,
    pub vector: Vec<f32>,
}

impl EmbeddingRecord {
    pub fn passage(&self) -> &str {
        self.text.trim()
    }
}

/// The full persisted artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub header: IndexHeader,
    pub records: Vec<EmbeddingRecord>,
}

use serde::{Deserialize, Serialize};

/// One ranked hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalHit {
    pub unit_id: String,
    pub order: usize,
    /// Cosine similarity in [-1, 1].
    pub score: f64,
}

/// Ranked hits, score descending, ties by ascending order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub hits: Vec<RetrievalHit>,
}

impl RetrievalResult {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn contains(&self, unit_id: &str) -> bool {
        self.hits.iter().any(|h| h.unit_id == unit_id)
    }

    pub fn unit_ids(&self) -> Vec<&str> {
        self.hits.iter().map(|h| h.unit_id.as_str()).collect()
    }
}

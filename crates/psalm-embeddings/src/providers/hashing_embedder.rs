//! Deterministic feature-hashing embedder.
//!
//! Hashes terms into fixed-dimension buckets weighted by term frequency.
//! No external service. Used for offline builds and reproducible tests.

use std::collections::BTreeMap;

use psalm_core::errors::PsalmResult;
use psalm_core::traits::IEmbedder;

use super::ensure_non_empty;

/// Feature-hashing embedder.
///
/// Same text always yields the same unit-length vector, so rebuilding an
/// index with it is byte-for-byte reproducible.
pub struct HashingEmbedder {
    dimensions: usize,
    model_name: String,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        let dimensions = dimensions.max(1);
        Self {
            dimensions,
            model_name: format!("hashing-{dimensions}"),
        }
    }

    /// Hash a term into a bucket index using FNV-1a.
    fn hash_term(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h as usize) % dims
    }

    /// Tokenize text into lowercase alphanumeric terms of two or more chars.
    ///
    /// Text with no such term (`"O"`, `"!"`) falls back to its whitespace
    /// separated pieces, so non-blank input never hashes to the zero vector.
    fn tokenize(text: &str) -> Vec<String> {
        let terms: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|s| s.chars().count() >= 2)
            .map(|s| s.to_lowercase())
            .collect();
        if !terms.is_empty() {
            return terms;
        }
        text.split_whitespace().map(str::to_lowercase).collect()
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        let mut vec = vec![0.0f32; self.dimensions];
        if tokens.is_empty() {
            return vec;
        }

        // BTreeMap keeps the accumulation order fixed, so float sums are reproducible.
        let mut tf: BTreeMap<&str, f32> = BTreeMap::new();
        for tok in &tokens {
            *tf.entry(tok.as_str()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        for (term, count) in &tf {
            let idf = 1.0 + (term.len() as f32).ln();
            vec[Self::hash_term(term, self.dimensions)] += (count / total) * idf;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

impl IEmbedder for HashingEmbedder {
    fn embed(&self, text: &str) -> PsalmResult<Vec<f32>> {
        ensure_non_empty(text)?;
        Ok(self.vectorize(text))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimensions(&self) -> Option<usize> {
        Some(self.dimensions)
    }
}

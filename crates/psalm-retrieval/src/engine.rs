//! Retriever: query text to ranked hits.
//!
//! Scoring is exhaustive over the index. The result is a pure function of the
//! query and the loaded index, so equal inputs always rank identically.

use psalm_core::errors::{CapabilityError, CapabilityFailure, InputError, PsalmResult};
use psalm_core::models::{RetrievalHit, RetrievalResult};
use psalm_core::traits::IEmbedder;
use psalm_core::PsalmError;
use psalm_index::IndexStore;
use psalm_observability::events;
use tracing::debug;

use crate::similarity::cosine_similarity;

pub struct Retriever<'a> {
    store: &'a IndexStore,
    embedder: &'a dyn IEmbedder,
}

impl<'a> Retriever<'a> {
    pub fn new(store: &'a IndexStore, embedder: &'a dyn IEmbedder) -> Self {
        Self { store, embedder }
    }

    /// Embed `query_text` and return at most `k` hits.
    ///
    /// Input is validated before the embedder is called.
    pub fn retrieve(&self, query_text: &str, k: usize) -> PsalmResult<RetrievalResult> {
        if k < 1 {
            return Err(InputError::InvalidK { k }.into());
        }
        let query = query_text.trim();
        if query.is_empty() {
            return Err(InputError::EmptyQuery.into());
        }

        let span = psalm_observability::retrieval_span!(k);
        let _guard = span.enter();

        let vector = self.embedder.embed(query).inspect_err(|e| {
            if let PsalmError::CapabilityError(c) = e {
                events::capability_failed(c.capability(), &c.to_string());
            }
        })?;

        let expected = self.store.header().dimensionality;
        if vector.len() != expected {
            return Err(CapabilityError::DimensionMismatch {
                expected,
                actual: vector.len(),
            }
            .into());
        }

        self.retrieve_vector(&vector, k)
    }

    /// Rank every record against an already embedded query.
    pub fn retrieve_vector(&self, query_vector: &[f32], k: usize) -> PsalmResult<RetrievalResult> {
        if k < 1 {
            return Err(InputError::InvalidK { k }.into());
        }
        let expected = self.store.header().dimensionality;
        if query_vector.len() != expected {
            return Err(CapabilityError::DimensionMismatch {
                expected,
                actual: query_vector.len(),
            }
            .into());
        }
        if query_vector.iter().any(|x| !x.is_finite()) {
            let err = CapabilityError::embedding(
                CapabilityFailure::MalformedResponse,
                "non-finite value in query vector",
            );
            events::capability_failed(err.capability(), &err.to_string());
            return Err(err.into());
        }

        let mut hits: Vec<RetrievalHit> = self
            .store
            .all()
            .iter()
            .map(|record| RetrievalHit {
                unit_id: record.unit_id.clone(),
                order: record.order,
                score: cosine_similarity(query_vector, &record.vector),
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.order.cmp(&b.order)));
        hits.truncate(k);

        debug!(
            returned = hits.len(),
            top_score = hits.first().map(|h| h.score),
            "retrieval ranked"
        );
        Ok(RetrievalResult { hits })
    }
}

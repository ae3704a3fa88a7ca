//! Index builder: chunk, embed in batches, publish atomically.

use std::path::Path;

use psalm_core::constants::{BUILD_PROGRESS_INTERVAL, INDEX_FORMAT_VERSION};
use psalm_core::errors::{CapabilityError, CapabilityFailure, PsalmError, PsalmResult};
use psalm_core::models::{corpus_checksum, EmbeddingRecord, Index, IndexHeader};
use psalm_core::traits::IEmbedder;
use psalm_observability::events;
use tracing::debug;

use crate::{chunker, format};

/// One-shot builder over an embedder.
pub struct IndexBuilder<'a> {
    embedder: &'a dyn IEmbedder,
    batch_size: usize,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(embedder: &'a dyn IEmbedder, batch_size: usize) -> Self {
        Self {
            embedder,
            batch_size: batch_size.max(1),
        }
    }

    /// Build an in-memory index. Nothing is written.
    ///
    /// Any embedding failure aborts with [`PsalmError::BuildIncomplete`].
    pub fn build(&self, corpus_text: &str) -> PsalmResult<Index> {
        let units = chunker::chunk(corpus_text)?;
        let total = units.len();
        let model = self.embedder.model_name().to_string();
        let span = psalm_observability::build_span!(model.as_str(), total);
        let _guard = span.enter();

        let mut records: Vec<EmbeddingRecord> = Vec::with_capacity(total);
        let mut dimensionality = self.embedder.dimensions();

        for batch in units.chunks(self.batch_size) {
            let passages: Vec<String> = batch.iter().map(|u| u.passage().to_string()).collect();
            let vectors = psalm_observability::embedding_span!(model.as_str(), passages.len())
                .in_scope(|| self.embedder.embed_batch(&passages))
                .map_err(|e| incomplete(records.len(), total, e))?;

            if vectors.len() != batch.len() {
                return Err(abort(
                    records.len(),
                    total,
                    CapabilityError::embedding(
                        CapabilityFailure::MalformedResponse,
                        format!("asked for {} vectors, got {}", batch.len(), vectors.len()),
                    ),
                ));
            }

            for (unit, vector) in batch.iter().zip(vectors) {
                let expected = *dimensionality.get_or_insert(vector.len());
                if vector.is_empty() || vector.len() != expected {
                    return Err(abort(
                        records.len(),
                        total,
                        CapabilityError::DimensionMismatch {
                            expected,
                            actual: vector.len(),
                        },
                    ));
                }
                if vector.iter().any(|x| !x.is_finite()) {
                    return Err(abort(
                        records.len(),
                        total,
                        CapabilityError::embedding(
                            CapabilityFailure::MalformedResponse,
                            format!("non-finite value in vector for {}", unit.id),
                        ),
                    ));
                }
                records.push(EmbeddingRecord {
                    unit_id: unit.id.clone(),
                    order: unit.order,
                    text: unit.text.clone(),
                    vector,
                });
                if records.len() % BUILD_PROGRESS_INTERVAL == 0 {
                    events::build_progress(records.len(), total);
                }
            }
            debug!(embedded = records.len(), total, "batch embedded");
        }

        let header = IndexHeader {
            format_version: INDEX_FORMAT_VERSION,
            embedding_model_name: model,
            dimensionality: dimensionality.unwrap_or_default(),
            unit_count: records.len(),
            corpus_checksum: corpus_checksum(units.iter().map(|u| u.text.as_str())),
        };
        Ok(Index { header, records })
    }

    /// Read `corpus_source`, build, and atomically publish to `output_path`.
    ///
    /// On failure the previous artifact at `output_path`, if any, is untouched.
    pub fn build_index(&self, corpus_source: &Path, output_path: &Path) -> PsalmResult<IndexHeader> {
        let corpus_text = std::fs::read_to_string(corpus_source)?;
        let index = self.build(&corpus_text)?;
        format::write_atomic(output_path, &index)?;

        events::index_built(
            &output_path.display().to_string(),
            index.header.unit_count,
            index.header.dimensionality,
            &index.header.embedding_model_name,
        );
        Ok(index.header)
    }
}

fn abort(embedded: usize, total: usize, source: CapabilityError) -> PsalmError {
    events::capability_failed(source.capability(), &source.to_string());
    PsalmError::BuildIncomplete {
        embedded,
        total,
        source,
    }
}

/// Capability failures become `BuildIncomplete`; anything else passes through.
fn incomplete(embedded: usize, total: usize, err: PsalmError) -> PsalmError {
    match err {
        PsalmError::CapabilityError(source) => abort(embedded, total, source),
        other => other,
    }
}

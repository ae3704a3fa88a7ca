//! Read-only index store.
//!
//! Loaded once, validated, then shared by reference or `Arc`. Nothing mutates
//! it after load.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use psalm_core::config::StalenessPolicy;
use psalm_core::errors::{IndexError, PsalmResult};
use psalm_core::models::{corpus_checksum, EmbeddingRecord, Index, IndexHeader};
use psalm_observability::events;

use crate::format;

#[derive(Debug)]
pub struct IndexStore {
    path: PathBuf,
    index: Index,
    positions: HashMap<String, usize>,
}

impl IndexStore {
    /// Load and validate the artifact at `path`.
    pub fn load(path: impl AsRef<Path>) -> PsalmResult<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(IndexError::Missing { path: display }.into());
            }
            Err(e) => return Err(e.into()),
        };
        let index = format::from_slice(&display, &bytes)?;

        events::index_loaded(
            &display,
            index.header.unit_count,
            &index.header.embedding_model_name,
        );
        Ok(Self::assemble(path.to_path_buf(), index))
    }

    /// Load, then compare the header checksum against `corpus_text`.
    pub fn load_checked(
        path: impl AsRef<Path>,
        corpus_text: &str,
        policy: StalenessPolicy,
    ) -> PsalmResult<Self> {
        let store = Self::load(path)?;
        let current = corpus_checksum([corpus_text]);
        if current != store.header().corpus_checksum {
            let display = store.path.display().to_string();
            match policy {
                StalenessPolicy::Warn => {
                    events::index_stale(&display, &store.header().corpus_checksum, &current);
                }
                StalenessPolicy::Refuse => {
                    return Err(IndexError::Stale {
                        path: display,
                        indexed: store.header().corpus_checksum.clone(),
                        current,
                    }
                    .into());
                }
            }
        }
        Ok(store)
    }

    /// Wrap an in-memory index after the same validation a load performs.
    pub fn from_index(index: Index) -> PsalmResult<Self> {
        format::validate("<memory>", &index)?;
        Ok(Self::assemble(PathBuf::from("<memory>"), index))
    }

    fn assemble(path: PathBuf, index: Index) -> Self {
        let positions = index
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.unit_id.clone(), i))
            .collect();
        Self {
            path,
            index,
            positions,
        }
    }

    pub fn header(&self) -> &IndexHeader {
        &self.index.header
    }

    /// Passage text for `unit_id`, trimmed of separators.
    pub fn lookup(&self, unit_id: &str) -> Option<&str> {
        self.unit(unit_id).map(EmbeddingRecord::passage)
    }

    pub fn unit(&self, unit_id: &str) -> Option<&EmbeddingRecord> {
        self.positions.get(unit_id).map(|&i| &self.index.records[i])
    }

    /// All records in chunk order.
    pub fn all(&self) -> &[EmbeddingRecord] {
        &self.index.records
    }

    pub fn len(&self) -> usize {
        self.index.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.records.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub mod build;
pub mod journey;
pub mod prepare;
pub mod search;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use psalm_core::PsalmConfig;
use psalm_index::IndexStore;

fn or_config(path: Option<&Path>, configured: &str) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(configured))
}

/// Load the configured index, applying the staleness policy when the corpus
/// file is present.
pub(crate) fn open_store(config: &PsalmConfig) -> anyhow::Result<Arc<IndexStore>> {
    let path = PathBuf::from(&config.index.path);
    let store = match std::fs::read_to_string(&config.index.corpus_path) {
        Ok(corpus) => IndexStore::load_checked(&path, &corpus, config.index.staleness_policy),
        Err(_) => IndexStore::load(&path),
    }
    .with_context(|| format!("opening index {}", path.display()))?;
    Ok(Arc::new(store))
}

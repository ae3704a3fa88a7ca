use std::path::Path;

use anyhow::Context;
use psalm_core::PsalmConfig;
use psalm_index::{chunk, prepare_psalter};
use tracing::info;

pub fn run(config: &PsalmConfig, bible: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(bible)
        .with_context(|| format!("reading {}", bible.display()))?;
    let corpus = prepare_psalter(&raw, &config.chunking)?;
    let units = chunk(&corpus)?.len();

    let output = super::or_config(output, &config.index.corpus_path);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output, corpus).with_context(|| format!("writing {}", output.display()))?;

    info!(units, path = %output.display(), "psalter corpus written");
    println!("Wrote {units} passages to {}", output.display());
    Ok(())
}

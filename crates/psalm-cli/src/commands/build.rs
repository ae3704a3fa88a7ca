use std::path::Path;

use psalm_core::PsalmConfig;
use psalm_embeddings::create_embedder;
use psalm_index::IndexBuilder;

pub fn run(config: &PsalmConfig, corpus: Option<&Path>, output: Option<&Path>) -> anyhow::Result<()> {
    let corpus = super::or_config(corpus, &config.index.corpus_path);
    let output = super::or_config(output, &config.index.path);

    let embedder = create_embedder(&config.embedding)?;
    let header = IndexBuilder::new(embedder.as_ref(), config.embedding.batch_size)
        .build_index(&corpus, &output)?;

    println!(
        "Indexed {} passages ({} dimensions, model {}) into {}",
        header.unit_count,
        header.dimensionality,
        header.embedding_model_name,
        output.display()
    );
    Ok(())
}

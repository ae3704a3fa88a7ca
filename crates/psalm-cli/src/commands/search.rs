use psalm_core::errors::InputError;
use psalm_core::models::Mood;
use psalm_core::PsalmConfig;
use psalm_embeddings::create_embedder;
use psalm_embeddings::enrichment::enrich_query;
use psalm_retrieval::Retriever;

pub fn run(
    config: &PsalmConfig,
    query: &str,
    k: Option<usize>,
    mood: Mood,
    json: bool,
) -> anyhow::Result<()> {
    // Before enrichment: a mood prefix would make a blank query non-blank.
    if query.trim().is_empty() {
        return Err(InputError::EmptyQuery.into());
    }
    let k = k.unwrap_or(config.retrieval.default_k);
    let store = super::open_store(config)?;
    let embedder = create_embedder(&config.embedding)?;
    let result = Retriever::new(&store, embedder.as_ref()).retrieve(&enrich_query(query, mood), k)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    for (rank, hit) in result.hits.iter().enumerate() {
        println!("{}. {} (score {:.3})", rank + 1, hit.unit_id, hit.score);
        if let Some(passage) = store.lookup(&hit.unit_id) {
            for line in passage.lines() {
                println!("   {line}");
            }
        }
        println!();
    }
    Ok(())
}

//! Query enrichment: steer the query embedding with the seeker's mood.

use psalm_core::models::Mood;

/// Prepend the mood's thematic phrase to a query.
pub fn enrich_query(query: &str, mood: Mood) -> String {
    format!("{}{}", mood.query_prefix(), query.trim())
        .trim()
        .to_string()
}

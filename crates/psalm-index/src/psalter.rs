//! Psalter preparation: verse-level Bible JSON to chunkable corpus text.
//!
//! Input is a JSON array of rows `{book, chapter, verse, text}`. Output is one
//! passage per verse block, each opened by a `## Psalm {n}:{first}-{last}`
//! heading so the chunker gives it a stable id.

use std::collections::BTreeMap;

use psalm_core::config::ChunkingConfig;
use psalm_core::errors::{InputError, PsalmResult};
use serde_json::Value;
use tracing::{debug, info};

/// Verses of one psalm, ascending.
type Verses = Vec<(u32, String)>;

/// Render every psalm in `bible_json` as corpus text.
pub fn prepare_psalter(bible_json: &str, config: &ChunkingConfig) -> PsalmResult<String> {
    let rows: Vec<Value> = serde_json::from_str(bible_json).map_err(|e| {
        InputError::MalformedSource {
            reason: format!("expected a JSON array of verse rows: {e}"),
        }
    })?;

    let by_psalm = group_psalm_verses(&rows);
    if by_psalm.is_empty() {
        return Err(InputError::NoPsalms { rows: rows.len() }.into());
    }

    let mut blocks = Vec::new();
    for (psalm, verses) in &by_psalm {
        for block in split_blocks(verses, config) {
            blocks.push(render_block(*psalm, block, config.include_verse_numbers));
        }
    }

    info!(
        psalms = by_psalm.len(),
        blocks = blocks.len(),
        block_verses = config.block_verses,
        whole_if_at_most = config.whole_if_at_most,
        "psalter prepared"
    );
    Ok(blocks.join("\n"))
}

fn is_psalms_book(book: &str) -> bool {
    book.trim().to_lowercase().starts_with("psalm")
}

/// Integer field that may arrive as a number or a numeric string.
fn as_number(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn group_psalm_verses(rows: &[Value]) -> BTreeMap<u32, Verses> {
    let mut by_psalm: BTreeMap<u32, Verses> = BTreeMap::new();
    let mut skipped = 0usize;

    for row in rows {
        let Some(book) = row.get("book").and_then(Value::as_str) else {
            continue;
        };
        if !is_psalms_book(book) {
            continue;
        }
        let psalm = as_number(row.get("chapter"));
        let verse = as_number(row.get("verse"));
        // Verse text is collapsed to one line so a blank line can never split a block.
        let text = row
            .get("text")
            .and_then(Value::as_str)
            .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
            .unwrap_or_default();

        match (psalm, verse) {
            (Some(psalm), Some(verse)) if !text.is_empty() => {
                by_psalm.entry(psalm).or_default().push((verse, text));
            }
            _ => skipped += 1,
        }
    }

    for verses in by_psalm.values_mut() {
        verses.sort_by_key(|(v, _)| *v);
    }
    if skipped > 0 {
        debug!(skipped, "psalm rows without chapter, verse, or text skipped");
    }
    by_psalm
}

/// Whole psalm when short, otherwise consecutive non-overlapping blocks.
fn split_blocks<'a>(verses: &'a [(u32, String)], config: &ChunkingConfig) -> Vec<&'a [(u32, String)]> {
    if verses.len() <= config.whole_if_at_most {
        return vec![verses];
    }
    verses.chunks(config.block_verses.max(1)).collect()
}

fn render_block(psalm: u32, verses: &[(u32, String)], numbered: bool) -> String {
    let first = verses.first().map(|(v, _)| *v).unwrap_or_default();
    let last = verses.last().map(|(v, _)| *v).unwrap_or_default();

    let mut out = format!("## Psalm {psalm}:{first}-{last}\n");
    for (verse, text) in verses {
        if numbered {
            out.push_str(&format!("{verse}. {text}\n"));
        } else {
            out.push_str(text);
            out.push('\n');
        }
    }
    out
}

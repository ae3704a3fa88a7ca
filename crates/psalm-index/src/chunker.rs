//! Corpus chunking.
//!
//! A passage is a maximal run of non-blank lines. Each unit owns its passage
//! plus the blank lines that follow it, and the first unit also owns any
//! leading blank lines, so the ordered unit texts reconstruct the corpus
//! byte for byte.

use std::collections::HashSet;

use psalm_core::constants::{DUPLICATE_ID_SEPARATOR, HEADING_MARKER, POSITIONAL_ID_PREFIX};
use psalm_core::errors::{InputError, PsalmResult};
use psalm_core::models::CorpusUnit;

/// Split `corpus_text` into ordered, uniquely identified units.
pub fn chunk(corpus_text: &str) -> PsalmResult<Vec<CorpusUnit>> {
    if corpus_text.trim().is_empty() {
        return Err(InputError::EmptyCorpus.into());
    }

    let mut used = HashSet::new();
    let units = passage_spans(corpus_text)
        .into_iter()
        .enumerate()
        .map(|(order, (start, end))| {
            let text = &corpus_text[start..end];
            let base = heading_slug(text)
                .unwrap_or_else(|| format!("{POSITIONAL_ID_PREFIX}{}", order + 1));
            CorpusUnit {
                id: unique_id(base, &mut used),
                text: text.to_string(),
                order,
            }
        })
        .collect();

    Ok(units)
}

/// Byte ranges of each unit. Contiguous and covering the whole input.
fn passage_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    let mut has_content = false;
    let mut in_separator = false;

    for line in text.split_inclusive('\n') {
        let blank = line.trim().is_empty();
        if blank {
            if has_content {
                in_separator = true;
            }
        } else {
            if in_separator {
                spans.push((start, offset));
                start = offset;
                in_separator = false;
            }
            has_content = true;
        }
        offset += line.len();
    }
    spans.push((start, text.len()));
    spans
}

/// Slug of the passage heading, if its first line is one.
fn heading_slug(unit_text: &str) -> Option<String> {
    let first = unit_text.lines().find(|l| !l.trim().is_empty())?;
    let heading = first.trim_start().strip_prefix(HEADING_MARKER)?;
    let slug = heading
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    (!slug.is_empty()).then_some(slug)
}

fn unique_id(base: String, used: &mut HashSet<String>) -> String {
    if used.insert(base.clone()) {
        return base;
    }
    let mut k = 2;
    loop {
        let candidate = format!("{base}{DUPLICATE_ID_SEPARATOR}{k}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        k += 1;
    }
}

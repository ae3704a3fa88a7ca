use serde::{Deserialize, Serialize};

/// A retrievable chunk of corpus text.
///
/// `text` is the literal span of the source, separators included, so that the
/// ordered units reconstruct the corpus. Use [`CorpusUnit::passage`] for the
/// text that is embedded and shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusUnit {
    pub id: String,
    pub text: String,
    /// Canonical reading order (0-based). Tie-breaks and display only.
    pub order: usize,
}

impl CorpusUnit {
    pub fn passage(&self) -> &str {
        self.text.trim()
    }
}

/// blake3 hex digest of the concatenated unit texts.
///
/// Because units cover the corpus exactly, this equals the digest of the
/// corpus text itself.
pub fn corpus_checksum<'a, I>(texts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut hasher = blake3::Hasher::new();
    for text in texts {
        hasher.update(text.as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

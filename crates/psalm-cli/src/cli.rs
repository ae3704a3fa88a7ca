use std::path::PathBuf;

use clap::{Parser, Subcommand};
use psalm_core::models::Mood;

/// Seek a Psalm, then walk Gates, Courts, and the Holy of Holies.
#[derive(Parser, Debug)]
#[command(name = "psalm", version)]
pub struct Cli {
    /// TOML configuration file. Environment overrides still apply.
    #[arg(long, short = 'c', global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract the Psalms from a verse-level Bible JSON into corpus text.
    PreparePsalter {
        /// Bible JSON: an array of {book, chapter, verse, text} rows.
        #[arg(value_name = "BIBLE_JSON")]
        bible: PathBuf,

        /// Where to write the corpus. Defaults to `index.corpus_path`.
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Chunk and embed the corpus, then publish the index.
    Build {
        /// Corpus text. Defaults to `index.corpus_path`.
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Index artifact. Defaults to `index.path`.
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// One-shot retrieval against the published index.
    Search {
        #[arg(value_name = "QUERY")]
        query: String,

        /// Number of passages. Defaults to `retrieval.default_k`.
        #[arg(short = 'k', long)]
        k: Option<usize>,

        /// Steer the query: lament_trust, fear_refuge, waiting_strength,
        /// repent_cleansing, praise_thanks, none.
        #[arg(long, default_value = "none")]
        mood: Mood,

        /// Print hits as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Interactive journey on stdin.
    Journey,
}

//! `psalm`: command-line front end for the PsalmSeeker engine.

mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use psalm_core::PsalmConfig;

use crate::cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    psalm_observability::init_tracing(&config.observability);

    match cli.command {
        Command::PreparePsalter { bible, output } => {
            commands::prepare::run(&config, &bible, output.as_deref())
        }
        Command::Build { corpus, output } => {
            commands::build::run(&config, corpus.as_deref(), output.as_deref())
        }
        Command::Search {
            query,
            k,
            mood,
            json,
        } => commands::search::run(&config, &query, k, mood, json),
        Command::Journey => commands::journey::run(&config),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<PsalmConfig> {
    let config = match &cli.config {
        Some(path) => PsalmConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => PsalmConfig::default(),
    };
    config
        .with_env_overrides()
        .context("applying environment overrides")
}

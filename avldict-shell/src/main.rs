mod cli;
mod input;
mod menu;

use std::io;

use anyhow::Context;
use avldict_trees::Dictionary;
use clap::Parser;
use tracing::debug;

use crate::cli::Cli;
use crate::menu::Shell;

fn init_tracing(cli: &Cli) {
    // --quiet is always off, --verbose honours RUST_LOG and falls back to
    // info, otherwise only warnings reach stderr.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);
    debug!(?cli, "starting");

    let dict = match cli.max_entries {
        Some(max_entries) => Dictionary::with_limit(max_entries),
        None => Dictionary::new(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    Shell::new(stdin.lock(), stdout.lock(), dict, cli.hash.new_hash(), !cli.no_prompt)
        .run()
        .context("shell stopped")
}

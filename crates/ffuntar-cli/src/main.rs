//! ffuntar CLI - flash-friendly tar extraction.
//!
//! Files identical to those under a reference directory become hardlinks
//! instead of fresh writes.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Per-entry actions are printed by `--verbose` itself; tracing stays at
/// `warn` unless `FFUNTAR_LOG` asks for more.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("FFUNTAR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    if let Some(shell) = cli.completions {
        commands::completion::execute(shell);
        return Ok(());
    }

    init_tracing();

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    if cli.list {
        commands::list::execute(&cli, &*formatter)
    } else {
        commands::extract::execute(&cli, &*formatter)
    }
}

//! CLI entry point for the trait composition engine

use clap::Parser;
use tracing_subscriber::EnvFilter;
use traitloom::io::cli::{Cli, run};

fn main() -> traitloom::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "error" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    run(&cli)
}

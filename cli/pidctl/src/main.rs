//! pidctl - inspect and convert prefixed identifiers.
//!
//! Loads a prefix table (TOML or JSON) and exposes the registry and codec
//! operations as subcommands.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod output;
mod records;

use commands::Cli;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "PIDCTL_LOG";

fn main() -> Result<()> {
    // Logs go to stderr so command output stays pipeable.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli.run() {
        error::print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}

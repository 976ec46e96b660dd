//! CLI commands.

mod codec;
mod find;
mod registry;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pidmap_core::Codec;

use crate::config::Config;
use crate::output::OutputFormat;

/// pidctl - inspect and convert prefixed identifiers.
#[derive(Debug, Parser)]
#[command(name = "pidctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Prefix table (TOML, or JSON with a .json extension).
    #[arg(long, global = true, env = "PIDCTL_CONFIG")]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List registered entity types with their prefixes and key types.
    List,

    /// Show the prefix of an entity type.
    Prefix(registry::PrefixArgs),

    /// Show the entity type bound to a foreign-key field.
    Fk(registry::ForeignKeyArgs),

    /// Check whether a value carries a registered prefix.
    Check(registry::CheckArgs),

    /// Format a native key as a prefixed identifier.
    Format(codec::FormatArgs),

    /// Parse an identifier of a known entity type.
    Parse(codec::ParseArgs),

    /// Infer the entity type of an identifier and parse it.
    Resolve(codec::ResolveArgs),

    /// Check whether an identifier is valid for an entity type.
    Valid(codec::ValidArgs),

    /// Look up a record by identifier in a records file.
    Find(find::FindArgs),

    /// Show CLI version.
    Version,
}

impl Cli {
    /// Run the CLI command.
    pub fn run(self) -> Result<()> {
        let format = self.format;
        let config_path = self.config;
        let ctx = || -> Result<CommandContext> {
            Ok(CommandContext {
                config: Config::load(config_path.as_deref())?,
                format,
            })
        };

        match self.command {
            Commands::List => registry::list(&ctx()?),
            Commands::Prefix(args) => registry::prefix(&ctx()?, args),
            Commands::Fk(args) => registry::foreign_key(&ctx()?, args),
            Commands::Check(args) => registry::check(&ctx()?, args),
            Commands::Format(args) => codec::format(&ctx()?, args),
            Commands::Parse(args) => codec::parse(&ctx()?, args),
            Commands::Resolve(args) => codec::resolve(&ctx()?, args),
            Commands::Valid(args) => codec::valid(&ctx()?, args),
            Commands::Find(args) => find::find(&ctx()?, args),
            Commands::Version => {
                println!("pidctl {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub config: Config,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Codec over the loaded table.
    pub fn codec(&self) -> Codec<'_> {
        Codec::new(&self.config.registry, &self.config.key_types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pidctl", "resolve", "ord-9", "--as", "Invoice", "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Resolve(_)));
    }
}

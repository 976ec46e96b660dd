//! Record lookup against a records file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use pidmap_binding::Resolver;

use crate::output::{print_none, print_value};
use crate::records;

use super::CommandContext;

#[derive(Debug, Args)]
pub struct FindArgs {
    /// Prefixed identifier.
    id: String,

    /// JSON file mapping entity types to arrays of records.
    #[arg(long, env = "PIDCTL_RECORDS")]
    records: PathBuf,

    /// Record field holding the native key.
    #[arg(long, default_value = "id")]
    key_field: String,

    /// Entity type to pick when the prefix is shared.
    #[arg(long = "as")]
    wished: Option<String>,
}

/// Look up the record behind an identifier.
pub fn find(ctx: &CommandContext, args: FindArgs) -> Result<()> {
    let provider = records::load(&args.records, &args.key_field)?;
    let resolver = Resolver::new(ctx.codec(), &provider);

    match resolver.find(&args.id, args.wished.as_deref())? {
        Some(found) => {
            let text = serde_json::to_string_pretty(&found.record)?;
            print_value(&text, &found, ctx.format);
        }
        None => print_none(
            &format!("No record found for '{}'.", args.id),
            &serde_json::Value::Null,
            ctx.format,
        ),
    }
    Ok(())
}

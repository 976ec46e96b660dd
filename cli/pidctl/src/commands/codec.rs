//! Format and parse commands.

use anyhow::Result;
use clap::Args;
use pidmap_core::{KeyType, NativeKey};

use crate::error::CliError;
use crate::output::{print_none, print_value};

use super::CommandContext;

#[derive(Debug, Args)]
pub struct FormatArgs {
    /// Entity type.
    entity_type: String,

    /// Native key value.
    key: String,
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Entity type the identifier must belong to.
    entity_type: String,

    /// Prefixed identifier.
    id: String,
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Prefixed identifier.
    id: String,

    /// Entity type to pick when the prefix is shared.
    #[arg(long = "as")]
    wished: Option<String>,
}

#[derive(Debug, Args)]
pub struct ValidArgs {
    /// Entity type.
    entity_type: String,

    /// Prefixed identifier.
    id: String,
}

/// Format a native key as a prefixed identifier.
pub fn format(ctx: &CommandContext, args: FormatArgs) -> Result<()> {
    let codec = ctx.codec();
    let key = match codec.key_type(&args.entity_type) {
        KeyType::String => NativeKey::String(args.key),
        key_type @ KeyType::Int => key_type.coerce(&args.key, &args.key)?,
    };

    let id = codec.format_key(&args.entity_type, &key)?;
    print_value(
        id.as_str(),
        &serde_json::json!({ "entity_type": args.entity_type, "key": key, "id": id }),
        ctx.format,
    );
    Ok(())
}

/// Parse an identifier of a known entity type.
pub fn parse(ctx: &CommandContext, args: ParseArgs) -> Result<()> {
    let key = ctx
        .codec()
        .parse(&args.entity_type, Some(&args.id))?
        .ok_or_else(|| CliError::PrefixMismatch(args.id.clone(), args.entity_type.clone()))?;

    print_value(
        &key.to_string(),
        &serde_json::json!({ "entity_type": args.entity_type, "key": key }),
        ctx.format,
    );
    Ok(())
}

/// Infer the entity type of an identifier and parse it.
pub fn resolve(ctx: &CommandContext, args: ResolveArgs) -> Result<()> {
    let resolved = ctx
        .codec()
        .resolve_and_parse(&args.id, args.wished.as_deref())?;

    match resolved {
        Some(resolved) => print_value(
            &format!("{} {}", resolved.entity_type, resolved.key),
            &resolved,
            ctx.format,
        ),
        None => print_none("No key resolved.", &serde_json::Value::Null, ctx.format),
    }
    Ok(())
}

/// Check whether an identifier is valid for an entity type.
pub fn valid(ctx: &CommandContext, args: ValidArgs) -> Result<()> {
    let valid = ctx.codec().is_valid_for(&args.entity_type, &args.id);
    print_value(
        if valid { "valid" } else { "invalid" },
        &serde_json::json!({ "entity_type": args.entity_type, "id": args.id, "valid": valid }),
        ctx.format,
    );
    Ok(())
}

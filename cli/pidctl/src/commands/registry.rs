//! Registry lookups.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pidmap_core::KeyTypes;
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliError;
use crate::output::{display_option, print_output, print_value, OutputFormat};

use super::CommandContext;

#[derive(Debug, Args)]
pub struct PrefixArgs {
    /// Entity type.
    entity_type: String,
}

#[derive(Debug, Args)]
pub struct ForeignKeyArgs {
    /// Foreign-key field name.
    field: String,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Value to check.
    value: String,
}

/// One row of `pidctl list`.
#[derive(Debug, Clone, Serialize, Tabled)]
struct EntityRow {
    #[tabled(rename = "Entity Type")]
    entity_type: String,

    #[tabled(rename = "Prefix")]
    prefix: String,

    #[tabled(rename = "Key Type")]
    key_type: String,

    #[tabled(rename = "Default", display = "display_bool")]
    default: bool,

    #[tabled(rename = "Foreign Keys", display = "display_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    foreign_keys: Option<String>,
}

fn display_bool(value: &bool) -> String {
    let text = if *value { "yes" } else { "" };
    text.to_string()
}

fn rows(ctx: &CommandContext) -> Vec<EntityRow> {
    let registry = &ctx.config.registry;
    registry
        .registrations()
        .iter()
        .flat_map(|registration| {
            registration
                .entity_types()
                .iter()
                .enumerate()
                .map(move |(idx, entity_type)| (registration, idx, entity_type))
        })
        .map(|(registration, idx, entity_type)| {
            let fields: Vec<&str> = registry
                .foreign_keys()
                .iter()
                .filter(|binding| binding.entity_type() == entity_type)
                .map(|binding| binding.field())
                .collect();
            EntityRow {
                entity_type: entity_type.clone(),
                prefix: registration.prefix().to_string(),
                key_type: ctx.config.key_types.key_type(entity_type).to_string(),
                default: idx == 0 && registration.entity_types().len() > 1,
                foreign_keys: (!fields.is_empty()).then(|| fields.join(", ")),
            }
        })
        .collect()
}

/// List registered entity types.
pub fn list(ctx: &CommandContext) -> Result<()> {
    print_output(&rows(ctx), ctx.format);
    if ctx.format == OutputFormat::Table {
        let source = format!("Loaded from {}", ctx.config.source.display());
        println!("{}", source.dimmed());
    }
    Ok(())
}

/// Show the prefix of an entity type.
pub fn prefix(ctx: &CommandContext, args: PrefixArgs) -> Result<()> {
    let prefix = ctx
        .config
        .registry
        .find_prefix(&args.entity_type)
        .ok_or_else(|| CliError::UnknownEntityType(args.entity_type.clone()))?;

    print_value(
        &prefix,
        &serde_json::json!({ "entity_type": args.entity_type, "prefix": prefix }),
        ctx.format,
    );
    Ok(())
}

/// Show the entity type bound to a foreign-key field.
pub fn foreign_key(ctx: &CommandContext, args: ForeignKeyArgs) -> Result<()> {
    let entity_type = ctx
        .config
        .registry
        .match_foreign_key(&args.field)
        .ok_or_else(|| CliError::UnknownForeignKey(args.field.clone()))?;

    print_value(
        entity_type,
        &serde_json::json!({ "field": args.field, "entity_type": entity_type }),
        ctx.format,
    );
    Ok(())
}

/// Check whether a value carries a registered prefix.
pub fn check(ctx: &CommandContext, args: CheckArgs) -> Result<()> {
    let registry = &ctx.config.registry;
    let prefixed = registry.is_prefixed_id(&args.value);
    let entity_type = registry.find_entity_type(&args.value, None);

    let text = match entity_type {
        Some(entity_type) => format!("yes ({entity_type})"),
        None => "no".to_string(),
    };
    print_value(
        &text,
        &serde_json::json!({
            "value": args.value,
            "prefixed": prefixed,
            "entity_type": entity_type,
        }),
        ctx.format,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use pidmap_testing::{example_key_types, example_registry};

    fn ctx() -> CommandContext {
        CommandContext {
            config: Config {
                registry: example_registry(),
                key_types: example_key_types(),
                source: "pidmap.toml".into(),
            },
            format: OutputFormat::Json,
        }
    }

    #[test]
    fn list_rows_follow_config_order() {
        let rows = rows(&ctx());
        let names: Vec<_> = rows.iter().map(|r| r.entity_type.as_str()).collect();
        assert_eq!(names, ["User", "Order", "Invoice", "Session"]);

        let order = &rows[1];
        assert_eq!(order.prefix, "ord");
        assert!(order.default);
        assert_eq!(order.foreign_keys.as_deref(), Some("order_id"));
        assert!(!rows[2].default);
        assert_eq!(rows[3].key_type, "string");
    }

    #[test]
    fn unknown_entity_type_is_an_error() {
        let err = prefix(
            &ctx(),
            PrefixArgs {
                entity_type: "ghost".into(),
            },
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::UnknownEntityType(_))
        ));
    }

    #[test]
    fn unknown_foreign_key_is_an_error() {
        let err = foreign_key(
            &ctx(),
            ForeignKeyArgs {
                field: "author_id".into(),
            },
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::UnknownForeignKey(_))
        ));
    }
}

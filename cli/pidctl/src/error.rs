//! Error handling and display for the CLI.

use std::path::PathBuf;

use colored::Colorize;
use pidmap_binding::BindingError;
use pidmap_core::PidError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("No prefix table found")]
    ConfigNotFound { searched: Vec<PathBuf> },

    #[error("Identifier '{0}' does not belong to entity type '{1}'")]
    PrefixMismatch(String, String),

    #[error("Entity type '{0}' has no registered prefix")]
    UnknownEntityType(String),

    #[error("No entity type bound to field '{0}'")]
    UnknownForeignKey(String),
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {:#}", "Error:".red().bold(), err);

    if let Some(hint) = hint_for(err) {
        eprintln!("\n{}", format!("Hint: {hint}").yellow());
    }
}

fn hint_for(err: &anyhow::Error) -> Option<String> {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return match cli_err {
            CliError::ConfigNotFound { searched } => {
                let paths: Vec<String> = searched.iter().map(|p| p.display().to_string()).collect();
                Some(format!(
                    "Pass --config or set PIDCTL_CONFIG. Searched: {}",
                    paths.join(", ")
                ))
            }
            CliError::UnknownEntityType(_) => {
                Some("Run `pidctl list` to see registered entity types.".to_string())
            }
            _ => None,
        };
    }

    let pid_err = err
        .downcast_ref::<PidError>()
        .or_else(|| match err.downcast_ref::<BindingError>() {
            Some(BindingError::Pid(e)) => Some(e),
            _ => None,
        })?;

    match pid_err {
        PidError::Configuration { .. } => {
            Some("Check the [models] table of your config.".to_string())
        }
        PidError::NotFound { .. } => {
            Some("Run `pidctl list` to see registered prefixes.".to_string())
        }
        PidError::InvalidIdentifier { .. } => None,
    }
}

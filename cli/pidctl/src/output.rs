//! Output formatting for CLI commands.

use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Table,
    /// JSON output.
    Json,
}

/// Print rows in the specified format.
pub fn print_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                println!("{}", "No items found.".dimmed());
            } else {
                println!("{}", Table::new(data));
            }
        }
        OutputFormat::Json => println!("{}", format_json(data, "[]")),
    }
}

/// Print a single value: `text` in table mode, `data` as JSON otherwise.
pub fn print_value<T: Serialize>(text: &str, data: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{text}"),
        OutputFormat::Json => println!("{}", format_json(data, "null")),
    }
}

/// Print a miss (absent result).
pub fn print_none<T: Serialize>(message: &str, data: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{}", message.dimmed()),
        OutputFormat::Json => println!("{}", format_json(data, "null")),
    }
}

fn format_json<T: Serialize + ?Sized>(data: &T, fallback: &str) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| fallback.to_string())
}

/// Render an optional string cell.
pub fn display_option(opt: &Option<String>) -> String {
    opt.as_deref().unwrap_or("-").to_string()
}

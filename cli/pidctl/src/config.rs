//! Prefix table loading.
//!
//! The table is looked up in this order:
//! - `--config` / `PIDCTL_CONFIG`
//! - `pidmap.toml` in the working directory
//! - `pidmap.toml` in the platform config directory

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use pidmap_core::{KeyTypeMap, Registry, RegistryConfig};
use tracing::debug;

use crate::error::CliError;

/// Default config file name.
const CONFIG_FILE: &str = "pidmap.toml";

/// Get the platform config directory path.
fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "pidmap", "pidctl").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Loaded prefix table.
#[derive(Debug)]
pub struct Config {
    pub registry: Registry,
    pub key_types: KeyTypeMap,
    pub source: PathBuf,
}

impl Config {
    /// Resolve the config path and load it.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = resolve_path(explicit)?;
        Self::load_from(&path)
    }

    /// Load the table at `path`. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let parsed = (if is_json(path) {
            RegistryConfig::from_json_str(&contents)
        } else {
            RegistryConfig::from_toml_str(&contents)
        })
        .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        let registry = Registry::from_config(&parsed)
            .with_context(|| format!("Invalid prefix table in {}", path.display()))?;

        debug!(
            path = %path.display(),
            prefixes = registry.registrations().len(),
            "config loaded"
        );

        Ok(Self {
            registry,
            key_types: parsed.key_type_map(),
            source: path.to_path_buf(),
        })
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Pick the config file to load.
fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let mut searched = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(dir) = config_dir() {
        searched.push(dir.join(CONFIG_FILE));
    }

    match searched.iter().find(|p| p.exists()) {
        Some(path) => Ok(path.clone()),
        None => Err(CliError::ConfigNotFound { searched }.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pidmap_core::{KeyType, KeyTypes};
    use pidmap_testing::EXAMPLE_TOML;

    #[test]
    fn load_toml_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pidmap.toml");
        fs::write(&path, EXAMPLE_TOML).unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.registry.find_prefix("User").as_deref(), Some("usr-"));
        assert_eq!(config.key_types.key_type("Session"), KeyType::String);
        assert_eq!(config.source, path);
    }

    #[test]
    fn load_json_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pidmap.json");
        fs::write(&path, r#"{"models": {"usr": "User"}}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.registry.entity_types(), ["User"]);
    }

    #[test]
    fn duplicate_prefix_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pidmap.json");
        fs::write(&path, r#"{"models": {"usr": "User", "usr": "Admin"}}"#).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("registered more than once"));
    }

    #[test]
    fn missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(dir.path().join("nope.toml").as_path())).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}

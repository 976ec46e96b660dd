//! Read-only prefix and foreign-key tables.
//!
//! A [`Registry`] is built once from static configuration and never mutated,
//! so it can be shared across threads without locking.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::RegistryConfig;
use crate::key::SEPARATOR;
use crate::PidError;

/// One configured prefix and the entity types sharing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrefixRegistration {
    prefix: String,
    entity_types: Vec<String>,
}

impl PrefixRegistration {
    pub fn new(prefix: impl Into<String>, entity_types: Vec<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entity_types,
        }
    }

    /// The prefix token, without separator.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Entity types in configuration order; never empty once registered.
    pub fn entity_types(&self) -> &[String] {
        &self.entity_types
    }

    fn contains(&self, entity_type: &str) -> bool {
        self.entity_types.iter().any(|t| t == entity_type)
    }
}

/// A foreign-key field bound to the entity type whose rules apply to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeyBinding {
    field: String,
    entity_type: String,
}

impl ForeignKeyBinding {
    pub fn new(field: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            entity_type: entity_type.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }
}

/// Lookup tables for prefixes and foreign keys.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    registrations: Vec<PrefixRegistration>,
    by_prefix: HashMap<String, usize>,
    // First registration listing the entity type.
    by_entity_type: HashMap<String, usize>,
    foreign_keys: Vec<ForeignKeyBinding>,
    by_field: HashMap<String, usize>,
}

impl Registry {
    /// Starts an empty builder.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Builds a registry from parsed configuration.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, PidError> {
        RegistryBuilder {
            registrations: config.registrations(),
            foreign_keys: config.foreign_key_bindings(),
        }
        .build()
    }

    /// All registrations in configuration order.
    pub fn registrations(&self) -> &[PrefixRegistration] {
        &self.registrations
    }

    /// All foreign-key bindings in configuration order.
    pub fn foreign_keys(&self) -> &[ForeignKeyBinding] {
        &self.foreign_keys
    }

    /// Registered prefix tokens in configuration order.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.registrations.iter().map(PrefixRegistration::prefix)
    }

    /// Every registered entity type, flattened in configuration order.
    pub fn entity_types(&self) -> Vec<&str> {
        self.registrations
            .iter()
            .flat_map(|r| r.entity_types.iter().map(String::as_str))
            .collect()
    }

    /// Returns the prefix of `entity_type` with the separator appended.
    ///
    /// An entity type listed under several prefixes is a configuration bug;
    /// the first registration listing it wins.
    pub fn find_prefix(&self, entity_type: &str) -> Option<String> {
        self.registration_for(entity_type)
            .map(|r| format!("{}{}", r.prefix, SEPARATOR))
    }

    pub(crate) fn registration_for(&self, entity_type: &str) -> Option<&PrefixRegistration> {
        self.by_entity_type
            .get(entity_type)
            .map(|&idx| &self.registrations[idx])
    }

    /// Infers the entity type of a prefixed identifier.
    ///
    /// The candidate prefix is everything before the first separator. For a
    /// prefix shared by several entity types, `wished` selects one of them
    /// (`None` if it isn't listed); without `wished` the first listed wins.
    pub fn find_entity_type(&self, id: &str, wished: Option<&str>) -> Option<&str> {
        let prefix = id.split_once(SEPARATOR).map_or(id, |(prefix, _)| prefix);
        let registration = &self.registrations[*self.by_prefix.get(prefix)?];

        match (registration.entity_types.as_slice(), wished) {
            ([only], _) => Some(only.as_str()),
            (types, Some(wished)) => types
                .iter()
                .find(|t| t.as_str() == wished)
                .map(String::as_str),
            (types, None) => types.first().map(String::as_str),
        }
    }

    /// Returns the entity type bound to a foreign-key field.
    pub fn match_foreign_key(&self, field: &str) -> Option<&str> {
        self.by_field
            .get(field)
            .map(|&idx| self.foreign_keys[idx].entity_type.as_str())
    }

    /// Returns true if the identifier's prefix is registered.
    ///
    /// The suffix is not inspected.
    pub fn is_prefixed_id(&self, value: &str) -> bool {
        self.find_entity_type(value, None).is_some()
    }
}

/// Collects registrations and validates them into a [`Registry`].
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    registrations: Vec<PrefixRegistration>,
    foreign_keys: Vec<ForeignKeyBinding>,
}

impl RegistryBuilder {
    /// Registers a prefix for one or more entity types.
    #[must_use]
    pub fn prefix<I, S>(mut self, prefix: impl Into<String>, entity_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registrations.push(PrefixRegistration::new(
            prefix,
            entity_types.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Binds a foreign-key field to an entity type.
    #[must_use]
    pub fn foreign_key(mut self, field: impl Into<String>, entity_type: impl Into<String>) -> Self {
        self.foreign_keys
            .push(ForeignKeyBinding::new(field, entity_type));
        self
    }

    /// Validates the tables and builds the registry.
    ///
    /// Fails on duplicate prefixes, empty or separator-bearing prefixes,
    /// registrations without entity types, and duplicate foreign-key fields.
    pub fn build(self) -> Result<Registry, PidError> {
        let mut by_prefix = HashMap::with_capacity(self.registrations.len());
        let mut by_entity_type = HashMap::new();

        for (idx, registration) in self.registrations.iter().enumerate() {
            let prefix = registration.prefix.as_str();
            if prefix.is_empty() {
                return Err(PidError::configuration("prefix cannot be empty"));
            }
            if prefix.contains(SEPARATOR) {
                return Err(PidError::configuration(format!(
                    "prefix '{prefix}' contains the separator '{SEPARATOR}'"
                )));
            }
            if registration.entity_types.is_empty() {
                return Err(PidError::configuration(format!(
                    "prefix '{prefix}' has no entity types"
                )));
            }
            if by_prefix.insert(prefix.to_string(), idx).is_some() {
                return Err(PidError::configuration(format!(
                    "prefix '{prefix}' is registered more than once"
                )));
            }

            let mut seen = HashSet::new();
            for entity_type in &registration.entity_types {
                if !seen.insert(entity_type.as_str()) {
                    continue;
                }
                if let Some(&first) = by_entity_type.get(entity_type) {
                    let first: &PrefixRegistration = &self.registrations[first];
                    warn!(
                        entity_type = %entity_type,
                        first_prefix = %first.prefix,
                        ignored_prefix = %prefix,
                        "entity type registered under several prefixes; first one wins"
                    );
                    continue;
                }
                by_entity_type.insert(entity_type.clone(), idx);
            }
        }

        let mut by_field = HashMap::with_capacity(self.foreign_keys.len());
        for (idx, binding) in self.foreign_keys.iter().enumerate() {
            if by_field.insert(binding.field.clone(), idx).is_some() {
                return Err(PidError::configuration(format!(
                    "foreign key '{}' is bound more than once",
                    binding.field
                )));
            }
            if !by_entity_type.contains_key(&binding.entity_type) {
                warn!(
                    field = %binding.field,
                    entity_type = %binding.entity_type,
                    "foreign key bound to an entity type without a prefix"
                );
            }
        }

        debug!(
            prefixes = self.registrations.len(),
            entity_types = by_entity_type.len(),
            foreign_keys = self.foreign_keys.len(),
            "registry built"
        );

        Ok(Registry {
            registrations: self.registrations,
            by_prefix,
            by_entity_type,
            foreign_keys: self.foreign_keys,
            by_field,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn example() -> Registry {
        Registry::builder()
            .prefix("usr", ["User"])
            .prefix("ord", ["Order", "Invoice"])
            .foreign_key("owner_id", "User")
            .build()
            .unwrap()
    }

    #[test]
    fn test_entity_types_flattened_in_order() {
        assert_eq!(example().entity_types(), ["User", "Order", "Invoice"]);
    }

    #[test]
    fn test_find_prefix_appends_separator() {
        let registry = example();
        assert_eq!(registry.find_prefix("User").as_deref(), Some("usr-"));
        assert_eq!(registry.find_prefix("Invoice").as_deref(), Some("ord-"));
        assert_eq!(registry.find_prefix("ghost"), None);
    }

    #[rstest]
    #[case("ord-7", None, Some("Order"))]
    #[case("ord-7", Some("Invoice"), Some("Invoice"))]
    #[case("ord-7", Some("Customer"), None)]
    #[case("usr-7", Some("Customer"), Some("User"))]
    #[case("usr", None, Some("User"))]
    #[case("xyz-1", None, None)]
    #[case("", None, None)]
    fn test_find_entity_type(
        #[case] id: &str,
        #[case] wished: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(example().find_entity_type(id, wished), expected);
    }

    #[test]
    fn test_match_foreign_key() {
        let registry = example();
        assert_eq!(registry.match_foreign_key("owner_id"), Some("User"));
        assert_eq!(registry.match_foreign_key("author_id"), None);
    }

    #[test]
    fn test_is_prefixed_id_ignores_suffix() {
        let registry = example();
        assert!(registry.is_prefixed_id("usr-42"));
        assert!(registry.is_prefixed_id("usr-not-a-number"));
        assert!(!registry.is_prefixed_id("xyz-1"));
        assert!(!registry.is_prefixed_id("42"));
    }

    #[test]
    fn test_duplicate_prefix_rejected() {
        let err = Registry::builder()
            .prefix("usr", ["User"])
            .prefix("usr", ["Admin"])
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[rstest]
    #[case("")]
    #[case("us-r")]
    fn test_malformed_prefix_rejected(#[case] prefix: &str) {
        let err = Registry::builder()
            .prefix(prefix, ["User"])
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_registration_without_entity_types_rejected() {
        let err = Registry::builder()
            .prefix("usr", Vec::<String>::new())
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_duplicate_foreign_key_rejected() {
        let err = Registry::builder()
            .prefix("usr", ["User"])
            .foreign_key("owner_id", "User")
            .foreign_key("owner_id", "User")
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_entity_type_under_two_prefixes_first_wins() {
        let registry = Registry::builder()
            .prefix("usr", ["User"])
            .prefix("acc", ["Account", "User"])
            .build()
            .unwrap();
        assert_eq!(registry.find_prefix("User").as_deref(), Some("usr-"));
        assert_eq!(registry.find_prefix("Account").as_deref(), Some("acc-"));
    }

    #[test]
    fn test_from_config() {
        let config = RegistryConfig::from_json_str(
            r#"{"models": {"usr": "User", "ord": ["Order", "Invoice"]},
                "foreign_keys": {"owner_id": "User"}}"#,
        )
        .unwrap();
        let registry = Registry::from_config(&config).unwrap();
        assert_eq!(registry.prefixes().collect::<Vec<_>>(), ["usr", "ord"]);
        assert_eq!(registry.match_foreign_key("owner_id"), Some("User"));
    }

    #[test]
    fn test_from_config_duplicate_prefix_rejected() {
        let config =
            RegistryConfig::from_json_str(r#"{"models": {"usr": "User", "usr": "Admin"}}"#)
                .unwrap();
        assert!(Registry::from_config(&config).unwrap_err().is_configuration());
    }

    #[test]
    fn test_registry_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();
    }
}

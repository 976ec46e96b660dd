//! Configuration shape the registry is built from.
//!
//! ```toml
//! [models]
//! usr = "User"
//! ord = ["Order", "Invoice"]
//!
//! [foreign_keys]
//! owner_id = "User"
//!
//! [key_types]
//! Session = "string"
//! ```
//!
//! Tables keep document order. Duplicate keys that reach the deserializer
//! are kept as separate entries so registry construction can reject them.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::key::{KeyType, KeyTypeMap};
use crate::registry::{ForeignKeyBinding, PrefixRegistration};
use crate::PidError;

/// Entries of a configuration table in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedTable<V>(pub Vec<(String, V)>);

impl<V> Default for OrderedTable<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<'de, V> Deserialize<'de> for OrderedTable<V>
where
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V> Visitor<'de> for EntriesVisitor<V>
        where
            V: Deserialize<'de>,
        {
            type Value = OrderedTable<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of string keys")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(OrderedTable(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

/// A prefix bound to one entity type or to an ordered list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EntityTypes {
    One(String),
    Many(Vec<String>),
}

impl EntityTypes {
    /// Normalizes to a sequence; a single entity type becomes a one-element list.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            EntityTypes::One(entity_type) => vec![entity_type],
            EntityTypes::Many(entity_types) => entity_types,
        }
    }
}

/// Static configuration for a [`crate::Registry`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegistryConfig {
    /// Prefix to entity type(s).
    #[serde(default)]
    pub models: OrderedTable<EntityTypes>,

    /// Foreign-key field name to entity type.
    #[serde(default)]
    pub foreign_keys: OrderedTable<String>,

    /// Entity type to key type; entity types not listed use `int`.
    #[serde(default)]
    pub key_types: OrderedTable<KeyType>,
}

impl RegistryConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, PidError> {
        toml::from_str(s).map_err(|e| PidError::configuration(format!("invalid TOML: {e}")))
    }

    /// Parses a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, PidError> {
        serde_json::from_str(s).map_err(|e| PidError::configuration(format!("invalid JSON: {e}")))
    }

    /// Prefix registrations in document order.
    pub fn registrations(&self) -> Vec<PrefixRegistration> {
        self.models
            .0
            .iter()
            .map(|(prefix, types)| PrefixRegistration::new(prefix.clone(), types.clone().into_vec()))
            .collect()
    }

    /// Foreign-key bindings in document order.
    pub fn foreign_key_bindings(&self) -> Vec<ForeignKeyBinding> {
        self.foreign_keys
            .0
            .iter()
            .map(|(field, entity_type)| ForeignKeyBinding::new(field.clone(), entity_type.clone()))
            .collect()
    }

    /// Key-type metadata declared in the `key_types` table.
    pub fn key_type_map(&self) -> KeyTypeMap {
        let mut map = KeyTypeMap::new(KeyType::Int);
        for (entity_type, key_type) in &self.key_types.0 {
            map.insert(entity_type.clone(), *key_type);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyTypes;

    const EXAMPLE: &str = r#"
[models]
usr = "User"
ord = ["Order", "Invoice"]
ses = "Session"

[foreign_keys]
owner_id = "User"

[key_types]
Session = "string"
"#;

    #[test]
    fn test_toml_keeps_document_order() {
        let config = RegistryConfig::from_toml_str(EXAMPLE).unwrap();
        let prefixes: Vec<_> = config.models.0.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(prefixes, ["usr", "ord", "ses"]);

        let registrations = config.registrations();
        assert_eq!(registrations[0].entity_types(), ["User"]);
        assert_eq!(registrations[1].entity_types(), ["Order", "Invoice"]);
    }

    #[test]
    fn test_key_types_table() {
        let config = RegistryConfig::from_toml_str(EXAMPLE).unwrap();
        let key_types = config.key_type_map();
        assert_eq!(key_types.key_type("Session"), KeyType::String);
        assert_eq!(key_types.key_type("User"), KeyType::Int);
    }

    #[test]
    fn test_json_duplicates_are_kept() {
        let config =
            RegistryConfig::from_json_str(r#"{"models": {"usr": "User", "usr": "Admin"}}"#)
                .unwrap();
        assert_eq!(config.models.0.len(), 2);
    }

    #[test]
    fn test_toml_duplicates_are_rejected() {
        let err = RegistryConfig::from_toml_str("[models]\nusr = \"User\"\nusr = \"Admin\"\n")
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_empty_document() {
        let config = RegistryConfig::from_toml_str("").unwrap();
        assert!(config.models.0.is_empty());
        assert!(config.foreign_keys.0.is_empty());
    }

    #[test]
    fn test_unknown_key_type_rejected() {
        let err = RegistryConfig::from_toml_str("[key_types]\nUser = \"uuid\"\n").unwrap_err();
        assert!(err.is_configuration());
    }
}

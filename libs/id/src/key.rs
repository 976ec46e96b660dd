//! Key types, native keys and the external prefixed identifier.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::PidError;

/// Separator between the prefix and the raw key.
pub const SEPARATOR: char = '-';

/// Declared primitive type of an entity type's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum KeyType {
    /// Signed 64-bit integer key.
    #[default]
    #[serde(rename = "int", alias = "integer")]
    Int,
    /// Opaque string key.
    #[serde(rename = "string")]
    String,
}

impl KeyType {
    /// Coerces a raw suffix into a native key of this type.
    ///
    /// Integer keys accept ASCII decimal digits only; signs, whitespace,
    /// an empty suffix and values outside `i64` are rejected.
    pub fn coerce(self, id: &str, suffix: &str) -> Result<NativeKey, PidError> {
        match self {
            KeyType::String => Ok(NativeKey::String(suffix.to_string())),
            KeyType::Int => {
                if suffix.is_empty() {
                    return Err(PidError::invalid(id, "missing integer key"));
                }
                if !suffix.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(PidError::invalid(
                        id,
                        format!("'{suffix}' is not a decimal integer"),
                    ));
                }
                suffix
                    .parse::<i64>()
                    .map(NativeKey::Int)
                    .map_err(|_| PidError::invalid(id, format!("'{suffix}' is out of range")))
            }
        }
    }
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyType::Int => write!(f, "int"),
            KeyType::String => write!(f, "string"),
        }
    }
}

/// An internal key value paired with its primitive type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NativeKey {
    Int(i64),
    String(String),
}

impl NativeKey {
    /// Returns the primitive type of this key.
    pub fn key_type(&self) -> KeyType {
        match self {
            NativeKey::Int(_) => KeyType::Int,
            NativeKey::String(_) => KeyType::String,
        }
    }

    /// Returns the integer value, if this is an integer key.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            NativeKey::Int(v) => Some(*v),
            NativeKey::String(_) => None,
        }
    }

    /// Returns the string value, if this is a string key.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            NativeKey::Int(_) => None,
            NativeKey::String(s) => Some(s),
        }
    }
}

impl std::fmt::Display for NativeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NativeKey::Int(v) => write!(f, "{v}"),
            NativeKey::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for NativeKey {
    fn from(v: i64) -> Self {
        NativeKey::Int(v)
    }
}

impl From<i32> for NativeKey {
    fn from(v: i32) -> Self {
        NativeKey::Int(i64::from(v))
    }
}

impl From<String> for NativeKey {
    fn from(s: String) -> Self {
        NativeKey::String(s)
    }
}

impl From<&str> for NativeKey {
    fn from(s: &str) -> Self {
        NativeKey::String(s.to_string())
    }
}

/// Key-type metadata for entity types.
///
/// The registry does not know key types; collaborators supply them.
pub trait KeyTypes: Send + Sync {
    /// Returns the declared key type of `entity_type`.
    fn key_type(&self, entity_type: &str) -> KeyType;
}

/// Every entity type shares the same key type.
impl KeyTypes for KeyType {
    fn key_type(&self, _entity_type: &str) -> KeyType {
        *self
    }
}

/// Explicit per-entity key types with a fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyTypeMap {
    default: KeyType,
    overrides: HashMap<String, KeyType>,
}

impl KeyTypeMap {
    /// Creates a map where every entity type falls back to `default`.
    pub fn new(default: KeyType) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
        }
    }

    /// Declares the key type of one entity type.
    #[must_use]
    pub fn with(mut self, entity_type: impl Into<String>, key_type: KeyType) -> Self {
        self.overrides.insert(entity_type.into(), key_type);
        self
    }

    /// Declares the key type of one entity type in place.
    pub fn insert(&mut self, entity_type: impl Into<String>, key_type: KeyType) {
        self.overrides.insert(entity_type.into(), key_type);
    }
}

impl KeyTypes for KeyTypeMap {
    fn key_type(&self, entity_type: &str) -> KeyType {
        self.overrides
            .get(entity_type)
            .copied()
            .unwrap_or(self.default)
    }
}

/// External identifier: `{prefix}-{key}`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrefixedId {
    value: String,
    prefix_len: usize,
}

impl PrefixedId {
    /// Joins a registered prefix (separator included) and a key.
    pub(crate) fn join(prefix: &str, key: &NativeKey) -> Self {
        debug_assert!(prefix.ends_with(SEPARATOR));
        Self {
            value: format!("{prefix}{key}"),
            prefix_len: prefix.len() - SEPARATOR.len_utf8(),
        }
    }

    /// Splits a caller-supplied identifier without consulting any registry.
    ///
    /// The string must contain the separator and a non-empty prefix.
    pub fn parse(s: &str) -> Result<Self, PidError> {
        let Some((prefix, _)) = s.split_once(SEPARATOR) else {
            return Err(PidError::invalid(s, "missing separator"));
        };
        if prefix.is_empty() {
            return Err(PidError::invalid(s, "empty prefix"));
        }
        Ok(Self {
            value: s.to_string(),
            prefix_len: prefix.len(),
        })
    }

    /// Returns the prefix without the separator.
    pub fn prefix(&self) -> &str {
        &self.value[..self.prefix_len]
    }

    /// Returns the raw key part after the separator.
    pub fn suffix(&self) -> &str {
        &self.value[self.prefix_len + SEPARATOR.len_utf8()..]
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl std::fmt::Display for PrefixedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl std::str::FromStr for PrefixedId {
    type Err = PidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PrefixedId {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl PartialEq<str> for PrefixedId {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl PartialEq<&str> for PrefixedId {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

impl From<PrefixedId> for String {
    fn from(id: PrefixedId) -> Self {
        id.value
    }
}

impl serde::Serialize for PrefixedId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.value)
    }
}

impl<'de> serde::Deserialize<'de> for PrefixedId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

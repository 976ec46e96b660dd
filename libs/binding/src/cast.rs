//! Attribute casting between stored keys and prefixed identifiers.
//!
//! A key attribute is stored as a native key and exposed as a prefixed
//! identifier. Which entity type's prefix applies is resolved per field:
//! the cast's explicit entity type, then the owning entity's primary key,
//! then the registry's foreign-key bindings.

use pidmap_core::{Codec, KeyType, NativeKey, PidError, PrefixedId};
use serde::Deserialize;

/// The record an attribute belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastContext<'a> {
    /// Entity type of the owning record.
    pub entity_type: &'a str,
    /// Name of the owning record's primary key field.
    pub primary_key: &'a str,
}

impl<'a> CastContext<'a> {
    pub fn new(entity_type: &'a str, primary_key: &'a str) -> Self {
        Self {
            entity_type,
            primary_key,
        }
    }
}

/// Incoming value for a key attribute.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Key(NativeKey),
}

impl AttributeValue {
    pub fn text(s: impl Into<String>) -> Self {
        AttributeValue::Key(NativeKey::String(s.into()))
    }
}

impl From<NativeKey> for AttributeValue {
    fn from(key: NativeKey) -> Self {
        AttributeValue::Key(key)
    }
}

impl From<Option<NativeKey>> for AttributeValue {
    fn from(key: Option<NativeKey>) -> Self {
        key.map_or(AttributeValue::Null, AttributeValue::Key)
    }
}

/// Cast for one key attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyCast {
    entity_type: Option<String>,
}

impl KeyCast {
    /// Cast resolving the entity type from the field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cast pinned to one entity type.
    pub fn for_entity(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: Some(entity_type.into()),
        }
    }

    /// Resolves which entity type's rules apply to `field`.
    pub fn resolve_entity_type(
        &self,
        codec: &Codec<'_>,
        ctx: &CastContext<'_>,
        field: &str,
    ) -> Result<String, PidError> {
        if let Some(entity_type) = &self.entity_type {
            return Ok(entity_type.clone());
        }
        if field == ctx.primary_key {
            return Ok(ctx.entity_type.to_string());
        }
        codec
            .registry()
            .match_foreign_key(field)
            .map(str::to_string)
            .ok_or_else(|| PidError::Configuration {
                message: format!("entity type could not be resolved for '{field}'"),
            })
    }

    /// Prepares an incoming value for storage.
    ///
    /// The stored key always has the resolved entity type's declared key
    /// type. Integers and all-digit text are raw keys and are coerced to
    /// that type; any other text must be a prefixed identifier of the
    /// resolved entity type.
    pub fn set(
        &self,
        codec: &Codec<'_>,
        ctx: &CastContext<'_>,
        field: &str,
        value: AttributeValue,
    ) -> Result<Option<NativeKey>, PidError> {
        let key = match value {
            AttributeValue::Null => return Ok(None),
            AttributeValue::Key(key) => key,
        };

        let entity_type = self.resolve_entity_type(codec, ctx, field)?;
        let key_type = codec.key_type(&entity_type);

        match key {
            NativeKey::Int(n) => Ok(Some(match key_type {
                KeyType::Int => NativeKey::Int(n),
                KeyType::String => NativeKey::String(n.to_string()),
            })),
            NativeKey::String(text) if is_decimal(&text) => {
                key_type.coerce(&text, &text).map(Some)
            }
            NativeKey::String(text) => codec
                .parse(&entity_type, Some(&text))?
                .map(Some)
                .ok_or_else(|| PidError::InvalidIdentifier {
                    id: text.clone(),
                    reason: format!("invalid value given to '{field}'"),
                }),
        }
    }

    /// Formats a stored key for output.
    pub fn serialize(
        &self,
        codec: &Codec<'_>,
        ctx: &CastContext<'_>,
        field: &str,
        value: Option<&NativeKey>,
    ) -> Result<Option<PrefixedId>, PidError> {
        let entity_type = self.resolve_entity_type(codec, ctx, field)?;
        codec.format(&entity_type, value)
    }
}

fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

//! Statically typed entity types.

use crate::codec::Codec;
use crate::key::{KeyType, NativeKey, PrefixedId};
use crate::PidError;

/// An entity type known at compile time.
///
/// Usually generated with [`crate::define_entity!`]. The registry still owns
/// the prefix; this only fixes the name and key type in one place.
pub trait Entity {
    /// Entity type identifier as it appears in the registry.
    const NAME: &'static str;

    /// Declared key type.
    const KEY_TYPE: KeyType;

    /// Registered prefix, separator included.
    fn id_prefix(codec: &Codec<'_>) -> Result<String, PidError> {
        codec
            .registry()
            .find_prefix(Self::NAME)
            .ok_or_else(|| PidError::unregistered(Self::NAME))
    }

    /// Formats `key` with this entity type's prefix.
    fn format_prefixed_id(
        codec: &Codec<'_>,
        key: Option<&NativeKey>,
    ) -> Result<Option<PrefixedId>, PidError> {
        codec.format(Self::NAME, key)
    }

    /// Parses an identifier that must carry this entity type's prefix.
    ///
    /// Coerces with [`Entity::KEY_TYPE`] regardless of the codec's metadata.
    fn parse_prefixed_id(codec: &Codec<'_>, id: Option<&str>) -> Result<Option<NativeKey>, PidError> {
        let Some(id) = id else {
            return Ok(None);
        };
        let prefix = Self::id_prefix(codec)?;
        match id.strip_prefix(prefix.as_str()) {
            Some(suffix) => Self::KEY_TYPE.coerce(id, suffix).map(Some),
            None => Ok(None),
        }
    }
}

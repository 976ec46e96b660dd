//! Translation between native keys and prefixed identifiers.

use serde::Serialize;
use tracing::debug;

use crate::key::{KeyType, KeyTypes, NativeKey, PrefixedId};
use crate::registry::Registry;
use crate::PidError;

/// An identifier resolved to its entity type and native key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedKey {
    pub entity_type: String,
    pub key: NativeKey,
}

/// Stateless codec over a registry and key-type metadata.
///
/// Cheap to construct; create one wherever a registry is in scope.
#[derive(Clone, Copy)]
pub struct Codec<'a> {
    registry: &'a Registry,
    key_types: &'a dyn KeyTypes,
}

impl<'a> Codec<'a> {
    pub fn new(registry: &'a Registry, key_types: &'a dyn KeyTypes) -> Self {
        Self {
            registry,
            key_types,
        }
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Declared key type of `entity_type`.
    pub fn key_type(&self, entity_type: &str) -> KeyType {
        self.key_types.key_type(entity_type)
    }

    fn require_prefix(&self, entity_type: &str) -> Result<String, PidError> {
        self.registry
            .find_prefix(entity_type)
            .ok_or_else(|| PidError::unregistered(entity_type))
    }

    /// Formats a key as a prefixed identifier.
    ///
    /// A missing key (e.g. an unsaved record) formats to `None`. The key is
    /// not checked against the declared key type; see [`Codec::format_key`].
    pub fn format(
        &self,
        entity_type: &str,
        key: Option<&NativeKey>,
    ) -> Result<Option<PrefixedId>, PidError> {
        key.map(|key| self.format_key(entity_type, key)).transpose()
    }

    /// Formats a present key as a prefixed identifier.
    ///
    /// The key's type is not checked against [`KeyTypes`]: a string key for
    /// an integer-keyed entity type formats fine but won't parse back.
    pub fn format_key(&self, entity_type: &str, key: &NativeKey) -> Result<PrefixedId, PidError> {
        let prefix = self.require_prefix(entity_type)?;
        Ok(PrefixedId::join(&prefix, key))
    }

    /// Parses an identifier that must belong to `entity_type`.
    ///
    /// Returns `Ok(None)` for a missing input or one carrying another prefix.
    /// A matching prefix with a suffix that doesn't fit the key type is an
    /// [`PidError::InvalidIdentifier`].
    pub fn parse(&self, entity_type: &str, id: Option<&str>) -> Result<Option<NativeKey>, PidError> {
        let Some(id) = id else {
            return Ok(None);
        };
        let prefix = self.require_prefix(entity_type)?;
        let Some(suffix) = id.strip_prefix(prefix.as_str()) else {
            return Ok(None);
        };

        let key_type = self.key_type(entity_type);
        key_type.coerce(id, suffix).map(Some).inspect_err(|e| {
            debug!(entity_type, %key_type, error = %e, "identifier coercion failed");
        })
    }

    /// Parses a batch of identifiers for one entity type.
    ///
    /// Entries of another prefix map to `None`; the first malformed entry
    /// fails the whole batch.
    pub fn parse_many<I, S>(&self, entity_type: &str, ids: I) -> Result<Vec<Option<NativeKey>>, PidError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter()
            .map(|id| self.parse(entity_type, Some(id.as_ref())))
            .collect()
    }

    /// Infers the entity type from the prefix, then parses.
    ///
    /// See [`Registry::find_entity_type`] for how `wished` picks among
    /// entity types sharing a prefix.
    pub fn resolve_and_parse(
        &self,
        id: &str,
        wished: Option<&str>,
    ) -> Result<Option<ResolvedKey>, PidError> {
        let entity_type = self
            .registry
            .find_entity_type(id, wished)
            .ok_or_else(|| PidError::NotFound { id: id.to_string() })?;

        Ok(self.parse(entity_type, Some(id))?.map(|key| ResolvedKey {
            entity_type: entity_type.to_string(),
            key,
        }))
    }

    /// Returns true if `id` parses to a key of `entity_type`.
    pub fn is_valid_for(&self, entity_type: &str, id: &str) -> bool {
        matches!(self.parse(entity_type, Some(id)), Ok(Some(_)))
    }
}

impl std::fmt::Debug for Codec<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec")
            .field("registry", self.registry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyTypeMap;
    use proptest::prelude::*;

    fn registry() -> Registry {
        Registry::builder()
            .prefix("usr", ["User"])
            .prefix("ord", ["Order", "Invoice"])
            .prefix("ses", ["Session"])
            .foreign_key("owner_id", "User")
            .build()
            .unwrap()
    }

    fn key_types() -> KeyTypeMap {
        KeyTypeMap::new(KeyType::Int).with("Session", KeyType::String)
    }

    #[test]
    fn test_format() {
        let registry = registry();
        let key_types = key_types();
        let codec = Codec::new(&registry, &key_types);

        let id = codec.format("User", Some(&NativeKey::Int(42))).unwrap();
        assert_eq!(id.unwrap(), "usr-42");
        assert_eq!(codec.format("User", None).unwrap(), None);
    }

    #[test]
    fn test_parse() {
        let registry = registry();
        let key_types = key_types();
        let codec = Codec::new(&registry, &key_types);

        assert_eq!(
            codec.parse("User", Some("usr-42")).unwrap(),
            Some(NativeKey::Int(42))
        );
        assert_eq!(
            codec.parse("Session", Some("ses-abc")).unwrap(),
            Some(NativeKey::String("abc".into()))
        );
        assert_eq!(codec.parse("User", None).unwrap(), None);
    }

    #[test]
    fn test_parse_is_strict_about_prefix() {
        let registry = registry();
        let key_types = key_types();
        let codec = Codec::new(&registry, &key_types);

        // "ord" is registered, but not for User.
        assert_eq!(codec.parse("User", Some("ord-7")).unwrap(), None);
        assert_eq!(codec.parse("User", Some("usr7")).unwrap(), None);
    }

    #[test]
    fn test_parse_rejects_non_numeric_suffix() {
        let registry = registry();
        let key_types = key_types();
        let codec = Codec::new(&registry, &key_types);

        let err = codec.parse("User", Some("usr-abc")).unwrap_err();
        assert!(err.is_invalid());
        let err = codec.parse("User", Some("usr-12abc")).unwrap_err();
        assert!(err.is_invalid());
    }

    #[test]
    fn test_unregistered_entity_type() {
        let registry = registry();
        let key_types = key_types();
        let codec = Codec::new(&registry, &key_types);

        assert!(codec
            .format("ghost", Some(&NativeKey::Int(1)))
            .unwrap_err()
            .is_configuration());
        assert!(codec
            .parse("ghost", Some("ghost-1"))
            .unwrap_err()
            .is_configuration());
    }

    #[test]
    fn test_resolve_and_parse() {
        let registry = registry();
        let key_types = key_types();
        let codec = Codec::new(&registry, &key_types);

        let resolved = codec.resolve_and_parse("ord-9", None).unwrap().unwrap();
        assert_eq!(resolved.entity_type, "Order");
        assert_eq!(resolved.key, NativeKey::Int(9));

        let resolved = codec
            .resolve_and_parse("ord-9", Some("Invoice"))
            .unwrap()
            .unwrap();
        assert_eq!(resolved.entity_type, "Invoice");
    }

    #[test]
    fn test_resolve_and_parse_not_found() {
        let registry = registry();
        let key_types = key_types();
        let codec = Codec::new(&registry, &key_types);

        assert!(codec
            .resolve_and_parse("xyz-1", None)
            .unwrap_err()
            .is_not_found());
        assert!(codec
            .resolve_and_parse("ord-1", Some("User"))
            .unwrap_err()
            .is_not_found());
        assert!(codec
            .resolve_and_parse("usr-abc", None)
            .unwrap_err()
            .is_invalid());
    }

    #[test]
    fn test_is_valid_for() {
        let registry = registry();
        let key_types = key_types();
        let codec = Codec::new(&registry, &key_types);

        assert!(codec.is_valid_for("User", "usr-1"));
        assert!(!codec.is_valid_for("User", "usr-x"));
        assert!(!codec.is_valid_for("User", "ord-1"));
        assert!(!codec.is_valid_for("ghost", "ghost-1"));
    }

    #[test]
    fn test_format_does_not_check_key_type() {
        let registry = registry();
        let key_types = key_types();
        let codec = Codec::new(&registry, &key_types);

        let id = codec.format_key("User", &NativeKey::from("abc")).unwrap();
        assert_eq!(id, "usr-abc");
        assert!(codec.parse("User", Some(id.as_str())).unwrap_err().is_invalid());
    }

    #[test]
    fn test_parse_many() {
        let registry = registry();
        let key_types = key_types();
        let codec = Codec::new(&registry, &key_types);

        let keys = codec.parse_many("User", ["usr-1", "ord-2", "usr-3"]).unwrap();
        assert_eq!(
            keys,
            vec![Some(NativeKey::Int(1)), None, Some(NativeKey::Int(3))]
        );
        assert!(codec.parse_many("User", ["usr-1", "usr-x"]).is_err());
    }

    proptest! {
        #[test]
        fn prop_int_roundtrip(value in 0i64..=i64::MAX) {
            let registry = registry();
            let key_types = key_types();
            let codec = Codec::new(&registry, &key_types);

            let key = NativeKey::Int(value);
            let id = codec.format_key("Invoice", &key).unwrap();
            prop_assert_eq!(codec.parse("Invoice", Some(id.as_str())).unwrap(), Some(key));
        }

        #[test]
        fn prop_string_roundtrip(value in "[a-zA-Z0-9_-]{0,24}") {
            let registry = registry();
            let key_types = key_types();
            let codec = Codec::new(&registry, &key_types);

            let key = NativeKey::String(value);
            let id = codec.format_key("Session", &key).unwrap();
            prop_assert_eq!(codec.parse("Session", Some(id.as_str())).unwrap(), Some(key));
        }
    }
}

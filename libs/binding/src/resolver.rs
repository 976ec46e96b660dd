//! Identifier to record resolution.

use pidmap_core::{Codec, NativeKey};
use serde::Serialize;
use tracing::debug;

use crate::error::BindingError;
use crate::repository::{Repository, RepositoryProvider};

/// A record found through its prefixed identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Found<R> {
    pub entity_type: String,
    pub key: NativeKey,
    pub record: R,
}

/// Loads records by prefixed identifier.
pub struct Resolver<'a, P> {
    codec: Codec<'a>,
    provider: &'a P,
}

impl<'a, P> Resolver<'a, P>
where
    P: RepositoryProvider,
{
    pub fn new(codec: Codec<'a>, provider: &'a P) -> Self {
        Self { codec, provider }
    }

    pub fn codec(&self) -> &Codec<'a> {
        &self.codec
    }

    fn repository(
        &self,
        entity_type: &str,
    ) -> Result<&dyn Repository<Record = P::Record>, BindingError> {
        self.provider
            .repository(entity_type)
            .ok_or_else(|| BindingError::NoRepository {
                entity_type: entity_type.to_string(),
            })
    }

    fn load(&self, entity_type: &str, key: &NativeKey) -> Result<Option<P::Record>, BindingError> {
        self.repository(entity_type)?
            .find(key)
            .map_err(|source| BindingError::Repository {
                entity_type: entity_type.to_string(),
                source,
            })
    }

    /// Finds the record behind an identifier whose entity type is inferred
    /// from the prefix.
    ///
    /// Unknown prefixes and missing records yield `Ok(None)`.
    pub fn find(
        &self,
        id: &str,
        wished: Option<&str>,
    ) -> Result<Option<Found<P::Record>>, BindingError> {
        let Some(entity_type) = self.codec.registry().find_entity_type(id, wished) else {
            debug!(id, ?wished, "no entity type for identifier");
            return Ok(None);
        };
        let Some(key) = self.codec.parse(entity_type, Some(id))? else {
            return Ok(None);
        };

        Ok(self.load(entity_type, &key)?.map(|record| Found {
            entity_type: entity_type.to_string(),
            key,
            record,
        }))
    }

    /// Like [`Resolver::find`], but a miss is [`BindingError::NotFound`].
    pub fn find_or_fail(
        &self,
        id: &str,
        wished: Option<&str>,
    ) -> Result<Found<P::Record>, BindingError> {
        self.find(id, wished)?
            .ok_or_else(|| BindingError::not_found(id))
    }

    /// Finds a record of a known entity type.
    ///
    /// An identifier with another prefix yields `Ok(None)`.
    pub fn find_for(&self, entity_type: &str, id: &str) -> Result<Option<P::Record>, BindingError> {
        match self.codec.parse(entity_type, Some(id))? {
            Some(key) => self.load(entity_type, &key),
            None => Ok(None),
        }
    }

    /// Finds every record of `entity_type` among `ids`.
    ///
    /// Identifiers of another prefix and missing records are skipped.
    pub fn find_many_for<I, S>(&self, entity_type: &str, ids: I) -> Result<Vec<P::Record>, BindingError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: Vec<NativeKey> = self
            .codec
            .parse_many(entity_type, ids)?
            .into_iter()
            .flatten()
            .collect();
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        self.repository(entity_type)?
            .find_many(&keys)
            .map_err(|source| BindingError::Repository {
                entity_type: entity_type.to_string(),
                source,
            })
    }

    /// Like [`Resolver::find_for`], but a miss is [`BindingError::NotFound`].
    pub fn find_or_fail_for(&self, entity_type: &str, id: &str) -> Result<P::Record, BindingError> {
        self.find_for(entity_type, id)?
            .ok_or_else(|| BindingError::not_found(id))
    }

    /// Returns true if a record of `entity_type` exists for `id`.
    pub fn exists_for(&self, entity_type: &str, id: &str) -> Result<bool, BindingError> {
        let Some(key) = self.codec.parse(entity_type, Some(id))? else {
            return Ok(false);
        };
        self.repository(entity_type)?
            .exists(&key)
            .map_err(|source| BindingError::Repository {
                entity_type: entity_type.to_string(),
                source,
            })
    }
}

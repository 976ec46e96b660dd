//! Persistence capability consumed by the resolver.
//!
//! The registry only knows entity type names; a [`RepositoryProvider`] maps a
//! name to whatever can load records of that type.

use std::collections::{BTreeMap, HashMap};

use pidmap_core::NativeKey;

use crate::error::RepositoryError;

/// Loads records of one entity type by native key.
pub trait Repository: Send + Sync {
    type Record;

    /// Loads the record with `key`.
    fn find(&self, key: &NativeKey) -> Result<Option<Self::Record>, RepositoryError>;

    /// Loads every record matching one of `keys`; missing keys are skipped.
    fn find_many(&self, keys: &[NativeKey]) -> Result<Vec<Self::Record>, RepositoryError> {
        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(record) = self.find(key)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Returns true if a record with `key` exists.
    fn exists(&self, key: &NativeKey) -> Result<bool, RepositoryError> {
        Ok(self.find(key)?.is_some())
    }
}

/// Hands out the repository serving an entity type.
pub trait RepositoryProvider: Send + Sync {
    type Record;

    fn repository(&self, entity_type: &str) -> Option<&dyn Repository<Record = Self::Record>>;
}

/// Repository backed by an in-memory map.
#[derive(Debug, Clone)]
pub struct MemoryRepository<R> {
    records: BTreeMap<NativeKey, R>,
}

impl<R> Default for MemoryRepository<R> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }
}

impl<R> MemoryRepository<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record` under `key`, returning the previous record.
    pub fn insert(&mut self, key: impl Into<NativeKey>, record: R) -> Option<R> {
        self.records.insert(key.into(), record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R, K> FromIterator<(K, R)> for MemoryRepository<R>
where
    K: Into<NativeKey>,
{
    fn from_iter<I: IntoIterator<Item = (K, R)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().map(|(k, r)| (k.into(), r)).collect(),
        }
    }
}

impl<R> Repository for MemoryRepository<R>
where
    R: Clone + Send + Sync,
{
    type Record = R;

    fn find(&self, key: &NativeKey) -> Result<Option<R>, RepositoryError> {
        Ok(self.records.get(key).cloned())
    }

    fn exists(&self, key: &NativeKey) -> Result<bool, RepositoryError> {
        Ok(self.records.contains_key(key))
    }
}

/// Provider holding one [`MemoryRepository`] per entity type.
#[derive(Debug, Clone)]
pub struct MemoryProvider<R> {
    repositories: HashMap<String, MemoryRepository<R>>,
}

impl<R> Default for MemoryProvider<R> {
    fn default() -> Self {
        Self {
            repositories: HashMap::new(),
        }
    }
}

impl<R> MemoryProvider<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `entity_type` from `repository`.
    #[must_use]
    pub fn with(mut self, entity_type: impl Into<String>, repository: MemoryRepository<R>) -> Self {
        self.repositories.insert(entity_type.into(), repository);
        self
    }

    /// Mutable access to the repository of `entity_type`, created on demand.
    pub fn repository_mut(&mut self, entity_type: impl Into<String>) -> &mut MemoryRepository<R> {
        self.repositories.entry(entity_type.into()).or_default()
    }
}

impl<R> RepositoryProvider for MemoryProvider<R>
where
    R: Clone + Send + Sync,
{
    type Record = R;

    fn repository(&self, entity_type: &str) -> Option<&dyn Repository<Record = R>> {
        self.repositories
            .get(entity_type)
            .map(|repo| repo as &dyn Repository<Record = R>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_repository() {
        let repo: MemoryRepository<&str> = [(1i64, "alice"), (2, "bob")].into_iter().collect();
        assert_eq!(repo.len(), 2);
        assert_eq!(repo.find(&NativeKey::Int(1)).unwrap(), Some("alice"));
        assert_eq!(repo.find(&NativeKey::Int(3)).unwrap(), None);
        assert!(repo.exists(&NativeKey::Int(2)).unwrap());

        let many = repo
            .find_many(&[NativeKey::Int(2), NativeKey::Int(9), NativeKey::Int(1)])
            .unwrap();
        assert_eq!(many, ["bob", "alice"]);
    }

    #[test]
    fn test_memory_provider() {
        let mut provider = MemoryProvider::new();
        provider.repository_mut("User").insert(1i64, "alice");

        assert!(provider.repository("User").is_some());
        assert!(provider.repository("Order").is_none());
    }
}

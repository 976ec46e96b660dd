//! Record files for the `find` command.
//!
//! A records file is a JSON object keyed by entity type, each holding an
//! array of records. The key field (default `id`) becomes the native key:
//!
//! ```json
//! { "User": [{ "id": 1, "name": "alice" }] }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use pidmap_binding::MemoryProvider;
use pidmap_core::NativeKey;
use serde_json::Value;

/// Load a records file into an in-memory provider.
pub fn load(path: &Path, key_field: &str) -> Result<MemoryProvider<Value>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read records from {}", path.display()))?;
    parse(&contents, key_field)
        .with_context(|| format!("Failed to parse records from {}", path.display()))
}

fn parse(contents: &str, key_field: &str) -> Result<MemoryProvider<Value>> {
    let tables: BTreeMap<String, Vec<Value>> =
        serde_json::from_str(contents).context("records must map entity types to arrays")?;

    let mut provider = MemoryProvider::new();
    for (entity_type, records) in tables {
        let repository = provider.repository_mut(entity_type.as_str());
        for (idx, record) in records.into_iter().enumerate() {
            let key = match record.get(key_field) {
                Some(Value::Number(n)) => match n.as_i64() {
                    Some(v) => NativeKey::Int(v),
                    None => bail!("{entity_type}[{idx}].{key_field} is not an integer"),
                },
                Some(Value::String(s)) => NativeKey::String(s.clone()),
                _ => bail!("{entity_type}[{idx}] has no '{key_field}' field"),
            };
            repository.insert(key, record);
        }
    }
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pidmap_binding::RepositoryProvider;

    #[test]
    fn parse_records() {
        let provider = parse(
            r#"{"User": [{"id": 1, "name": "alice"}], "Session": [{"id": "abc"}]}"#,
            "id",
        )
        .unwrap();

        let users = provider.repository("User").unwrap();
        let alice = users.find(&NativeKey::Int(1)).unwrap().unwrap();
        assert_eq!(alice["name"], "alice");
        assert!(provider
            .repository("Session")
            .unwrap()
            .exists(&NativeKey::from("abc"))
            .unwrap());
    }

    #[test]
    fn missing_key_field() {
        let err = parse(r#"{"User": [{"name": "alice"}]}"#, "id").unwrap_err();
        assert!(err.to_string().contains("has no 'id' field"));
    }
}

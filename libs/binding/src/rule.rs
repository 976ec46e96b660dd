//! Validation rule: the identifier points at an existing record.

use crate::error::BindingError;
use crate::repository::RepositoryProvider;
use crate::resolver::Resolver;

/// Passes when the value is a prefixed identifier of an existing record.
///
/// Without an entity type the rule infers one from the prefix (first listed
/// for shared prefixes).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistsRule {
    entity_type: Option<String>,
}

impl ExistsRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_entity(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: Some(entity_type.into()),
        }
    }

    /// Checks `value`.
    ///
    /// Malformed identifiers fail the rule; configuration and repository
    /// errors are returned.
    pub fn passes<P>(&self, resolver: &Resolver<'_, P>, value: &str) -> Result<bool, BindingError>
    where
        P: RepositoryProvider,
    {
        let entity_type = match &self.entity_type {
            Some(entity_type) => entity_type.as_str(),
            None => match resolver.codec().registry().find_entity_type(value, None) {
                Some(entity_type) => entity_type,
                None => return Ok(false),
            },
        };

        match resolver.exists_for(entity_type, value) {
            Err(BindingError::Pid(e)) if e.is_invalid() => Ok(false),
            other => other,
        }
    }

    /// Message for a failed check.
    pub fn message(&self, attribute: &str) -> String {
        format!("Given {attribute} does not exist.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryProvider;
    use pidmap_core::Codec;
    use pidmap_testing::{example_key_types, example_registry};
    use rstest::rstest;

    #[rstest]
    #[case(ExistsRule::new(), "usr-1", true)]
    #[case(ExistsRule::new(), "usr-2", false)]
    #[case(ExistsRule::new(), "usr-abc", false)]
    #[case(ExistsRule::new(), "xyz-1", false)]
    #[case(ExistsRule::new(), "ord-1", true)]
    #[case(ExistsRule::for_entity("User"), "ord-1", false)]
    #[case(ExistsRule::for_entity("Invoice"), "ord-1", false)]
    #[case(ExistsRule::for_entity("Order"), "ord-1", true)]
    fn test_passes(#[case] rule: ExistsRule, #[case] value: &str, #[case] expected: bool) {
        let registry = example_registry();
        let key_types = example_key_types();
        let mut provider = MemoryProvider::new();
        provider.repository_mut("User").insert(1i64, ());
        provider.repository_mut("Order").insert(1i64, ());
        provider.repository_mut("Invoice");
        let resolver = Resolver::new(Codec::new(&registry, &key_types), &provider);

        assert_eq!(rule.passes(&resolver, value).unwrap(), expected);
    }

    #[test]
    fn test_configuration_errors_surface() {
        let registry = example_registry();
        let key_types = example_key_types();
        let provider: MemoryProvider<()> = MemoryProvider::new();
        let resolver = Resolver::new(Codec::new(&registry, &key_types), &provider);

        assert!(ExistsRule::for_entity("ghost")
            .passes(&resolver, "ghost-1")
            .unwrap_err()
            .is_configuration());
        assert!(ExistsRule::new()
            .passes(&resolver, "usr-1")
            .unwrap_err()
            .is_configuration());
    }

    #[test]
    fn test_message() {
        assert_eq!(
            ExistsRule::new().message("owner"),
            "Given owner does not exist."
        );
    }
}

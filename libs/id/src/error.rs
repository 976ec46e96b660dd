//! Error types for registry construction and identifier coercion.

use thiserror::Error;

/// Errors surfaced by the registry and the codec.
///
/// Ordinary misses (no key yet, identifier belongs to another entity type)
/// are `None` results, not errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PidError {
    /// The prefix table is invalid, or an entity type has no prefix.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The suffix of a recognized identifier cannot be coerced to the key type.
    #[error("invalid identifier '{id}': {reason}")]
    InvalidIdentifier { id: String, reason: String },

    /// No entity type could be inferred from the identifier.
    #[error("no entity type registered for identifier '{id}'")]
    NotFound { id: String },
}

impl PidError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        PidError::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn unregistered(entity_type: &str) -> Self {
        Self::configuration(format!(
            "entity type '{entity_type}' doesn't have a prefix registered"
        ))
    }

    pub(crate) fn invalid(id: impl Into<String>, reason: impl Into<String>) -> Self {
        PidError::InvalidIdentifier {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this error indicates a setup bug.
    pub fn is_configuration(&self) -> bool {
        matches!(self, PidError::Configuration { .. })
    }

    /// Returns true if this error indicates a malformed identifier.
    pub fn is_invalid(&self) -> bool {
        matches!(self, PidError::InvalidIdentifier { .. })
    }

    /// Returns true if no entity type matched the identifier.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PidError::NotFound { .. })
    }
}

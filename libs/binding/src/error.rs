//! Error types for record lookup and casting.

use pidmap_core::PidError;
use thiserror::Error;

/// Boxed error returned by repository implementations.
pub type RepositoryError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur when resolving identifiers to records.
#[derive(Debug, Error)]
pub enum BindingError {
    /// Registry or codec failure.
    #[error(transparent)]
    Pid(#[from] PidError),

    /// No record (or no entity type) matches the identifier.
    #[error("no record found for '{id}'")]
    NotFound { id: String },

    /// The entity type is registered but no repository serves it.
    #[error("no repository available for entity type '{entity_type}'")]
    NoRepository { entity_type: String },

    /// The repository failed.
    #[error("repository error for entity type '{entity_type}': {source}")]
    Repository {
        entity_type: String,
        #[source]
        source: RepositoryError,
    },
}

impl BindingError {
    /// Returns true if nothing matched the identifier.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BindingError::NotFound { .. } | BindingError::Pid(PidError::NotFound { .. })
        )
    }

    /// Returns true if the failure points at a setup bug.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BindingError::NoRepository { .. } | BindingError::Pid(PidError::Configuration { .. })
        )
    }

    pub(crate) fn not_found(id: impl Into<String>) -> Self {
        BindingError::NotFound { id: id.into() }
    }
}

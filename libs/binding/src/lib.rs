//! # pidmap-binding
//!
//! Glue between prefixed identifiers and the layers around them:
//!
//! - [`Resolver`]: load records by identifier through a [`RepositoryProvider`]
//! - [`KeyCast`]: store identifiers as native keys and format them back
//! - [`ExistsRule`]: validate that an identifier points at a record
//! - [`FilterBuilder`]: turn identifiers into key filters for a query layer
//!
//! Entity types are plain names; nothing here loads types by reflection.

mod cast;
mod error;
mod filter;
mod repository;
mod resolver;
mod rule;

pub use cast::{AttributeValue, CastContext, KeyCast};
pub use error::{BindingError, RepositoryError};
pub use filter::{Conjunction, FilterBuilder, FilterOp, KeyFilter};
pub use repository::{MemoryProvider, MemoryRepository, Repository, RepositoryProvider};
pub use resolver::{Found, Resolver};

//! # pidmap-core
//!
//! Prefixed identifiers for records whose storage keys are plain integers
//! (or strings).
//!
//! ## ID Format
//!
//! External identifiers use the format `{prefix}-{key}`:
//! - `usr-42`
//! - `ord-9`
//!
//! The prefix table is static configuration. A prefix may be shared by
//! several entity types; the first listed is the default when an identifier
//! is resolved without naming one.
//!
//! ## Components
//!
//! - [`Registry`]: read-only prefix and foreign-key tables
//! - [`Codec`]: format and parse, scoped to one entity type at a time
//!
//! ```ignore
//! let registry = Registry::builder()
//!     .prefix("usr", ["User"])
//!     .prefix("ord", ["Order", "Invoice"])
//!     .foreign_key("owner_id", "User")
//!     .build()?;
//! let codec = Codec::new(&registry, &KeyType::Int);
//!
//! assert_eq!(codec.format_key("User", &42.into())?, "usr-42");
//! ```

mod codec;
mod config;
mod entity;
mod error;
mod key;
mod macros;
mod registry;

pub use codec::{Codec, ResolvedKey};
pub use config::{EntityTypes, OrderedTable, RegistryConfig};
pub use entity::Entity;
pub use error::PidError;
pub use key::{KeyType, KeyTypeMap, KeyTypes, NativeKey, PrefixedId, SEPARATOR};
pub use registry::{ForeignKeyBinding, PrefixRegistration, Registry, RegistryBuilder};

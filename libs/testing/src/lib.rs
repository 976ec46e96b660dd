//! Shared fixtures for pidmap tests.
//!
//! The example tables model a small shop: users, orders and invoices sharing
//! the `ord` prefix, and string-keyed sessions.

use pidmap_core::{define_entity, KeyTypeMap, Registry, RegistryConfig};

/// Example configuration document.
pub const EXAMPLE_TOML: &str = r#"
[models]
usr = "User"
ord = ["Order", "Invoice"]
ses = "Session"

[foreign_keys]
owner_id = "User"
order_id = "Order"
session_id = "Session"

[key_types]
Session = "string"
"#;

define_entity!(User, "User");
define_entity!(Order, "Order");
define_entity!(Invoice, "Invoice");
define_entity!(Session, "Session", String);

/// Parsed [`EXAMPLE_TOML`].
pub fn example_config() -> RegistryConfig {
    RegistryConfig::from_toml_str(EXAMPLE_TOML).expect("example config is valid")
}

/// Registry built from [`EXAMPLE_TOML`].
pub fn example_registry() -> Registry {
    Registry::from_config(&example_config()).expect("example registry is valid")
}

/// Key types declared in [`EXAMPLE_TOML`].
pub fn example_key_types() -> KeyTypeMap {
    example_config().key_type_map()
}

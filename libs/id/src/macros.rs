//! Macros for declaring entity types.

/// Declares a marker type implementing [`crate::Entity`].
///
/// The key type defaults to `Int`.
///
/// # Example
///
/// ```ignore
/// define_entity!(User, "User");
/// define_entity!(Session, "Session", String);
///
/// let id = User::format_prefixed_id(&codec, Some(&42.into()))?;
/// ```
#[macro_export]
macro_rules! define_entity {
    ($name:ident, $entity:literal) => {
        $crate::define_entity!($name, $entity, Int);
    };
    ($name:ident, $entity:literal, $key_type:ident) => {
        /// Marker type for this entity type.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name;

        impl $crate::Entity for $name {
            const NAME: &'static str = $entity;
            const KEY_TYPE: $crate::KeyType = $crate::KeyType::$key_type;
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($entity)
            }
        }
    };
}

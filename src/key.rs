//! Service key types for the container.

use std::any::TypeId;
use std::hash::{Hash, Hasher};

/// Key for service storage and lookup.
///
/// - **Type**: a concrete implementation, identified by `TypeId`
/// - **Trait**: an abstraction (`dyn Trait`), identified by its type name
/// - **MultiTrait**: one of several bindings for the same abstraction
///
/// ```rust
/// use ferrous_autowire::{key_of_type, Key};
///
/// let key = key_of_type::<String>();
/// assert_eq!(key.display_name(), "alloc::string::String");
/// assert_eq!(Key::Trait("dyn app::Payment").display_name(), "dyn app::Payment");
/// ```
#[derive(Debug, Clone)]
pub enum Key {
    /// Concrete type key with TypeId and name for diagnostics
    Type(TypeId, &'static str),
    /// Abstraction key
    Trait(&'static str),
    /// Binding `index` of an abstraction with several implementations
    MultiTrait(&'static str, usize),
}

impl Key {
    /// The type or trait name, as returned by `std::any::type_name`.
    pub fn display_name(&self) -> &'static str {
        match self {
            Key::Type(_, name) => name,
            Key::Trait(name) => name,
            Key::MultiTrait(name, _) => name,
        }
    }
}

// Concrete keys compare by TypeId only; the name is diagnostic.
impl PartialEq for Key {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a == b,
            (Key::Trait(a), Key::Trait(b)) => a == b,
            (Key::MultiTrait(a, i), Key::MultiTrait(b, j)) => a == b && i == j,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl Hash for Key {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Key::Type(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            Key::Trait(name) => {
                1u8.hash(state);
                name.hash(state);
            }
            Key::MultiTrait(name, idx) => {
                2u8.hash(state);
                name.hash(state);
                idx.hash(state);
            }
        }
    }
}

#[inline]
pub fn key_of_type<T: 'static>() -> Key {
    Key::Type(TypeId::of::<T>(), std::any::type_name::<T>())
}

//! Service descriptors for introspection and diagnostics.

use std::any::TypeId;

use crate::key::Key;
use crate::lifetime::Lifetime;

/// Describes one registration held by a `ServiceCollection`.
///
/// Scanned components show up twice: once under their concrete type and
/// once per abstraction they were bound to.
///
/// ```rust
/// use ferrous_autowire::{ServiceCollection, Lifetime};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct Repository { name: String }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Database { url: "postgres://localhost".to_string() });
/// services.add_scoped_factory::<Repository, _>(|_| Repository { name: "UserRepo".to_string() });
///
/// let descriptors = services.get_service_descriptors();
/// let db = descriptors.iter()
///     .find(|d| d.type_name().contains("Database"))
///     .unwrap();
/// assert_eq!(db.lifetime, Lifetime::Singleton);
/// assert!(!db.is_multi());
///
/// let scoped = descriptors.iter().filter(|d| d.lifetime == Lifetime::Scoped).count();
/// assert_eq!(scoped, 1);
/// ```
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    /// The service key
    pub key: Key,
    /// Service lifetime
    pub lifetime: Lifetime,
    /// Implementation type ID (if known)
    pub impl_type_id: Option<TypeId>,
    /// Implementation type name (if known)
    pub impl_type_name: Option<&'static str>,
}

impl ServiceDescriptor {
    /// The type or abstraction name this descriptor is keyed by.
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    /// Whether this is one of several bindings for an abstraction.
    pub fn is_multi(&self) -> bool {
        matches!(self.key, Key::MultiTrait(..))
    }
}

//! Service lifetime definitions.

use std::fmt;

/// Service lifetimes controlling instance caching behavior
///
/// A lifetime is what the classifier assigns to every registered candidate.
/// The registrar never caches anything itself; the lifetime is handed to the
/// container, which decides whether a resolve returns a fresh or a cached
/// instance.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{ServiceCollection, Resolver, Lifetime};
///
/// struct Database { url: String }
/// struct RequestModel { id: u32 }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Database { url: "postgres://localhost".to_string() });
/// services.add_transient_factory::<RequestModel, _>(|_| RequestModel { id: 7 });
///
/// let provider = services.build();
///
/// let db1 = provider.get_required::<Database>();
/// let db2 = provider.create_scope().get_required::<Database>();
/// assert!(std::ptr::eq(&*db1, &*db2));
///
/// let m1 = provider.get_required::<RequestModel>();
/// let m2 = provider.get_required::<RequestModel>();
/// assert!(!std::ptr::eq(&*m1, &*m2));
/// assert_eq!(Lifetime::Scoped.to_string(), "scoped");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// Single instance per root provider, cached forever
    Singleton,
    /// Single instance per scope, cached for the scope's lifetime
    Scoped,
    /// New instance per resolution, never cached
    Transient,
}

impl Lifetime {
    /// Lowercase name used in log fields and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Lifetime::Singleton => "singleton",
            Lifetime::Scoped => "scoped",
            Lifetime::Transient => "transient",
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

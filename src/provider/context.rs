//! Resolver context handed to constructors.

use std::any::TypeId;
use std::sync::Arc;

use crate::key::Key;
use crate::named::RegistryEntry;
use crate::registration::AnyArc;
use crate::traits::{Resolver, ResolverCore};
use crate::DiResult;

/// Context passed to constructors for resolving their dependencies.
///
/// Wraps whichever resolver (`ServiceProvider` or `Scope`) is constructing
/// the value, so a scoped constructor sees the services of its own scope.
///
/// ```
/// use ferrous_autowire::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Database { url: "postgres://localhost".to_string() });
/// services.add_transient_factory::<UserService, _>(|resolver| UserService {
///     db: resolver.get_required::<Database>(),
/// });
///
/// let provider = services.build();
/// assert_eq!(provider.get_required::<UserService>().db.url, "postgres://localhost");
/// ```
pub struct ResolverContext<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new<T>(resolver: &'a T) -> Self
    where
        T: ResolverCore,
    {
        Self { resolver }
    }
}

impl<'a> ResolverCore for ResolverContext<'a> {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        self.resolver.resolve_any(key)
    }

    fn resolve_many(&self, key: &Key) -> DiResult<Vec<AnyArc>> {
        self.resolver.resolve_many(key)
    }

    fn registered_entries(&self, abstraction: TypeId) -> Option<Arc<[RegistryEntry]>> {
        self.resolver.registered_entries(abstraction)
    }
}

impl<'a> Resolver for ResolverContext<'a> {}

//! Scoped service resolution.

use std::any::TypeId;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::ServiceProvider;
use crate::internal::with_circular_catch;
use crate::named::RegistryEntry;
use crate::registration::AnyArc;
use crate::traits::{Resolver, ResolverCore};
use crate::{DiResult, Key};

/// Resolution context with its own cache for scoped services.
///
/// - **Singleton**: resolved and cached in the root provider
/// - **Scoped**: resolved and cached in this scope
/// - **Transient**: built on every resolution
///
/// ```
/// use ferrous_autowire::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct DatabaseConnection(String);
/// struct UserService { db: Arc<DatabaseConnection> }
///
/// let mut collection = ServiceCollection::new();
/// collection.add_scoped_factory::<DatabaseConnection, _>(|_| DatabaseConnection("conn-1".into()));
/// collection.add_transient_factory::<UserService, _>(|r| UserService {
///     db: r.get_required::<DatabaseConnection>(),
/// });
///
/// let provider = collection.build();
/// let scope = provider.create_scope();
/// let user1 = scope.get_required::<UserService>();
/// let user2 = scope.get_required::<UserService>();
/// assert!(Arc::ptr_eq(&user1.db, &user2.db));
/// ```
pub struct Scope {
    root: ServiceProvider,
    /// One cell per scoped registration, indexed by its slot
    slots: Box<[OnceCell<AnyArc>]>,
}

impl Scope {
    pub(crate) fn new(root: ServiceProvider) -> Self {
        let slots = (0..root.inner().registry.scoped_count)
            .map(|_| OnceCell::new())
            .collect();
        Self { root, slots }
    }

    /// The provider this scope was created from.
    pub fn root(&self) -> &ServiceProvider {
        &self.root
    }
}

impl ResolverCore for Scope {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        with_circular_catch(key.display_name(), || {
            let reg = self.root.lookup(key)?;
            self.root.resolve_registration(reg, self, Some(&*self.slots))
        })
    }

    fn resolve_many(&self, key: &Key) -> DiResult<Vec<AnyArc>> {
        with_circular_catch(key.display_name(), || {
            self.root.resolve_many_with(key, self, Some(&*self.slots))
        })
    }

    fn registered_entries(&self, abstraction: TypeId) -> Option<Arc<[RegistryEntry]>> {
        self.root.registered_entries(abstraction)
    }
}

impl Resolver for Scope {}

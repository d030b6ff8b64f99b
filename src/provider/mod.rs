//! Service provider: the resolve side of the container.

use std::any::TypeId;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::internal::with_circular_catch;
use crate::named::{FrozenNamedTypes, NamedTypes, RegistryEntry};
use crate::registration::{AnyArc, Registration, Registry};
use crate::traits::{Resolver, ResolverCore};
use crate::{DiError, DiResult, Key, Lifetime};

pub mod context;
pub mod scope;
pub use context::ResolverContext;
pub use scope::Scope;

/// Resolves registered services according to their lifetimes.
///
/// Singletons are cached in the provider and shared by every scope.
/// Scoped services can only be resolved from a [`Scope`]. The provider also
/// owns the frozen named registry that factories read from.
///
/// `ServiceProvider` is `Send + Sync` and clones share the same state.
///
/// ```
/// use ferrous_autowire::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut collection = ServiceCollection::new();
/// collection.add_singleton(Database { url: "postgres://localhost".to_string() });
/// collection.add_transient_factory::<UserService, _>(|resolver| {
///     UserService { db: resolver.get_required::<Database>() }
/// });
///
/// let provider = collection.build();
/// let user_service = provider.get_required::<UserService>();
/// assert_eq!(user_service.db.url, "postgres://localhost");
/// ```
#[derive(Clone)]
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

pub(crate) struct ProviderInner {
    pub(crate) registry: Registry,
    named: FrozenNamedTypes,
}

impl ServiceProvider {
    pub(crate) fn new(registry: Registry, named: NamedTypes) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                registry,
                named: named.freeze(),
            }),
        }
    }

    #[inline]
    pub(crate) fn inner(&self) -> &ProviderInner {
        &self.inner
    }

    /// Creates a new scope for resolving scoped services.
    ///
    /// ```
    /// use ferrous_autowire::{ServiceCollection, Resolver};
    /// use std::sync::Arc;
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    ///
    /// struct RequestId(usize);
    ///
    /// let counter = Arc::new(AtomicUsize::new(0));
    /// let c = counter.clone();
    /// let mut collection = ServiceCollection::new();
    /// collection.add_scoped_factory::<RequestId, _>(move |_| RequestId(c.fetch_add(1, Ordering::SeqCst)));
    ///
    /// let provider = collection.build();
    /// let scope1 = provider.create_scope();
    /// let scope2 = provider.create_scope();
    ///
    /// assert!(Arc::ptr_eq(&scope1.get_required::<RequestId>(), &scope1.get_required::<RequestId>()));
    /// assert!(!Arc::ptr_eq(&scope1.get_required::<RequestId>(), &scope2.get_required::<RequestId>()));
    /// ```
    pub fn create_scope(&self) -> Scope {
        Scope::new(self.clone())
    }

    /// Every abstraction with named entries, with its entries, in scan order.
    pub fn named_registrations(&self) -> impl Iterator<Item = (&'static str, &[RegistryEntry])> {
        self.inner.named.iter()
    }

    /// Looks up the registration behind `key`.
    ///
    /// A trait key without a single binding falls back to the last of its
    /// multi bindings.
    pub(crate) fn lookup(&self, key: &Key) -> DiResult<&Registration> {
        let registry = &self.inner().registry;
        if let Some(reg) = registry.get(key) {
            return Ok(reg);
        }
        let found = match key {
            Key::Trait(name) => registry.many.get(name).and_then(|regs| regs.last()),
            Key::MultiTrait(name, index) => registry.many.get(name).and_then(|regs| regs.get(*index)),
            Key::Type(..) => None,
        };
        found.ok_or(DiError::NotFound(key.display_name()))
    }

    /// Produces the value for `reg`, caching it per its lifetime.
    ///
    /// `caller` is the resolver constructors receive for transient and
    /// scoped values; singletons are always built against the root so they
    /// never capture scoped state. `scoped` is `None` when resolving from
    /// the root provider.
    ///
    /// Cached lifetimes run their constructor at most once: concurrent first
    /// resolves block on the cell until the winner has built the value.
    pub(crate) fn resolve_registration<R: ResolverCore>(
        &self,
        reg: &Registration,
        caller: &R,
        scoped: Option<&[OnceCell<AnyArc>]>,
    ) -> DiResult<AnyArc> {
        match reg.lifetime {
            Lifetime::Singleton => match &reg.single_runtime {
                Some(cell) => cell
                    .get_or_try_init(|| (reg.ctor)(&ResolverContext::new(self)))
                    .cloned(),
                None => (reg.ctor)(&ResolverContext::new(self)),
            },
            Lifetime::Scoped => {
                let cells = scoped.ok_or(DiError::WrongLifetime(
                    "Cannot resolve scoped service from root provider",
                ))?;
                match reg.scoped_slot.and_then(|slot| cells.get(slot)) {
                    Some(cell) => cell
                        .get_or_try_init(|| (reg.ctor)(&ResolverContext::new(caller)))
                        .cloned(),
                    None => (reg.ctor)(&ResolverContext::new(caller)),
                }
            }
            Lifetime::Transient => (reg.ctor)(&ResolverContext::new(caller)),
        }
    }

    pub(crate) fn resolve_many_with<R: ResolverCore>(
        &self,
        key: &Key,
        caller: &R,
        scoped: Option<&[OnceCell<AnyArc>]>,
    ) -> DiResult<Vec<AnyArc>> {
        let Key::Trait(name) = key else {
            return Ok(Vec::new());
        };
        match self.inner().registry.many.get(name) {
            Some(regs) => regs
                .iter()
                .map(|reg| self.resolve_registration(reg, caller, scoped))
                .collect(),
            None => Ok(Vec::new()),
        }
    }
}

impl ResolverCore for ServiceProvider {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        with_circular_catch(key.display_name(), || {
            let reg = self.lookup(key)?;
            self.resolve_registration(reg, self, None)
        })
    }

    fn resolve_many(&self, key: &Key) -> DiResult<Vec<AnyArc>> {
        with_circular_catch(key.display_name(), || self.resolve_many_with(key, self, None))
    }

    fn registered_entries(&self, abstraction: TypeId) -> Option<Arc<[RegistryEntry]>> {
        self.inner.named.get(abstraction)
    }
}

impl Resolver for ServiceProvider {}

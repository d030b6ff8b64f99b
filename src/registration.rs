//! Service registration types.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::DiResult;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::TypeInfo;

pub(crate) use crate::provider::ResolverContext;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type Ctor = Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync>;

/// Turns a resolved implementation (`Arc<C>` erased) into `Arc<Arc<T>>`
/// erased, `T` being the abstraction it was registered under.
pub(crate) type Upcast = Arc<dyn Fn(AnyArc) -> DiResult<AnyArc> + Send + Sync>;

/// Handle for an abstraction used as a registration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceType {
    id: TypeId,
    type_name: &'static str,
}

impl ServiceType {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl From<TypeInfo> for ServiceType {
    fn from(info: TypeInfo) -> Self {
        Self {
            id: info.id(),
            type_name: info.type_name(),
        }
    }
}

/// One registration instruction: register `implementation` under `service`
/// with `lifetime`, and list it by `name` in the named registry.
///
/// Produced by the [`Registrar`](crate::Registrar); consumed by a
/// [`RegistrationSink`](crate::RegistrationSink).
#[derive(Clone)]
pub struct TypeRegistration {
    pub service: ServiceType,
    pub implementation: TypeInfo,
    pub lifetime: Lifetime,
    pub name: String,
    pub(crate) ctor: Ctor,
    pub(crate) upcast: Upcast,
}

impl TypeRegistration {
    /// Whether the implementation is registered under its own identity.
    pub fn is_self_binding(&self) -> bool {
        self.service.id() == self.implementation.id()
    }

    pub(crate) fn implementation_key(&self) -> Key {
        Key::Type(self.implementation.id(), self.implementation.type_name())
    }
}

impl fmt::Debug for TypeRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistration")
            .field("service", &self.service.type_name())
            .field("implementation", &self.implementation.type_name())
            .field("lifetime", &self.lifetime)
            .field("name", &self.name)
            .finish()
    }
}

/// Service registration with lifetime and constructor
pub(crate) struct Registration {
    pub(crate) lifetime: Lifetime,
    pub(crate) ctor: Ctor,
    /// Concrete type backing the registration, when known
    pub(crate) impl_id: Option<TypeId>,
    pub(crate) impl_name: Option<&'static str>,
    /// Singleton cache, filled on first resolve
    pub(crate) single_runtime: Option<OnceCell<AnyArc>>,
    /// Scoped slot index, assigned by `Registry::finalize`
    pub(crate) scoped_slot: Option<usize>,
}

impl Registration {
    pub(crate) fn new(lifetime: Lifetime, ctor: Ctor) -> Self {
        let single_runtime = match lifetime {
            Lifetime::Singleton => Some(OnceCell::new()),
            _ => None,
        };

        Self {
            lifetime,
            ctor,
            impl_id: None,
            impl_name: None,
            single_runtime,
            scoped_slot: None,
        }
    }

    pub(crate) fn with_impl(mut self, id: TypeId, name: &'static str) -> Self {
        self.impl_id = Some(id);
        self.impl_name = Some(name);
        self
    }
}

/// Service registry holding all registrations
#[derive(Default)]
pub(crate) struct Registry {
    /// Single bindings in first-registration order
    pub(crate) one: Vec<(Key, Registration)>,
    index: HashMap<Key, usize>,
    /// Multi-binding registrations (append-only)
    pub(crate) many: HashMap<&'static str, Vec<Registration>>,
    many_order: Vec<&'static str>,
    /// Total count of scoped registrations for slot allocation
    pub(crate) scoped_count: usize,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts a single binding; a later registration replaces an earlier one.
    pub(crate) fn insert(&mut self, key: Key, registration: Registration) {
        match self.index.get(&key) {
            Some(&pos) => self.one[pos] = (key, registration),
            None => {
                self.index.insert(key.clone(), self.one.len());
                self.one.push((key, registration));
            }
        }
    }

    /// Appends a binding to an abstraction's multi-binding list.
    pub(crate) fn push_many(&mut self, name: &'static str, registration: Registration) {
        let list = self.many.entry(name).or_default();
        if list.is_empty() {
            self.many_order.push(name);
        }
        list.push(registration);
    }

    #[inline]
    pub(crate) fn get(&self, key: &Key) -> Option<&Registration> {
        self.index.get(key).map(|&pos| &self.one[pos].1)
    }

    #[inline]
    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.index.contains_key(key)
    }

    /// Multi bindings in first-registration order of their abstraction.
    pub(crate) fn iter_many(&self) -> impl Iterator<Item = (&'static str, &[Registration])> {
        self.many_order
            .iter()
            .filter_map(|name| self.many.get(name).map(|regs| (*name, regs.as_slice())))
    }

    /// Assigns scoped slot indices.
    pub(crate) fn finalize(&mut self) {
        let mut next_scoped_slot = 0;

        let singles = self.one.iter_mut().map(|(_, reg)| reg);
        let multis = self.many.values_mut().flat_map(|regs| regs.iter_mut());
        for reg in singles.chain(multis) {
            if reg.lifetime == Lifetime::Scoped {
                reg.scoped_slot = Some(next_scoped_slot);
                next_scoped_slot += 1;
            }
        }

        self.scoped_count = next_scoped_slot;
    }
}

//! Named registry: ordered `(name, implementation)` entries per abstraction.
//!
//! Entries are appended by the registrar while the `ServiceCollection` is
//! being filled, then frozen into shared slices when the provider is built.
//! After that point nothing can add to them, so readers need no locking.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::registration::Upcast;
use crate::{Lifetime, ServiceType, TypeInfo, TypeRegistration};

/// One named pointer from a display name to a concrete type.
#[derive(Clone)]
pub struct RegistryEntry {
    name: Arc<str>,
    implementation: TypeInfo,
    lifetime: Lifetime,
    pub(crate) upcast: Upcast,
}

impl RegistryEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn implementation(&self) -> &TypeInfo {
        &self.implementation
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("name", &self.name)
            .field("implementation", &self.implementation.type_name())
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

struct Table {
    abstraction: &'static str,
    entries: Vec<RegistryEntry>,
}

/// Mutable table of named entries for every abstraction, in scan order.
///
/// No deduplication happens here: the same name may appear twice for one
/// abstraction and lookups return the first. The registrar enforces the
/// strict policy when it is configured.
#[derive(Default)]
pub struct NamedTypes {
    order: Vec<TypeId>,
    tables: HashMap<TypeId, Table>,
}

impl NamedTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the entry described by `registration` under its service.
    pub fn append(&mut self, registration: &TypeRegistration) {
        let service = registration.service;
        if !self.tables.contains_key(&service.id()) {
            self.order.push(service.id());
        }
        let table = self.tables.entry(service.id()).or_insert_with(|| Table {
            abstraction: service.type_name(),
            entries: Vec::new(),
        });
        table.entries.push(RegistryEntry {
            name: Arc::from(registration.name.as_str()),
            implementation: registration.implementation,
            lifetime: registration.lifetime,
            upcast: registration.upcast.clone(),
        });
    }

    /// Whether `name` is already taken for `service`.
    pub fn contains(&self, service: ServiceType, name: &str) -> bool {
        self.tables
            .get(&service.id())
            .map(|t| t.entries.iter().any(|e| e.name() == name))
            .unwrap_or(false)
    }

    pub fn entries(&self, service: ServiceType) -> &[RegistryEntry] {
        self.tables
            .get(&service.id())
            .map(|t| t.entries.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.tables.values().map(|t| t.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn freeze(self) -> FrozenNamedTypes {
        let mut tables = self.tables;
        let mut order = Vec::with_capacity(self.order.len());
        let mut index = HashMap::with_capacity(self.order.len());
        for id in self.order {
            if let Some(table) = tables.remove(&id) {
                index.insert(id, order.len());
                order.push((table.abstraction, Arc::from(table.entries)));
            }
        }
        FrozenNamedTypes { order, index }
    }
}

/// Read-only named entries, shared by a provider and all of its scopes.
#[derive(Default)]
pub(crate) struct FrozenNamedTypes {
    order: Vec<(&'static str, Arc<[RegistryEntry]>)>,
    index: HashMap<TypeId, usize>,
}

impl FrozenNamedTypes {
    pub(crate) fn get(&self, abstraction: TypeId) -> Option<Arc<[RegistryEntry]>> {
        self.index.get(&abstraction).map(|&i| self.order[i].1.clone())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&'static str, &[RegistryEntry])> {
        self.order.iter().map(|(name, entries)| (*name, &entries[..]))
    }
}

/// The named entries registered for abstraction `T`.
///
/// Obtained from a resolver with
/// [`Resolver::registered_types`](crate::Resolver::registered_types).
/// Cloning is cheap; the entries are shared.
pub struct RegisteredTypes<T: ?Sized> {
    entries: Arc<[RegistryEntry]>,
    _abstraction: PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized + 'static> RegisteredTypes<T> {
    pub(crate) fn new(entries: Option<Arc<[RegistryEntry]>>) -> Self {
        Self {
            entries: entries.unwrap_or_else(|| Arc::from(Vec::new())),
            _abstraction: PhantomData,
        }
    }

    /// Entries in scan order.
    pub fn items(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(RegistryEntry::name)
    }

    /// First entry carrying exactly `name`.
    pub fn find(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.name() == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: ?Sized> Clone for RegisteredTypes<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            _abstraction: PhantomData,
        }
    }
}

impl<T: ?Sized> fmt::Debug for RegisteredTypes<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredTypes")
            .field("abstraction", &std::any::type_name::<T>())
            .field("items", &self.entries)
            .finish()
    }
}

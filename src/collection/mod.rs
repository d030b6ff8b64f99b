//! Service collection: the registration side of the container.
//!
//! Holds the registry of constructors and the named registry the scanner
//! fills, and turns both into a [`ServiceProvider`] on `build()`.

use std::any::TypeId;
use std::sync::Arc;

use crate::named::NamedTypes;
use crate::provider::ResolverContext;
use crate::registrar::RegistrationSink;
use crate::registration::{AnyArc, Ctor, Registration, Registry};
use crate::traits::ResolverCore;
use crate::{DiError, DiResult, Key, Lifetime, ServiceDescriptor, ServiceProvider, TypeRegistration};

pub mod module_system;
pub use module_system::*;

/// Collects service registrations before the provider is built.
///
/// ```rust
/// use ferrous_autowire::{ServiceCollection, Resolver};
///
/// struct Config { database_url: String }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Config { database_url: "postgres://localhost".to_string() });
///
/// let provider = services.build();
/// assert_eq!(provider.get_required::<Config>().database_url, "postgres://localhost");
/// ```
#[derive(Default)]
pub struct ServiceCollection {
    registry: Registry,
    named: NamedTypes,
}

impl ServiceCollection {
    /// Creates a new empty service collection.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            named: NamedTypes::new(),
        }
    }

    // ----- Concrete type registrations -----

    /// Registers an already built instance, shared by every resolution.
    pub fn add_singleton<T: 'static + Send + Sync>(&mut self, value: T) -> &mut Self {
        let arc = Arc::new(value);
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(arc.clone()) };
        self.insert_concrete::<T>(Lifetime::Singleton, Arc::new(ctor));
        self
    }

    /// Registers a factory called once, on first request.
    ///
    /// ```rust
    /// # use ferrous_autowire::{ServiceCollection, Resolver};
    /// # use std::sync::Arc;
    /// struct Database { url: String }
    /// struct UserService { db: Arc<Database> }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(Database { url: "postgres://localhost".to_string() });
    /// services.add_singleton_factory::<UserService, _>(|resolver| UserService {
    ///     db: resolver.get_required::<Database>(),
    /// });
    ///
    /// let provider = services.build();
    /// let a = provider.get_required::<UserService>();
    /// let b = provider.get_required::<UserService>();
    /// assert!(Arc::ptr_eq(&a, &b));
    /// ```
    pub fn add_singleton_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Singleton, factory)
    }

    /// Registers a factory called once per scope.
    pub fn add_scoped_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Scoped, factory)
    }

    /// Registers a factory called on every request.
    pub fn add_transient_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Transient, factory)
    }

    fn add_factory<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(factory(r))) };
        self.insert_concrete::<T>(lifetime, Arc::new(ctor));
        self
    }

    fn insert_concrete<T: 'static>(&mut self, lifetime: Lifetime, ctor: Ctor) {
        let name = std::any::type_name::<T>();
        let key = Key::Type(TypeId::of::<T>(), name);
        self.registry
            .insert(key, Registration::new(lifetime, ctor).with_impl(TypeId::of::<T>(), name));
    }

    // ----- Trait registrations -----

    /// Binds a single shared instance to an abstraction.
    ///
    /// ```rust
    /// # use ferrous_autowire::{ServiceCollection, Resolver};
    /// # use std::sync::Arc;
    /// trait Clock: Send + Sync { fn now(&self) -> u64; }
    /// struct Fixed;
    /// impl Clock for Fixed { fn now(&self) -> u64 { 7 } }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton_trait::<dyn Clock>(Arc::new(Fixed));
    /// assert_eq!(services.build().get_required_trait::<dyn Clock>().now(), 7);
    /// ```
    pub fn add_singleton_trait<T>(&mut self, value: Arc<T>) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
    {
        // Stored as Arc<Arc<dyn Trait>> inside Any
        let any_arc: AnyArc = Arc::new(value);
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(any_arc.clone()) };
        self.registry.insert(
            Key::Trait(std::any::type_name::<T>()),
            Registration::new(Lifetime::Singleton, Arc::new(ctor)),
        );
        self
    }

    /// Appends a factory to the bindings of an abstraction.
    ///
    /// Every binding is returned by `get_all_trait`; `get_trait` returns the
    /// last one.
    pub fn add_trait_factory<Trait, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(factory(r))) };
        self.registry
            .push_many(std::any::type_name::<Trait>(), Registration::new(lifetime, Arc::new(ctor)));
        self
    }

    // ----- Introspection -----

    /// Whether a concrete type or abstraction has at least one registration.
    pub fn contains_key(&self, key: &Key) -> bool {
        match key {
            Key::Trait(name) => {
                self.registry.contains_key(key) || self.registry.many.contains_key(name)
            }
            _ => self.registry.contains_key(key),
        }
    }

    /// Every registration, single bindings first, in registration order.
    ///
    /// ```
    /// use ferrous_autowire::{ServiceCollection, Lifetime};
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(42usize);
    /// services.add_scoped_factory::<String, _>(|_| "hello".to_string());
    ///
    /// let descriptors = services.get_service_descriptors();
    /// assert_eq!(descriptors.len(), 2);
    /// assert_eq!(descriptors[0].lifetime, Lifetime::Singleton);
    /// assert_eq!(descriptors[1].lifetime, Lifetime::Scoped);
    /// ```
    pub fn get_service_descriptors(&self) -> Vec<ServiceDescriptor> {
        let singles = self.registry.one.iter().map(|(key, registration)| ServiceDescriptor {
            key: key.clone(),
            lifetime: registration.lifetime,
            impl_type_id: registration.impl_id,
            impl_type_name: registration.impl_name,
        });
        let multis = self.registry.iter_many().flat_map(|(name, registrations)| {
            registrations.iter().enumerate().map(move |(index, registration)| ServiceDescriptor {
                key: Key::MultiTrait(name, index),
                lifetime: registration.lifetime,
                impl_type_id: registration.impl_id,
                impl_type_name: registration.impl_name,
            })
        });
        singles.chain(multis).collect()
    }

    /// Named entries recorded so far.
    pub fn named_types(&self) -> &NamedTypes {
        &self.named
    }

    /// Freezes the registrations into a provider.
    pub fn build(mut self) -> ServiceProvider {
        self.registry.finalize();
        tracing::debug!(
            single_bindings = self.registry.one.len(),
            multi_bindings = self.registry.many.values().map(Vec::len).sum::<usize>(),
            named_entries = self.named.len(),
            scoped_slots = self.registry.scoped_count,
            "service provider built"
        );
        ServiceProvider::new(self.registry, self.named)
    }
}

impl RegistrationSink for ServiceCollection {
    /// Rejects binding an implementation already registered with a
    /// different lifetime.
    fn check(&self, registration: &TypeRegistration) -> DiResult<()> {
        match self.registry.get(&registration.implementation_key()) {
            Some(existing) if existing.lifetime != registration.lifetime => Err(DiError::LifetimeConflict {
                implementation: registration.implementation.type_name(),
                existing: existing.lifetime,
                requested: registration.lifetime,
            }),
            _ => Ok(()),
        }
    }

    /// Registers the implementation under its own type, then binds it to
    /// the abstraction.
    ///
    /// The concrete registration is shared: binding one implementation to
    /// several abstractions yields a single instance per lifetime. Binding
    /// it again with a different lifetime is a `LifetimeConflict`.
    fn register_type(&mut self, registration: &TypeRegistration) -> DiResult<()> {
        self.check(registration)?;

        let implementation = registration.implementation;
        let impl_key = registration.implementation_key();
        if !self.registry.contains_key(&impl_key) {
            self.registry.insert(
                impl_key.clone(),
                Registration::new(registration.lifetime, registration.ctor.clone())
                    .with_impl(implementation.id(), implementation.type_name()),
            );
        }

        if registration.is_self_binding() {
            return Ok(());
        }

        let upcast = registration.upcast.clone();
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> {
            let concrete = r.resolve_any(&impl_key)?;
            upcast(concrete)
        };
        self.registry.push_many(
            registration.service.type_name(),
            Registration::new(registration.lifetime, Arc::new(ctor))
                .with_impl(implementation.id(), implementation.type_name()),
        );
        Ok(())
    }

    fn named_types(&self) -> &NamedTypes {
        &self.named
    }

    fn named_types_mut(&mut self) -> &mut NamedTypes {
        &mut self.named
    }
}

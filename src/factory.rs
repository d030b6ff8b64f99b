//! Named factories: pick one implementation of an abstraction by name.
//!
//! A factory holds no state of its own. Every call re-reads the named
//! registry and resolves through the container, so whether the caller gets
//! a fresh or a cached instance is decided by the registered lifetime.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::key::Key;
use crate::traits::ResolverCore;
use crate::{DiError, DiResult, RegisteredTypes};

/// Name-based resolution of implementations registered for `T`.
///
/// Borrowed from a resolver (a provider, a scope, or the context handed to a
/// constructor) with [`Resolver::factory`](crate::Resolver::factory).
///
/// ```rust
/// use ferrous_autowire::{component, Candidate, DiError, Registrar, Resolver, ServiceCollection, ServiceCollectionExt};
/// use std::sync::Arc;
///
/// trait Shipping: Send + Sync { fn carrier(&self) -> &'static str; }
///
/// struct Ground;
/// impl Shipping for Ground { fn carrier(&self) -> &'static str { "truck" } }
/// component!(Ground: singleton);
///
/// struct Air;
/// impl Shipping for Air { fn carrier(&self) -> &'static str { "plane" } }
/// component!(Air: transient);
///
/// let registrar = Registrar::new()
///     .candidate(Candidate::new(|_| Ground).implements::<dyn Shipping>(|c| c as Arc<dyn Shipping>))
///     .candidate(Candidate::new(|_| Air).implements::<dyn Shipping>(|c| c as Arc<dyn Shipping>));
/// let provider = ServiceCollection::new().add_module(registrar).unwrap().build();
///
/// let factory = provider.factory::<dyn Shipping>();
/// assert_eq!(factory.item_names(), vec!["Ground", "Air"]);
/// assert_eq!(factory.get_value("Air").unwrap().carrier(), "plane");
/// assert!(matches!(factory.get_value(" "), Err(DiError::InvalidName)));
/// ```
pub struct FactoryBase<'r, T: ?Sized> {
    resolver: &'r dyn ResolverCore,
    _abstraction: PhantomData<fn() -> Arc<T>>,
}

impl<'r, T> FactoryBase<'r, T>
where
    T: ?Sized + Send + Sync + 'static,
{
    pub fn new<R: ResolverCore>(resolver: &'r R) -> Self {
        Self {
            resolver,
            _abstraction: PhantomData,
        }
    }

    /// The named entries this factory selects from.
    pub fn registered_types(&self) -> RegisteredTypes<T> {
        RegisteredTypes::new(self.resolver.registered_entries(std::any::TypeId::of::<T>()))
    }

    /// Display names in scan order. Duplicates are listed as registered.
    pub fn item_names(&self) -> Vec<String> {
        self.registered_types().names().map(str::to_owned).collect()
    }

    /// Resolves the first implementation registered under exactly `name`.
    ///
    /// Fails with [`DiError::InvalidName`] for an empty or whitespace-only
    /// name and [`DiError::NameNotFound`] when no entry matches. Errors from
    /// constructing the implementation are returned unchanged.
    pub fn get_value(&self, name: &str) -> DiResult<Arc<T>> {
        if name.trim().is_empty() {
            return Err(DiError::InvalidName);
        }

        let registered = self.registered_types();
        let entry = registered.find(name).ok_or_else(|| DiError::NameNotFound {
            abstraction: std::any::type_name::<T>(),
            name: name.to_owned(),
        })?;

        let implementation = entry.implementation();
        let key = Key::Type(implementation.id(), implementation.type_name());
        let concrete = self.resolver.resolve_any(&key)?;
        (entry.upcast)(concrete)?
            .downcast::<Arc<T>>()
            .map(|boxed| (*boxed).clone())
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }
}

impl<'r, T: ?Sized> Clone for FactoryBase<'r, T> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver,
            _abstraction: PhantomData,
        }
    }
}

/// A factory with a default selection.
///
/// Implementors pick the name; [`value`](Self::value) does the lookup.
///
/// ```rust
/// use ferrous_autowire::{component, Candidate, FactoryBase, NamedFactory, Registrar, Resolver, ServiceCollection, ServiceCollectionExt};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct English;
/// impl Greeter for English { fn greet(&self) -> String { "hello".into() } }
/// component!(English: singleton);
///
/// struct DefaultGreeter<'r> { base: FactoryBase<'r, dyn Greeter> }
///
/// impl<'r> NamedFactory<dyn Greeter> for DefaultGreeter<'r> {
///     fn name(&self) -> &str { "English" }
///     fn base(&self) -> &FactoryBase<'_, dyn Greeter> { &self.base }
/// }
///
/// let registrar = Registrar::new()
///     .candidate(Candidate::new(|_| English).implements::<dyn Greeter>(|c| c as Arc<dyn Greeter>));
/// let provider = ServiceCollection::new().add_module(registrar).unwrap().build();
///
/// let greeter = DefaultGreeter { base: provider.factory() };
/// assert_eq!(greeter.value().unwrap().greet(), "hello");
/// ```
pub trait NamedFactory<T: ?Sized + Send + Sync + 'static> {
    /// Name selected by [`value`](Self::value).
    fn name(&self) -> &str;

    fn base(&self) -> &FactoryBase<'_, T>;

    fn value(&self) -> DiResult<Arc<T>> {
        self.base().get_value(self.name())
    }

    fn item_names(&self) -> Vec<String> {
        self.base().item_names()
    }
}

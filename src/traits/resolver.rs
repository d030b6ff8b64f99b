//! Resolver traits for service resolution.

use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::factory::FactoryBase;
use crate::key::Key;
use crate::named::{RegisteredTypes, RegistryEntry};

/// Object-safe resolution primitives.
///
/// This is the boundary the named factories consume: `resolve_any` is the
/// container's lookup-and-construct primitive, `registered_entries` the read
/// surface of the named registry. Both `ServiceProvider` and `Scope`
/// implement it, as does the `ResolverContext` handed to constructors.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single service, honoring its lifetime.
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn Any + Send + Sync>>;

    /// Resolves every binding of an abstraction, in registration order.
    fn resolve_many(&self, key: &Key) -> DiResult<Vec<Arc<dyn Any + Send + Sync>>>;

    /// Named entries recorded for the abstraction with the given `TypeId`.
    fn registered_entries(&self, abstraction: TypeId) -> Option<Arc<[RegistryEntry]>>;
}

/// High-level resolver interface with generic, type-safe methods.
///
/// ```
/// use ferrous_autowire::{ServiceCollection, Resolver, Lifetime};
/// use std::sync::Arc;
///
/// trait Logger: Send + Sync {
///     fn log(&self, msg: &str) -> String;
/// }
///
/// struct ConsoleLogger;
/// impl Logger for ConsoleLogger {
///     fn log(&self, msg: &str) -> String { format!("LOG: {}", msg) }
/// }
///
/// let mut collection = ServiceCollection::new();
/// collection.add_singleton(42usize);
/// collection.add_trait_factory::<dyn Logger, _>(Lifetime::Singleton, |_| Arc::new(ConsoleLogger));
///
/// let provider = collection.build();
/// assert_eq!(*provider.get_required::<usize>(), 42);
/// assert_eq!(provider.get_required_trait::<dyn Logger>().log("hi"), "LOG: hi");
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a concrete service type.
    fn get<T: 'static + Send + Sync>(&self) -> DiResult<Arc<T>> {
        let key = Key::Type(TypeId::of::<T>(), std::any::type_name::<T>());
        let any = self.resolve_any(&key)?;
        any.downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves an abstraction; with several bindings, the last one wins.
    fn get_trait<T: ?Sized + 'static + Send + Sync>(&self) -> DiResult<Arc<T>> {
        let key = Key::Trait(std::any::type_name::<T>());
        let any = self.resolve_any(&key)?;
        any.downcast::<Arc<T>>()
            .map(|boxed| (*boxed).clone())
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves every binding of an abstraction, in registration order.
    fn get_all_trait<T: ?Sized + 'static + Send + Sync>(&self) -> DiResult<Vec<Arc<T>>> {
        let key = Key::Trait(std::any::type_name::<T>());
        self.resolve_many(&key)?
            .into_iter()
            .map(|any| {
                any.downcast::<Arc<T>>()
                    .map(|boxed| (*boxed).clone())
                    .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
            })
            .collect()
    }

    /// Resolves a concrete service type, panicking on failure.
    fn get_required<T: 'static + Send + Sync>(&self) -> Arc<T> {
        self.get::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {}", std::any::type_name::<T>(), e))
    }

    /// Resolves an abstraction, panicking on failure.
    fn get_required_trait<T: ?Sized + 'static + Send + Sync>(&self) -> Arc<T> {
        self.get_trait::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve trait {}: {}", std::any::type_name::<T>(), e))
    }

    /// The named entries registered for abstraction `T` (empty if none).
    fn registered_types<T: ?Sized + 'static>(&self) -> RegisteredTypes<T> {
        RegisteredTypes::new(self.registered_entries(TypeId::of::<T>()))
    }

    /// A named factory for abstraction `T` backed by this resolver.
    fn factory<T: ?Sized + Send + Sync + 'static>(&self) -> FactoryBase<'_, T>
    where
        Self: Sized,
    {
        FactoryBase::new(self)
    }
}

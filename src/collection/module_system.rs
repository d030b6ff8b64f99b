//! Modular registration: bundles of registrations applied as one step.

use crate::{DiResult, ServiceCollection};

/// A bundle of registrations applied to a `ServiceCollection`.
///
/// The [`Registrar`](crate::Registrar) is the main implementor; hand-written
/// modules sit alongside it for services that are not scanned.
///
/// ```rust
/// use ferrous_autowire::{ServiceCollection, ServiceModule, ServiceCollectionExt, DiResult, Resolver};
///
/// #[derive(Default)]
/// struct UserConfig;
///
/// struct UserService;
/// impl UserService {
///     fn new(_config: std::sync::Arc<UserConfig>) -> Self { Self }
/// }
///
/// struct UserModule;
///
/// impl ServiceModule for UserModule {
///     fn register_services(self, services: &mut ServiceCollection) -> DiResult<()> {
///         services.add_singleton(UserConfig::default());
///         services.add_scoped_factory::<UserService, _>(|r| UserService::new(r.get_required::<UserConfig>()));
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let provider = ServiceCollection::new().add_module(UserModule)?.build();
/// let scope = provider.create_scope();
/// let _service = scope.get_required::<UserService>();
/// # Ok(())
/// # }
/// ```
pub trait ServiceModule {
    /// Applies this module's registrations.
    fn register_services(self, services: &mut ServiceCollection) -> DiResult<()>;
}

/// Chained, by-value module registration.
pub trait ServiceCollectionExt {
    fn add_module<M: ServiceModule>(self, module: M) -> DiResult<Self>
    where
        Self: Sized;
}

impl ServiceCollectionExt for ServiceCollection {
    fn add_module<M: ServiceModule>(mut self, module: M) -> DiResult<Self> {
        module.register_services(&mut self)?;
        Ok(self)
    }
}

/// In-place module registration, matching the `&mut Self` builder methods.
pub trait ServiceCollectionModuleExt {
    fn add_module_mut<M: ServiceModule>(&mut self, module: M) -> DiResult<&mut Self>;
}

impl ServiceCollectionModuleExt for ServiceCollection {
    fn add_module_mut<M: ServiceModule>(&mut self, module: M) -> DiResult<&mut Self> {
        module.register_services(self)?;
        Ok(self)
    }
}

//! # ferrous-autowire
//!
//! Marker-driven service registration and named lookup on top of a small
//! Microsoft.Extensions.DependencyInjection style container.
//!
//! ## Features
//!
//! - **Lifetime markers**: types declare `ignore`, `transient`, `scoped` or
//!   `singleton`; only `singleton` is inherited through declared base types
//! - **Scanning**: a [`Registrar`] classifies candidates and binds each one to
//!   every abstraction it implements
//! - **Named lookup**: [`FactoryBase`] picks one implementation of an
//!   abstraction by its display name at runtime
//! - **Container**: singleton, scoped and transient services with circular
//!   dependency detection
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_autowire::{component, Candidate, Registrar, Resolver, ServiceCollection, ServiceCollectionExt};
//! use std::sync::Arc;
//!
//! trait Notifier: Send + Sync {
//!     fn channel(&self) -> &'static str;
//! }
//!
//! // Every subtype of this base is a singleton unless it says otherwise.
//! struct SingletonService;
//! component!(SingletonService: singleton);
//!
//! struct Email;
//! impl Notifier for Email { fn channel(&self) -> &'static str { "email" } }
//! component!(Email, extends SingletonService);
//!
//! struct Sms;
//! impl Notifier for Sms { fn channel(&self) -> &'static str { "sms" } }
//! component!(Sms: scoped);
//!
//! let registrar = Registrar::new()
//!     .candidate(Candidate::new(|_| Email).implements::<dyn Notifier>(|c| c as Arc<dyn Notifier>))
//!     .candidate(Candidate::new(|_| Sms).implements::<dyn Notifier>(|c| c as Arc<dyn Notifier>));
//!
//! let provider = ServiceCollection::new().add_module(registrar).unwrap().build();
//! let scope = provider.create_scope();
//!
//! let notifiers = scope.factory::<dyn Notifier>();
//! assert_eq!(notifiers.item_names(), vec!["Email", "Sms"]);
//! assert_eq!(notifiers.get_value("Sms").unwrap().channel(), "sms");
//! ```
//!
//! ## Service Lifetimes
//!
//! - **Singleton**: created once and shared across the entire application
//! - **Scoped**: created once per scope
//! - **Transient**: created fresh on every resolution
//!
//! ## Cargo features
//!
//! - `config`: load [`RegistrarOptions`] from JSON with `serde`
//! - `inventory`: submit candidates at their definition site with
//!   [`autowire_candidate!`] and collect them with `Registrar::from_inventory`

// Module declarations
pub mod candidate;
pub mod classifier;
pub mod collection;
pub mod component;
pub mod config;
pub mod descriptors;
pub mod error;
pub mod factory;
pub mod key;
pub mod lifetime;
pub mod marker;
pub mod named;
pub mod observer;
pub mod provider;
pub mod registrar;
pub mod traits;

#[cfg(feature = "inventory")]
pub mod discovery;

// Internal modules
mod internal;
mod registration;

// Re-exports
pub use candidate::{Candidate, CandidateBuilder};
pub use classifier::{classify, Classification, Exclusion};
pub use collection::{ServiceCollection, ServiceCollectionExt, ServiceCollectionModuleExt, ServiceModule};
pub use component::{short_type_name, type_info, Component, TypeInfo};
pub use config::{DuplicateNamePolicy, RegistrarOptions};
pub use descriptors::ServiceDescriptor;
pub use error::{DiError, DiResult};
pub use factory::{FactoryBase, NamedFactory};
pub use internal::CircularPanic;
pub use key::{key_of_type, Key};
pub use lifetime::Lifetime;
pub use marker::Marker;
pub use named::{NamedTypes, RegisteredTypes, RegistryEntry};
pub use observer::{ScanObserver, TracingObserver};
pub use provider::{ResolverContext, Scope, ServiceProvider};
pub use registrar::{AbstractionFilter, ExcludedType, Registrar, RegistrationSink, ScanReport};
pub use registration::{ServiceType, TypeRegistration};
pub use traits::{Resolver, ResolverCore};

#[cfg(feature = "inventory")]
pub use discovery::CandidateEntry;

#[doc(hidden)]
pub mod __private {
    #[cfg(feature = "inventory")]
    pub use ::inventory;
}

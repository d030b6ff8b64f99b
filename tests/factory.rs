//! Named lookup through `FactoryBase` after a registrar scan.

mod common;

use common::*;
use ferrous_autowire::{
    Candidate, DiError, FactoryBase, NamedFactory, Registrar, Resolver, ServiceCollection,
    ServiceCollectionExt, ServiceCollectionModuleExt, ServiceProvider,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn fixture_provider() -> ServiceProvider {
    init_tracing();
    ServiceCollection::new()
        .add_module(fixture_registrar())
        .unwrap()
        .build()
}

// ===== Names =====

#[test]
fn item_names_follow_scan_order() {
    let provider = fixture_provider();
    assert_eq!(provider.factory::<dyn Service>().item_names(), SERVICE_NAMES);
    assert_eq!(provider.factory::<dyn Auditable>().item_names(), vec!["ScopedClass1"]);
}

#[test]
fn unregistered_abstraction_has_no_names() {
    let provider = ServiceCollection::new().build();
    let factory = provider.factory::<dyn Service>();

    assert!(factory.item_names().is_empty());
    assert!(factory.registered_types().is_empty());
    assert!(matches!(factory.get_value("SingletonClass1"), Err(DiError::NameNotFound { .. })));
}

#[test]
fn blank_names_are_rejected() {
    let provider = fixture_provider();
    let factory = provider.factory::<dyn Service>();

    for name in ["", " ", "   ", "\t\n"] {
        assert_eq!(factory.get_value(name).err(), Some(DiError::InvalidName), "name {:?}", name);
    }
}

#[test]
fn unknown_names_are_reported() {
    let provider = fixture_provider();
    let factory = provider.factory::<dyn Service>();

    let err = factory.get_value("NoSuchName").err().unwrap();
    assert_eq!(
        err,
        DiError::NameNotFound {
            abstraction: std::any::type_name::<dyn Service>(),
            name: "NoSuchName".to_string(),
        }
    );
    assert!(err.to_string().contains("NoSuchName"));

    // Exact, case-sensitive match only.
    assert!(matches!(factory.get_value("scopedclass2"), Err(DiError::NameNotFound { .. })));
    assert!(matches!(factory.get_value(" ScopedClass2"), Err(DiError::NameNotFound { .. })));
    // Excluded types never get a name.
    assert!(matches!(factory.get_value("IgnoredClass"), Err(DiError::NameNotFound { .. })));
    assert!(matches!(factory.get_value("ScopedChild"), Err(DiError::NameNotFound { .. })));
}

// ===== Resolution =====

#[test]
fn get_value_returns_the_named_implementation() {
    let provider = fixture_provider();
    let scope = provider.create_scope();
    let factory = scope.factory::<dyn Service>();

    let value = factory.get_value("ScopedClass2").unwrap();
    assert!(value.as_any().downcast_ref::<ScopedClass2>().is_some());

    let value = factory.get_value("SingletonChild").unwrap();
    assert!(value.as_any().downcast_ref::<SingletonChild>().is_some());

    let audit = scope.factory::<dyn Auditable>().get_value("ScopedClass1").unwrap();
    assert_eq!(audit.audit_tag(), "scoped-1");
}

#[test]
fn factory_honours_registered_lifetimes() {
    let provider = fixture_provider();
    let scope1 = provider.create_scope();
    let scope2 = provider.create_scope();
    let in_scope1 = scope1.factory::<dyn Service>();
    let in_scope2 = scope2.factory::<dyn Service>();

    let single_a = in_scope1.get_value("SingletonClass1").unwrap();
    let single_b = in_scope2.get_value("SingletonClass1").unwrap();
    assert_eq!(single_a.instance(), single_b.instance());
    assert_eq!(
        provider.factory::<dyn Service>().get_value("SingletonClass1").unwrap().instance(),
        single_a.instance()
    );

    let scoped_a = in_scope1.get_value("ScopedClass1").unwrap();
    let scoped_b = in_scope1.get_value("ScopedClass1").unwrap();
    let scoped_c = in_scope2.get_value("ScopedClass1").unwrap();
    assert!(Arc::ptr_eq(&scoped_a, &scoped_b));
    assert_ne!(scoped_a.instance(), scoped_c.instance());

    let transient_a = in_scope1.get_value("TransientClass1").unwrap();
    let transient_b = in_scope1.get_value("TransientClass1").unwrap();
    assert_ne!(transient_a.instance(), transient_b.instance());
}

#[test]
fn named_and_typed_lookups_share_instances() {
    let provider = fixture_provider();
    let scope = provider.create_scope();

    let by_type = scope.get_required::<ScopedClass1>();
    let by_service = scope.factory::<dyn Service>().get_value("ScopedClass1").unwrap();
    let by_audit = scope.factory::<dyn Auditable>().get_value("ScopedClass1").unwrap();
    assert_eq!(by_type.instance, by_service.instance());
    assert_eq!(
        by_service.as_any().downcast_ref::<ScopedClass1>().map(|s| s.instance),
        Some(by_type.instance)
    );
    assert_eq!(by_audit.audit_tag(), by_type.audit_tag());
}

#[test]
fn container_errors_pass_through() {
    let provider = fixture_provider();
    let err = provider.factory::<dyn Service>().get_value("ScopedClass1").err().unwrap();
    assert!(matches!(err, DiError::WrongLifetime(_)), "got {:?}", err);

    // Singletons and transients resolve from the root.
    assert!(provider.factory::<dyn Service>().get_value("TransientClass1").is_ok());
}

#[test]
fn first_registration_wins_for_a_repeated_name() {
    let registrar = Registrar::new()
        .candidate(
            Candidate::new(|_| ScopedClass1::new())
                .implements::<dyn Service>(|c| c as Arc<dyn Service>)
                .named("Shared"),
        )
        .candidate(
            Candidate::new(|_| ScopedClass2::new())
                .implements::<dyn Service>(|c| c as Arc<dyn Service>)
                .named("Shared"),
        );
    let provider = ServiceCollection::new().add_module(registrar).unwrap().build();
    let scope = provider.create_scope();
    let factory = scope.factory::<dyn Service>();

    assert_eq!(factory.item_names(), vec!["Shared", "Shared"]);
    let value = factory.get_value("Shared").unwrap();
    assert!(value.as_any().downcast_ref::<ScopedClass1>().is_some());
}

#[test]
fn factory_reflects_the_provider_it_was_taken_from() {
    let empty = ServiceCollection::new().build();
    let full = fixture_provider();

    assert!(empty.factory::<dyn Service>().item_names().is_empty());
    assert_eq!(full.factory::<dyn Service>().item_names().len(), SERVICE_NAMES.len());
}

// ===== Default selection =====

struct PreferredService<'r> {
    base: FactoryBase<'r, dyn Service>,
    preferred: String,
}

impl<'r> NamedFactory<dyn Service> for PreferredService<'r> {
    fn name(&self) -> &str {
        &self.preferred
    }

    fn base(&self) -> &FactoryBase<'_, dyn Service> {
        &self.base
    }
}

#[test]
fn named_factory_value_uses_its_default_name() {
    let provider = fixture_provider();
    let scope = provider.create_scope();

    let factory = PreferredService {
        base: scope.factory(),
        preferred: "ScopedClass2".to_string(),
    };
    let value = factory.value().unwrap();
    assert!(value.as_any().downcast_ref::<ScopedClass2>().is_some());
    assert_eq!(factory.item_names(), SERVICE_NAMES);

    let broken = PreferredService {
        base: scope.factory(),
        preferred: String::new(),
    };
    assert_eq!(broken.value().err(), Some(DiError::InvalidName));
}

#[test]
fn factories_resolve_inside_constructors() {
    struct Router {
        picked: Arc<dyn Service>,
    }

    let mut services = ServiceCollection::new();
    services.add_module_mut(fixture_registrar()).unwrap();
    services.add_transient_factory::<Router, _>(|r| Router {
        picked: r.factory::<dyn Service>().get_value("TransientClass1").unwrap(),
    });
    let provider = services.build();

    let router = provider.get_required::<Router>();
    assert!(router.picked.as_any().downcast_ref::<TransientClass1>().is_some());
}

// ===== Concurrency =====

#[test]
fn concurrent_lookups_share_singletons() {
    let provider = fixture_provider();
    let factory = provider.factory::<dyn Service>();

    let instances: Vec<usize> = crossbeam_utils::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|_| {
                    assert_eq!(factory.item_names(), SERVICE_NAMES);
                    factory.get_value("SingletonClass1").unwrap().instance()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();

    assert!(instances.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn concurrent_lookups_within_one_scope_share_scoped_values() {
    let provider = fixture_provider();
    let scope = provider.create_scope();

    let instances: Vec<usize> = crossbeam_utils::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let scope = &scope;
                s.spawn(move |_| {
                    scope
                        .factory::<dyn Service>()
                        .get_value("ScopedClass2")
                        .unwrap()
                        .instance()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();

    assert!(instances.windows(2).all(|w| w[0] == w[1]));
}

trait Warm: Send + Sync {}

struct SlowSingleton;
impl Warm for SlowSingleton {}
ferrous_autowire::component!(SlowSingleton: singleton);

struct SlowScoped;
impl Warm for SlowScoped {}
ferrous_autowire::component!(SlowScoped: scoped);

/// Provider whose constructors sleep and count their calls.
fn slow_provider(singletons: Arc<AtomicUsize>, scoped: Arc<AtomicUsize>) -> ServiceProvider {
    let registrar = Registrar::new()
        .candidate(
            Candidate::new(move |_| {
                singletons.fetch_add(1, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(50));
                SlowSingleton
            })
            .implements::<dyn Warm>(|c| c as Arc<dyn Warm>),
        )
        .candidate(
            Candidate::new(move |_| {
                scoped.fetch_add(1, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(50));
                SlowScoped
            })
            .implements::<dyn Warm>(|c| c as Arc<dyn Warm>),
        );
    ServiceCollection::new().add_module(registrar).unwrap().build()
}

fn resolve_from_threads<R: Resolver>(resolver: &R, name: &str) -> Vec<Arc<dyn Warm>> {
    crossbeam_utils::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|_| resolver.factory::<dyn Warm>().get_value(name).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap()
}

#[test]
fn racing_first_resolves_construct_a_singleton_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = slow_provider(calls.clone(), Arc::new(AtomicUsize::new(0)));

    let values = resolve_from_threads(&provider, "SlowSingleton");

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(values.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[test]
fn racing_first_resolves_construct_a_scoped_value_once_per_scope() {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = slow_provider(Arc::new(AtomicUsize::new(0)), calls.clone());

    let scope1 = provider.create_scope();
    let values = resolve_from_threads(&scope1, "SlowScoped");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(values.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));

    let scope2 = provider.create_scope();
    resolve_from_threads(&scope2, "SlowScoped");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

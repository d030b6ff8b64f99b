//! Shared fixtures: one abstraction with implementations covering every
//! marker combination.
#![allow(dead_code)]

use ferrous_autowire::{component, Candidate, Registrar};
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub trait Service: Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn instance(&self) -> usize;
}

pub trait Auditable: Send + Sync {
    fn audit_tag(&self) -> &'static str;
}

static INSTANCES: AtomicUsize = AtomicUsize::new(0);

fn next_instance() -> usize {
    INSTANCES.fetch_add(1, Ordering::SeqCst)
}

macro_rules! service_type {
    ($name:ident) => {
        #[derive(Debug)]
        pub struct $name {
            pub instance: usize,
        }

        impl $name {
            pub fn new() -> Self {
                Self { instance: next_instance() }
            }
        }

        impl Service for $name {
            fn as_any(&self) -> &dyn Any {
                self
            }

            fn instance(&self) -> usize {
                self.instance
            }
        }
    };
}

// Bases
pub struct SingletonBase;
component!(SingletonBase: singleton);
pub struct ScopedBase;
component!(ScopedBase: scoped);
pub struct TransientBase;
component!(TransientBase: transient);

service_type!(SingletonClass1);
component!(SingletonClass1: singleton);
service_type!(SingletonChild);
component!(SingletonChild, extends SingletonBase);
service_type!(ScopedClass1);
component!(ScopedClass1: scoped);
service_type!(ScopedClass2);
component!(ScopedClass2: scoped);
service_type!(TransientClass1);
component!(TransientClass1: transient);
service_type!(IgnoredClass);
component!(IgnoredClass: ignore);
service_type!(UnmarkedClass);
component!(UnmarkedClass);
service_type!(ScopedChild);
component!(ScopedChild, extends ScopedBase);
service_type!(TransientChild);
component!(TransientChild, extends TransientBase);

impl Auditable for ScopedClass1 {
    fn audit_tag(&self) -> &'static str {
        "scoped-1"
    }
}

pub fn service_candidate<C, F>(ctor: F) -> Candidate
where
    C: Service + ferrous_autowire::Component + 'static,
    F: Fn() -> C + Send + Sync + 'static,
{
    Candidate::new(move |_| ctor())
        .implements::<dyn Service>(|c| c as Arc<dyn Service>)
        .build()
}

/// Every fixture, in a fixed scan order.
pub fn all_candidates() -> Vec<Candidate> {
    vec![
        service_candidate(SingletonClass1::new),
        service_candidate(SingletonChild::new),
        Candidate::new(|_| ScopedClass1::new())
            .implements::<dyn Service>(|c| c as Arc<dyn Service>)
            .implements::<dyn Auditable>(|c| c as Arc<dyn Auditable>)
            .build(),
        service_candidate(ScopedClass2::new),
        service_candidate(TransientClass1::new),
        service_candidate(IgnoredClass::new),
        service_candidate(UnmarkedClass::new),
        service_candidate(ScopedChild::new),
        service_candidate(TransientChild::new),
    ]
}

pub fn fixture_registrar() -> Registrar {
    Registrar::with_candidates(all_candidates())
}

/// Names the fixture scan registers for `dyn Service`, in order.
pub const SERVICE_NAMES: [&str; 5] = [
    "SingletonClass1",
    "SingletonChild",
    "ScopedClass1",
    "ScopedClass2",
    "TransientClass1",
];

/// Routes `tracing` output to the test writer; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

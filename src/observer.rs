//! Scan observers.
//!
//! Every decision a scan makes is reported to its observers. The default
//! [`TracingObserver`] turns them into `tracing` events; tests and tools can
//! add their own to collect the same stream.

use std::sync::Arc;

use crate::{Exclusion, TypeInfo, TypeRegistration};

/// Receives scan events, synchronously and in scan order.
///
/// All methods default to doing nothing, so an observer only implements what
/// it needs.
///
/// ```
/// use ferrous_autowire::{component, Candidate, Registrar, ScanObserver, ServiceCollection, TypeRegistration};
/// use std::sync::{Arc, Mutex};
///
/// #[derive(Default)]
/// struct Names(Mutex<Vec<String>>);
///
/// impl ScanObserver for Names {
///     fn registered(&self, registration: &TypeRegistration) {
///         self.0.lock().unwrap().push(registration.name.clone());
///     }
/// }
///
/// trait Greeter: Send + Sync {}
/// struct Hello;
/// impl Greeter for Hello {}
/// component!(Hello: singleton);
///
/// let names = Arc::new(Names::default());
/// let registrar = Registrar::new()
///     .candidate(Candidate::new(|_| Hello).implements::<dyn Greeter>(|c| c as Arc<dyn Greeter>))
///     .observer(names.clone());
///
/// let mut services = ServiceCollection::new();
/// registrar.scan(&mut services).unwrap();
/// assert_eq!(*names.0.lock().unwrap(), vec!["Hello".to_string()]);
/// ```
pub trait ScanObserver: Send + Sync {
    /// A candidate was left out.
    fn excluded(&self, implementation: &TypeInfo, reason: Exclusion) {
        let _ = (implementation, reason);
    }

    /// A candidate classified for registration exposes no abstraction that
    /// passes the filter.
    fn unbound(&self, implementation: &TypeInfo) {
        let _ = implementation;
    }

    /// A registration tuple was applied to the sink.
    fn registered(&self, registration: &TypeRegistration) {
        let _ = registration;
    }

    /// A tuple reuses a name already present for its abstraction and was
    /// accepted anyway (first-wins).
    fn duplicate_name(&self, registration: &TypeRegistration) {
        let _ = registration;
    }

    /// The scan finished without error.
    fn scan_completed(&self, registered: usize, excluded: usize) {
        let _ = (registered, excluded);
    }
}

/// Fans events out to every attached observer.
#[derive(Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn ScanObserver>>,
}

impl Default for Observers {
    fn default() -> Self {
        Self {
            observers: vec![Arc::new(TracingObserver)],
        }
    }
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn ScanObserver>) {
        self.observers.push(observer);
    }

    pub(crate) fn excluded(&self, implementation: &TypeInfo, reason: Exclusion) {
        for observer in &self.observers {
            observer.excluded(implementation, reason);
        }
    }

    pub(crate) fn unbound(&self, implementation: &TypeInfo) {
        for observer in &self.observers {
            observer.unbound(implementation);
        }
    }

    pub(crate) fn registered(&self, registration: &TypeRegistration) {
        for observer in &self.observers {
            observer.registered(registration);
        }
    }

    pub(crate) fn duplicate_name(&self, registration: &TypeRegistration) {
        for observer in &self.observers {
            observer.duplicate_name(registration);
        }
    }

    pub(crate) fn scan_completed(&self, registered: usize, excluded: usize) {
        for observer in &self.observers {
            observer.scan_completed(registered, excluded);
        }
    }
}

/// Logs scan events through `tracing`.
///
/// Attached to every [`Registrar`](crate::Registrar) by default.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ScanObserver for TracingObserver {
    fn excluded(&self, implementation: &TypeInfo, reason: Exclusion) {
        tracing::debug!(
            implementation = implementation.type_name(),
            reason = %reason,
            "candidate excluded from registration"
        );
    }

    fn unbound(&self, implementation: &TypeInfo) {
        tracing::debug!(
            implementation = implementation.type_name(),
            "candidate exposes no abstraction to register"
        );
    }

    fn registered(&self, registration: &TypeRegistration) {
        tracing::debug!(
            implementation = registration.implementation.type_name(),
            service = registration.service.type_name(),
            lifetime = %registration.lifetime,
            name = %registration.name,
            "registered type"
        );
    }

    fn duplicate_name(&self, registration: &TypeRegistration) {
        tracing::warn!(
            service = registration.service.type_name(),
            name = %registration.name,
            implementation = registration.implementation.type_name(),
            "duplicate name registered, lookups keep the first entry"
        );
    }

    fn scan_completed(&self, registered: usize, excluded: usize) {
        tracing::info!(registered, excluded, "type scan completed");
    }
}

//! Marker-driven registration of candidate types.
//!
//! A [`Registrar`] classifies each candidate, expands it into one
//! [`TypeRegistration`] per abstraction that passes the filter, and applies
//! those to a [`RegistrationSink`] in scan order. Each applied tuple also
//! lands in the sink's named registry.

use std::any::TypeId;
use std::collections::HashSet;
use std::sync::Arc;

use crate::config::{DuplicateNamePolicy, RegistrarOptions};
use crate::named::NamedTypes;
use crate::observer::{Observers, ScanObserver};
use crate::{
    classify, Candidate, Classification, DiError, DiResult, Exclusion, ServiceCollection,
    ServiceModule, ServiceType, TypeInfo, TypeRegistration,
};

/// A container that accepts registration tuples.
///
/// [`ServiceCollection`] is the implementation shipped with this crate; any
/// other container can be driven by the registrar through this trait.
pub trait RegistrationSink {
    /// Whether `registration` would be accepted, without applying it.
    ///
    /// Called for every tuple of a scan before the first one is applied, so
    /// a rejected scan leaves the sink untouched.
    fn check(&self, registration: &TypeRegistration) -> DiResult<()> {
        let _ = registration;
        Ok(())
    }

    /// Registers `registration.implementation` under `registration.service`
    /// with `registration.lifetime`.
    fn register_type(&mut self, registration: &TypeRegistration) -> DiResult<()>;

    fn named_types(&self) -> &NamedTypes;

    fn named_types_mut(&mut self) -> &mut NamedTypes;
}

/// Which abstractions a scan binds candidates to.
#[derive(Debug, Clone, Default)]
pub enum AbstractionFilter {
    /// Every declared abstraction
    #[default]
    All,
    /// Only the listed abstractions
    Only(HashSet<TypeId>),
}

impl AbstractionFilter {
    /// Admits exactly the given abstractions.
    pub fn only<I>(services: I) -> Self
    where
        I: IntoIterator<Item = ServiceType>,
    {
        AbstractionFilter::Only(services.into_iter().map(|s| s.id()).collect())
    }

    pub fn admits(&self, service: ServiceType) -> bool {
        match self {
            AbstractionFilter::All => true,
            AbstractionFilter::Only(ids) => ids.contains(&service.id()),
        }
    }
}

/// A candidate the scan left out, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExcludedType {
    pub implementation: TypeInfo,
    pub reason: Exclusion,
}

/// What a scan did.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    registered: Vec<TypeRegistration>,
    excluded: Vec<ExcludedType>,
}

impl ScanReport {
    /// Applied tuples, in scan order.
    pub fn registered(&self) -> &[TypeRegistration] {
        &self.registered
    }

    pub fn excluded(&self) -> &[ExcludedType] {
        &self.excluded
    }
}

/// Scans candidate types and registers them by their markers.
///
/// ```rust
/// use ferrous_autowire::{component, Candidate, Registrar, Resolver, ServiceCollection};
/// use std::sync::Arc;
///
/// trait Payment: Send + Sync { fn id(&self) -> &'static str; }
///
/// struct Card;
/// impl Payment for Card { fn id(&self) -> &'static str { "card" } }
/// component!(Card: scoped);
///
/// struct Cash;
/// impl Payment for Cash { fn id(&self) -> &'static str { "cash" } }
/// component!(Cash: ignore);
///
/// let registrar = Registrar::new()
///     .candidate(Candidate::new(|_| Card).implements::<dyn Payment>(|c| c as Arc<dyn Payment>))
///     .candidate(Candidate::new(|_| Cash).implements::<dyn Payment>(|c| c as Arc<dyn Payment>));
///
/// let mut services = ServiceCollection::new();
/// let report = registrar.scan(&mut services).unwrap();
/// assert_eq!(report.registered().len(), 1);
/// assert_eq!(report.excluded().len(), 1);
///
/// let provider = services.build();
/// let scope = provider.create_scope();
/// assert_eq!(scope.get_required_trait::<dyn Payment>().id(), "card");
/// ```
#[derive(Clone, Default)]
pub struct Registrar {
    candidates: Vec<Candidate>,
    filter: AbstractionFilter,
    options: RegistrarOptions,
    observers: Observers,
}

impl Registrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an ordered list of candidates.
    pub fn with_candidates<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = Candidate>,
    {
        Self {
            candidates: candidates.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Every candidate submitted with `autowire_candidate!`, ordered by
    /// type name.
    #[cfg(feature = "inventory")]
    pub fn from_inventory() -> Self {
        Self::with_candidates(crate::discovery::collect_candidates())
    }

    /// Appends a candidate; scan order is insertion order.
    pub fn candidate(mut self, candidate: impl Into<Candidate>) -> Self {
        self.candidates.push(candidate.into());
        self
    }

    pub fn add_candidate(&mut self, candidate: impl Into<Candidate>) -> &mut Self {
        self.candidates.push(candidate.into());
        self
    }

    pub fn filter(mut self, filter: AbstractionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Restricts binding to abstraction `T`, in addition to any abstraction
    /// already admitted by an `Only` filter.
    pub fn only<T: ?Sized + 'static>(mut self) -> Self {
        let id = TypeId::of::<T>();
        match &mut self.filter {
            AbstractionFilter::Only(ids) => {
                ids.insert(id);
            }
            AbstractionFilter::All => self.filter = AbstractionFilter::Only(HashSet::from([id])),
        }
        self
    }

    pub fn options(mut self, options: RegistrarOptions) -> Self {
        self.options = options;
        self
    }

    /// Attaches an observer next to the default tracing one.
    pub fn observer(mut self, observer: Arc<dyn ScanObserver>) -> Self {
        self.observers.add(observer);
        self
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn registrar_options(&self) -> &RegistrarOptions {
        &self.options
    }

    /// The registration tuples a scan would apply, without touching any
    /// container.
    pub fn plan(&self) -> DiResult<Vec<TypeRegistration>> {
        self.classify_all().map(|(planned, _)| planned)
    }

    /// Classifies every candidate and applies the resulting tuples to `sink`.
    ///
    /// Classification errors, tuples the sink refuses in
    /// [`RegistrationSink::check`] and, under [`DuplicateNamePolicy::Reject`],
    /// duplicate names are all reported before anything is applied. Errors
    /// from `register_type` itself are returned unchanged.
    pub fn scan<S>(&self, sink: &mut S) -> DiResult<ScanReport>
    where
        S: RegistrationSink + ?Sized,
    {
        let (planned, excluded) = self.classify_all()?;
        self.check_names(sink.named_types(), &planned)?;
        for registration in &planned {
            sink.check(registration)?;
        }

        for registration in &planned {
            sink.register_type(registration)?;
            sink.named_types_mut().append(registration);
            self.observers.registered(registration);
        }

        self.observers.scan_completed(planned.len(), excluded.len());
        Ok(ScanReport {
            registered: planned,
            excluded,
        })
    }

    fn classify_all(&self) -> DiResult<(Vec<TypeRegistration>, Vec<ExcludedType>)> {
        let mut planned = Vec::new();
        let mut excluded = Vec::new();

        for candidate in &self.candidates {
            let implementation = *candidate.implementation();
            let lifetime = match classify(&implementation)? {
                Classification::Register(lifetime) => lifetime,
                Classification::Excluded(reason) => {
                    self.observers.excluded(&implementation, reason);
                    excluded.push(ExcludedType { implementation, reason });
                    continue;
                }
            };

            let before = planned.len();
            let name = candidate.name().to_string();
            for (service, upcast) in &candidate.abstractions {
                if !self.filter.admits(*service) {
                    continue;
                }
                planned.push(TypeRegistration {
                    service: *service,
                    implementation,
                    lifetime,
                    name: name.clone(),
                    ctor: candidate.ctor.clone(),
                    upcast: upcast.clone(),
                });
            }
            if self.options.register_self {
                planned.push(TypeRegistration {
                    service: ServiceType::from(implementation),
                    implementation,
                    lifetime,
                    name,
                    ctor: candidate.ctor.clone(),
                    upcast: candidate.self_upcast.clone(),
                });
            }
            if planned.len() == before {
                self.observers.unbound(&implementation);
            }
        }

        Ok((planned, excluded))
    }

    fn check_names(&self, existing: &NamedTypes, planned: &[TypeRegistration]) -> DiResult<()> {
        let mut seen: HashSet<(TypeId, &str)> = HashSet::new();
        for registration in planned {
            let taken = existing.contains(registration.service, &registration.name)
                || !seen.insert((registration.service.id(), registration.name.as_str()));
            if !taken {
                continue;
            }
            match self.options.duplicate_names {
                DuplicateNamePolicy::Reject => {
                    return Err(DiError::DuplicateName {
                        abstraction: registration.service.type_name(),
                        name: registration.name.clone(),
                    });
                }
                DuplicateNamePolicy::FirstWins => self.observers.duplicate_name(registration),
            }
        }
        Ok(())
    }
}

impl ServiceModule for Registrar {
    fn register_services(self, services: &mut ServiceCollection) -> DiResult<()> {
        self.scan(services).map(|_| ())
    }
}

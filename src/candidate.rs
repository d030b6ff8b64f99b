//! Scan candidates: a concrete type, how to build it, and what it implements.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::provider::ResolverContext;
use crate::registration::{AnyArc, Ctor, Upcast};
use crate::{Component, DiError, DiResult, ServiceType, TypeInfo};

/// A concrete type offered to the [`Registrar`](crate::Registrar).
///
/// Rust cannot enumerate the traits a type implements, so a candidate lists
/// the abstractions it should be bound to, each with the coercion from the
/// concrete `Arc<C>` to `Arc<dyn Trait>`.
///
/// ```rust
/// use ferrous_autowire::{component, Candidate};
/// use std::sync::Arc;
///
/// trait Payment: Send + Sync {}
/// struct Card;
/// impl Payment for Card {}
/// component!(Card: transient);
///
/// let candidate: Candidate = Candidate::new(|_| Card)
///     .implements::<dyn Payment>(|c| c as Arc<dyn Payment>)
///     .into();
/// assert_eq!(candidate.name(), "Card");
/// assert_eq!(candidate.abstractions().count(), 1);
/// ```
#[derive(Clone)]
pub struct Candidate {
    implementation: TypeInfo,
    name: Option<String>,
    pub(crate) ctor: Ctor,
    pub(crate) self_upcast: Upcast,
    pub(crate) abstractions: Vec<(ServiceType, Upcast)>,
}

impl Candidate {
    /// Starts a candidate for `C` built by `ctor`.
    pub fn new<C, F>(ctor: F) -> CandidateBuilder<C>
    where
        C: Component + Send + Sync,
        F: Fn(&ResolverContext) -> C + Send + Sync + 'static,
    {
        Self::try_new(move |r: &ResolverContext| Ok(ctor(r)))
    }

    /// Like [`new`](Self::new), for constructors that can fail.
    ///
    /// The error surfaces from whichever resolution triggered construction.
    pub fn try_new<C, F>(ctor: F) -> CandidateBuilder<C>
    where
        C: Component + Send + Sync,
        F: Fn(&ResolverContext) -> DiResult<C> + Send + Sync + 'static,
    {
        let ctor: Ctor = Arc::new(move |r: &ResolverContext| -> DiResult<AnyArc> {
            Ok(Arc::new(ctor(r)?))
        });
        CandidateBuilder {
            candidate: Candidate {
                implementation: TypeInfo::of::<C>(),
                name: None,
                ctor,
                self_upcast: upcast_with::<C, C>(|c| c),
                abstractions: Vec::new(),
            },
            _concrete: PhantomData,
        }
    }

    pub fn implementation(&self) -> &TypeInfo {
        &self.implementation
    }

    /// Display name used in the named registry.
    ///
    /// The type name without path or generics unless overridden with
    /// [`CandidateBuilder::named`].
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.implementation.short_name())
    }

    /// Abstractions this candidate is bound to, in declaration order.
    pub fn abstractions(&self) -> impl Iterator<Item = ServiceType> + '_ {
        self.abstractions.iter().map(|(service, _)| *service)
    }
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("implementation", &self.implementation.type_name())
            .field("name", &self.name())
            .field(
                "abstractions",
                &self.abstractions().map(|s| s.type_name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Typed builder for a [`Candidate`] of concrete type `C`.
pub struct CandidateBuilder<C> {
    candidate: Candidate,
    _concrete: PhantomData<fn() -> C>,
}

impl<C: Component + Send + Sync> CandidateBuilder<C> {
    /// Binds the candidate to abstraction `T`.
    ///
    /// `cast` is normally `|c| c as Arc<dyn T>`. Declaring the same
    /// abstraction twice keeps the first declaration.
    pub fn implements<T>(mut self, cast: fn(Arc<C>) -> Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let service = ServiceType::of::<T>();
        if !self.candidate.abstractions.iter().any(|(s, _)| *s == service) {
            self.candidate
                .abstractions
                .push((service, upcast_with::<C, T>(cast)));
        }
        self
    }

    /// Overrides the display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.candidate.name = Some(name.into());
        self
    }

    pub fn build(self) -> Candidate {
        self.candidate
    }
}

impl<C> From<CandidateBuilder<C>> for Candidate {
    fn from(builder: CandidateBuilder<C>) -> Self {
        builder.candidate
    }
}

fn upcast_with<C, T>(cast: fn(Arc<C>) -> Arc<T>) -> Upcast
where
    C: Send + Sync + 'static,
    T: ?Sized + Send + Sync + 'static,
{
    Arc::new(move |any: AnyArc| -> DiResult<AnyArc> {
        let concrete = any
            .downcast::<C>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<C>()))?;
        // Stored as Arc<Arc<T>> inside Any, like trait bindings
        Ok(Arc::new(cast(concrete)))
    })
}

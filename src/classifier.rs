//! Lifetime classification of candidate types.
//!
//! Precedence, highest first:
//!
//! 1. a direct `Ignore` excludes the type;
//! 2. a direct `Transient` or `Scoped` selects that lifetime;
//! 3. `Singleton` declared on the type or on any ancestor selects singleton;
//! 4. anything else is excluded.
//!
//! Only `Singleton` travels down the declared base chain. A type whose base
//! is `Scoped` (or `Transient`, or `Ignore`) and that declares nothing itself
//! is *not* registered. The walk skips such ancestors and keeps climbing, so
//! a `Singleton` further up still applies.

use std::any::TypeId;
use std::fmt;

use crate::{DiError, DiResult, Lifetime, Marker, TypeInfo};

/// Outcome of classifying one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Register with this lifetime
    Register(Lifetime),
    /// Leave the type out of registration
    Excluded(Exclusion),
}

/// Why a type was left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// The type declares `Ignore` itself
    Ignored,
    /// Neither the type nor an ancestor carries an applicable marker
    Unmarked,
}

impl Classification {
    pub fn lifetime(self) -> Option<Lifetime> {
        match self {
            Classification::Register(lifetime) => Some(lifetime),
            Classification::Excluded(_) => None,
        }
    }

    pub fn is_excluded(self) -> bool {
        matches!(self, Classification::Excluded(_))
    }
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Exclusion::Ignored => "marked ignore",
            Exclusion::Unmarked => "no applicable marker",
        })
    }
}

/// Classifies one type from its own marker and its declared ancestors.
///
/// Fails with [`DiError::CyclicBase`] when the declared base chain loops.
///
/// ```rust
/// use ferrous_autowire::{classify, component, Classification, Exclusion, Lifetime, TypeInfo};
///
/// struct SingletonBase;
/// struct ScopedBase;
/// struct Inherits;
/// struct DoesNotInherit;
/// component!(SingletonBase: singleton);
/// component!(ScopedBase: scoped);
/// component!(Inherits, extends SingletonBase);
/// component!(DoesNotInherit, extends ScopedBase);
///
/// assert_eq!(
///     classify(&TypeInfo::of::<Inherits>()).unwrap(),
///     Classification::Register(Lifetime::Singleton)
/// );
/// assert_eq!(
///     classify(&TypeInfo::of::<DoesNotInherit>()).unwrap(),
///     Classification::Excluded(Exclusion::Unmarked)
/// );
/// ```
pub fn classify(info: &TypeInfo) -> DiResult<Classification> {
    match info.marker() {
        Some(Marker::Ignore) => return Ok(Classification::Excluded(Exclusion::Ignored)),
        Some(Marker::Transient) => return Ok(Classification::Register(Lifetime::Transient)),
        Some(Marker::Scoped) => return Ok(Classification::Register(Lifetime::Scoped)),
        Some(Marker::Singleton) => return Ok(Classification::Register(Lifetime::Singleton)),
        None => {}
    }

    if inherits_singleton(info)? {
        Ok(Classification::Register(Lifetime::Singleton))
    } else {
        Ok(Classification::Excluded(Exclusion::Unmarked))
    }
}

// Walks the declared bases until one declares an inheritable marker.
fn inherits_singleton(info: &TypeInfo) -> DiResult<bool> {
    let mut seen: Vec<TypeId> = vec![info.id()];
    let mut current = info.base();

    while let Some(ancestor) = current {
        if seen.contains(&ancestor.id()) {
            return Err(DiError::CyclicBase {
                type_name: info.type_name(),
                repeated: ancestor.type_name(),
            });
        }
        seen.push(ancestor.id());

        if let Some(marker) = ancestor.marker() {
            if marker.is_inherited() {
                return Ok(true);
            }
        }
        current = ancestor.base();
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component;

    struct SingletonBase;
    struct ScopedBase;
    struct TransientBase;
    struct IgnoredBase;
    component!(SingletonBase: singleton);
    component!(ScopedBase: scoped);
    component!(TransientBase: transient);
    component!(IgnoredBase: ignore);

    struct SingletonChild;
    struct SingletonGrandChild;
    struct ScopedOverSingleton;
    struct TransientOverSingleton;
    struct IgnoredOverSingleton;
    component!(SingletonChild, extends SingletonBase);
    component!(SingletonGrandChild, extends SingletonChild);
    component!(ScopedOverSingleton: scoped, extends SingletonBase);
    component!(TransientOverSingleton: transient, extends SingletonBase);
    component!(IgnoredOverSingleton: ignore, extends SingletonBase);

    struct ScopedChild;
    struct TransientChild;
    struct IgnoredChild;
    struct GrandChildOfScoped;
    struct BelowScopedOverSingleton;
    component!(ScopedChild, extends ScopedBase);
    component!(TransientChild, extends TransientBase);
    component!(IgnoredChild, extends IgnoredBase);
    component!(GrandChildOfScoped, extends ScopedChild);
    component!(BelowScopedOverSingleton, extends ScopedOverSingleton);

    struct Loose;
    component!(Loose);

    struct LoopA;
    struct LoopB;
    component!(LoopA, extends LoopB);
    component!(LoopB, extends LoopA);

    fn of<C: crate::Component>() -> Classification {
        classify(&TypeInfo::of::<C>()).unwrap()
    }

    #[test]
    fn direct_markers() {
        assert_eq!(of::<SingletonBase>(), Classification::Register(Lifetime::Singleton));
        assert_eq!(of::<ScopedBase>(), Classification::Register(Lifetime::Scoped));
        assert_eq!(of::<TransientBase>(), Classification::Register(Lifetime::Transient));
        assert_eq!(of::<IgnoredBase>(), Classification::Excluded(Exclusion::Ignored));
        assert_eq!(of::<Loose>(), Classification::Excluded(Exclusion::Unmarked));
    }

    #[test]
    fn singleton_is_inherited_through_any_depth() {
        assert_eq!(of::<SingletonChild>(), Classification::Register(Lifetime::Singleton));
        assert_eq!(of::<SingletonGrandChild>(), Classification::Register(Lifetime::Singleton));
    }

    #[test]
    fn own_marker_beats_singleton_ancestor() {
        assert_eq!(of::<ScopedOverSingleton>(), Classification::Register(Lifetime::Scoped));
        assert_eq!(of::<TransientOverSingleton>(), Classification::Register(Lifetime::Transient));
        assert_eq!(of::<IgnoredOverSingleton>(), Classification::Excluded(Exclusion::Ignored));
    }

    #[test]
    fn non_inherited_markers_do_not_reach_subtypes() {
        assert_eq!(of::<ScopedChild>(), Classification::Excluded(Exclusion::Unmarked));
        assert_eq!(of::<TransientChild>(), Classification::Excluded(Exclusion::Unmarked));
        assert_eq!(of::<IgnoredChild>(), Classification::Excluded(Exclusion::Unmarked));
        assert_eq!(of::<GrandChildOfScoped>(), Classification::Excluded(Exclusion::Unmarked));
    }

    #[test]
    fn walk_skips_non_inheritable_ancestors() {
        // Nearest marked ancestor is scoped, but a singleton sits further up.
        assert_eq!(
            of::<BelowScopedOverSingleton>(),
            Classification::Register(Lifetime::Singleton)
        );
    }

    #[test]
    fn cyclic_base_chain_is_a_definition_error() {
        let err = classify(&TypeInfo::of::<LoopA>()).unwrap_err();
        assert!(matches!(err, DiError::CyclicBase { .. }));
        assert!(err.to_string().contains("LoopA"));
    }

    #[test]
    fn marked_type_never_walks_its_chain() {
        // A direct marker decides before the (cyclic) chain is looked at.
        struct Anchored;
        component!(Anchored: transient, extends LoopA);
        assert_eq!(of::<Anchored>(), Classification::Register(Lifetime::Transient));
    }
}

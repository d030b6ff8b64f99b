//! Lifetime markers.

use std::fmt;

use crate::Lifetime;

/// Declarative tag a type carries to opt into (or out of) automatic
/// registration.
///
/// Markers carry no behavior. Only [`Marker::Singleton`] is inherited by
/// types that declare it as their base; `Ignore`, `Transient` and `Scoped`
/// apply to the declaring type alone.
///
/// ```rust
/// use ferrous_autowire::{Lifetime, Marker};
///
/// assert!(Marker::Singleton.is_inherited());
/// assert!(!Marker::Scoped.is_inherited());
/// assert_eq!(Marker::Transient.lifetime(), Some(Lifetime::Transient));
/// assert_eq!(Marker::Ignore.lifetime(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Never register this type, whatever its ancestors declare
    Ignore,
    /// Register with [`Lifetime::Transient`]
    Transient,
    /// Register with [`Lifetime::Scoped`]
    Scoped,
    /// Register with [`Lifetime::Singleton`]; inherited by subtypes
    Singleton,
}

impl Marker {
    /// Whether subtypes without a marker of their own pick this one up.
    pub const fn is_inherited(self) -> bool {
        matches!(self, Marker::Singleton)
    }

    /// The lifetime this marker selects, `None` for [`Marker::Ignore`].
    pub const fn lifetime(self) -> Option<Lifetime> {
        match self {
            Marker::Ignore => None,
            Marker::Transient => Some(Lifetime::Transient),
            Marker::Scoped => Some(Lifetime::Scoped),
            Marker::Singleton => Some(Lifetime::Singleton),
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Marker::Ignore => "ignore",
            Marker::Transient => "transient",
            Marker::Scoped => "scoped",
            Marker::Singleton => "singleton",
        })
    }
}

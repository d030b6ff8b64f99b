//! Marker declarations on types.
//!
//! Rust has no runtime attributes, so a type states its marker and its
//! declared base through the [`Component`] trait. Both are associated
//! constants: a type can carry at most one direct marker, and a second one is
//! a compile error rather than a scan-time surprise.

use std::any::TypeId;
use std::fmt;

use crate::Marker;

/// Declares the marker and the base type of a type taking part in scanning.
///
/// Implement it by hand or with [`component!`](crate::component). Abstract
/// "base classes" are ordinary types (usually zero-sized) that exist only to
/// carry an inheritable marker for their subtypes.
///
/// ```rust
/// use ferrous_autowire::{type_info, Component, Marker, TypeInfo};
///
/// struct SingletonBase;
/// impl Component for SingletonBase {
///     const MARKER: Option<Marker> = Some(Marker::Singleton);
/// }
///
/// struct Cache;
/// impl Component for Cache {
///     const BASE: Option<fn() -> TypeInfo> = Some(type_info::<SingletonBase>);
/// }
///
/// let info = TypeInfo::of::<Cache>();
/// assert_eq!(info.marker(), None);
/// assert_eq!(info.base().unwrap().marker(), Some(Marker::Singleton));
/// ```
pub trait Component: 'static {
    /// Marker declared directly on this type.
    const MARKER: Option<Marker> = None;
    /// Declared base type, walked for inheritable markers.
    const BASE: Option<fn() -> TypeInfo> = None;
}

/// Runtime view of one [`Component`] declaration.
///
/// The base is kept as a function pointer and only materialized on demand,
/// so a (mis)declared cyclic chain can be detected instead of recursing
/// forever.
#[derive(Clone, Copy)]
pub struct TypeInfo {
    id: TypeId,
    type_name: &'static str,
    marker: Option<Marker>,
    base: Option<fn() -> TypeInfo>,
}

/// `TypeInfo::of::<C>()` as a plain function, usable in `Component::BASE`.
pub fn type_info<C: Component + ?Sized>() -> TypeInfo {
    TypeInfo::of::<C>()
}

impl TypeInfo {
    pub fn of<C: Component + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<C>(),
            type_name: std::any::type_name::<C>(),
            marker: C::MARKER,
            base: C::BASE,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Type name without module path or generic arguments.
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.type_name)
    }

    /// The marker this type declares itself, ignoring its ancestors.
    pub fn marker(&self) -> Option<Marker> {
        self.marker
    }

    /// The declared base type, if any.
    pub fn base(&self) -> Option<TypeInfo> {
        self.base.map(|f| f())
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("type_name", &self.type_name)
            .field("marker", &self.marker)
            .field("has_base", &self.base.is_some())
            .finish()
    }
}

/// Strips the module path and generic arguments from a `type_name` result.
///
/// ```rust
/// use ferrous_autowire::short_type_name;
///
/// assert_eq!(short_type_name("app::services::ScopedClass2"), "ScopedClass2");
/// assert_eq!(short_type_name("app::Wrapper<alloc::string::String>"), "Wrapper");
/// assert_eq!(short_type_name("dyn app::Payment"), "Payment");
/// ```
pub fn short_type_name(full: &'static str) -> &'static str {
    let head = full.strip_prefix("dyn ").unwrap_or(full);
    let head = match head.find('<') {
        Some(pos) => &head[..pos],
        None => head,
    };
    head.rsplit("::").next().unwrap_or(head)
}

/// Implements [`Component`] for a type.
///
/// Markers are written as `ignore`, `transient`, `scoped` or `singleton`;
/// a base is introduced with `extends`. Exactly zero or one marker is
/// accepted:
///
/// ```rust
/// use ferrous_autowire::{component, Marker, TypeInfo};
///
/// struct Base;
/// struct Repository;
/// struct Derived;
/// struct Plain;
///
/// component!(Base: singleton);
/// component!(Repository: scoped);
/// component!(Derived, extends Base);
/// component!(Plain);
///
/// assert_eq!(TypeInfo::of::<Repository>().marker(), Some(Marker::Scoped));
/// assert_eq!(TypeInfo::of::<Derived>().base().unwrap().type_name(), TypeInfo::of::<Base>().type_name());
/// ```
///
/// ```compile_fail
/// use ferrous_autowire::component;
///
/// struct Conflicted;
/// component!(Conflicted: scoped, singleton);
/// ```
#[macro_export]
macro_rules! component {
    ($ty:ty : $marker:ident, extends $base:ty) => {
        impl $crate::Component for $ty {
            const MARKER: ::core::option::Option<$crate::Marker> =
                ::core::option::Option::Some($crate::__autowire_marker!($marker));
            const BASE: ::core::option::Option<fn() -> $crate::TypeInfo> =
                ::core::option::Option::Some($crate::type_info::<$base>);
        }
    };
    ($ty:ty : $marker:ident) => {
        impl $crate::Component for $ty {
            const MARKER: ::core::option::Option<$crate::Marker> =
                ::core::option::Option::Some($crate::__autowire_marker!($marker));
        }
    };
    ($ty:ty, extends $base:ty) => {
        impl $crate::Component for $ty {
            const BASE: ::core::option::Option<fn() -> $crate::TypeInfo> =
                ::core::option::Option::Some($crate::type_info::<$base>);
        }
    };
    ($ty:ty) => {
        impl $crate::Component for $ty {}
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __autowire_marker {
    (ignore) => {
        $crate::Marker::Ignore
    };
    (transient) => {
        $crate::Marker::Transient
    };
    (scoped) => {
        $crate::Marker::Scoped
    };
    (singleton) => {
        $crate::Marker::Singleton
    };
}

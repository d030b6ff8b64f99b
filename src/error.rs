//! Error types for classification, registration and named resolution.

use thiserror::Error;

/// Errors raised by the registrar, the named factories and the container.
///
/// Every failure here is deterministic for a given input, so none of them is
/// retried anywhere in the crate.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{DiError, ServiceCollection, Resolver};
///
/// let provider = ServiceCollection::new().build();
/// match provider.get::<String>() {
///     Err(DiError::NotFound(type_name)) => {
///         assert_eq!(type_name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
///
/// let err = DiError::InvalidName;
/// assert_eq!(err.to_string(), "Service name must not be empty or whitespace");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiError {
    /// Service not registered
    #[error("Service not found: {0}")]
    NotFound(&'static str),
    /// Type downcast failed
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// Circular dependency detected (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<&'static str>),
    /// Invalid lifetime resolution (e.g., scoped from root)
    #[error("Lifetime error: {0}")]
    WrongLifetime(&'static str),
    /// Maximum recursion depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),

    /// A declared base chain leads back to a type already on the chain
    #[error("Declared base chain of {type_name} is cyclic at {repeated}")]
    CyclicBase {
        type_name: &'static str,
        repeated: &'static str,
    },
    /// The same implementation was registered under two different lifetimes
    #[error("{implementation} is already registered as {existing}, cannot register it as {requested}")]
    LifetimeConflict {
        implementation: &'static str,
        existing: crate::Lifetime,
        requested: crate::Lifetime,
    },
    /// A name is registered twice for one abstraction under the strict policy
    #[error("Name '{name}' is already registered for {abstraction}")]
    DuplicateName {
        abstraction: &'static str,
        name: String,
    },

    /// Empty or whitespace-only name passed to a named lookup
    #[error("Service name must not be empty or whitespace")]
    InvalidName,
    /// No registry entry carries the requested name
    #[error("No implementation of {abstraction} is registered under '{name}'")]
    NameNotFound {
        abstraction: &'static str,
        name: String,
    },

    /// Registrar options could not be read
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for DI operations
pub type DiResult<T> = Result<T, DiError>;

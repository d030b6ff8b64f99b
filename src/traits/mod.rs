//! Core resolver traits.

mod resolver;

pub use resolver::{Resolver, ResolverCore};

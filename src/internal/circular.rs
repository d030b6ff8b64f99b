//! Circular dependency detection for constructor chains.
//!
//! Constructors return plain values and reach their dependencies through
//! `get_required`, which panics on failure. A cycle is therefore reported by
//! unwinding with a [`CircularPanic`] payload and turned back into
//! [`DiError::Circular`] by the outermost resolve on the thread.

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{DiError, DiResult};

const MAX_DEPTH: usize = 1024;

thread_local! {
    static RESOLVING: RefCell<ResolutionStack> = RefCell::new(ResolutionStack::default());
}

#[derive(Default)]
struct ResolutionStack {
    names: Vec<&'static str>,
    // Set once a cycle is found so guards dropped during unwinding keep the path.
    unwinding: bool,
}

/// Panic payload carrying the dependency path of a detected cycle,
/// e.g. `["ServiceA", "ServiceB", "ServiceA"]`.
#[derive(Debug)]
pub struct CircularPanic {
    pub path: Box<[&'static str]>,
}

struct StackGuard {
    name: &'static str,
}

impl StackGuard {
    fn enter(name: &'static str) -> Self {
        RESOLVING.with(|stack| {
            let mut stack = stack.borrow_mut();

            if stack.names.contains(&name) {
                let mut path = stack.names.clone();
                path.push(name);
                stack.unwinding = true;
                drop(stack);
                panic::panic_any(CircularPanic { path: path.into_boxed_slice() });
            }

            if stack.names.len() >= MAX_DEPTH {
                let depth = stack.names.len();
                drop(stack);
                panic::panic_any(DiError::DepthExceeded(depth));
            }

            stack.names.push(name);
        });

        Self { name }
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        RESOLVING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.unwinding {
                return;
            }
            let last = stack.names.pop();
            debug_assert_eq!(last, Some(self.name));
        });
    }
}

fn is_outermost() -> bool {
    RESOLVING.with(|stack| stack.borrow().names.is_empty())
}

fn reset() {
    RESOLVING.with(|stack| *stack.borrow_mut() = ResolutionStack::default());
}

/// Runs one resolve step for `name` with cycle detection.
///
/// Nested steps let panics travel up; the outermost one converts cycle and
/// depth panics into errors and re-raises anything else.
pub(crate) fn with_circular_catch<T, F>(name: &'static str, f: F) -> DiResult<T>
where
    F: FnOnce() -> DiResult<T>,
{
    let outermost = is_outermost();
    if !outermost {
        let _guard = StackGuard::enter(name);
        return f();
    }

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let _guard = StackGuard::enter(name);
        f()
    }));

    match result {
        Ok(value) => value,
        Err(payload) => {
            reset();
            if let Some(cycle) = payload.downcast_ref::<CircularPanic>() {
                Err(DiError::Circular(cycle.path.to_vec()))
            } else if let Some(err) = payload.downcast_ref::<DiError>() {
                Err(err.clone())
            } else {
                panic::resume_unwind(payload)
            }
        }
    }
}

//! Circular factory detection for the bundled container.
//!
//! Each thread keeps the stack of keys whose factories are running. A key
//! requested while it is already on the stack is a cycle.

use std::cell::RefCell;

use crate::error::{InjectError, InjectResult};
use crate::key::Key;

thread_local! {
    static RESOLVING: RefCell<Vec<Key>> = const { RefCell::new(Vec::new()) };
}

/// Pops its key when dropped, including during unwinding.
struct StackGuard;

impl StackGuard {
    fn push(key: Key) -> InjectResult<Self> {
        RESOLVING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(start) = stack.iter().position(|k| *k == key) {
                let mut path: Vec<&'static str> = stack[start..].iter().map(Key::display_name).collect();
                path.push(key.display_name());
                return Err(InjectError::Circular(path));
            }
            stack.push(key);
            Ok(StackGuard)
        })
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        RESOLVING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Runs `resolve` with `key` on the resolution stack.
///
/// Fails with [`InjectError::Circular`] before running `resolve` when `key`
/// is already being resolved on this thread.
pub(crate) fn with_circular_guard<T>(key: &Key, resolve: impl FnOnce() -> InjectResult<T>) -> InjectResult<T> {
    let _guard = StackGuard::push(*key)?;
    resolve()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;

    #[test]
    fn nested_distinct_keys_resolve() {
        let result = with_circular_guard(&Key::of::<A>(), || {
            with_circular_guard(&Key::of::<B>(), || Ok(2))
        });
        assert_eq!(result, Ok(2));
    }

    #[test]
    fn repeated_key_reports_cycle_path() {
        let result: InjectResult<()> = with_circular_guard(&Key::of::<A>(), || {
            with_circular_guard(&Key::of::<B>(), || with_circular_guard(&Key::of::<A>(), || Ok(())))
        });
        match result {
            Err(InjectError::Circular(path)) => {
                assert_eq!(path.len(), 3);
                assert!(path[0].ends_with("::A"));
                assert!(path[1].ends_with("::B"));
                assert!(path[2].ends_with("::A"));
            }
            other => panic!("expected a cycle, got {:?}", other),
        }
    }

    #[test]
    fn stack_is_empty_after_a_cycle() {
        let _ = with_circular_guard(&Key::of::<A>(), || with_circular_guard(&Key::of::<A>(), || Ok(())));
        RESOLVING.with(|stack| assert!(stack.borrow().is_empty()));
        assert_eq!(with_circular_guard(&Key::of::<A>(), || Ok(1)), Ok(1));
    }
}

//! Shared game handle for event callbacks
//!
//! Browser callbacks all reach the same game through an `Rc<RefCell<_>>`.
//! Some DOM calls (focus changes, for one) dispatch events synchronously, so
//! a callback can run while a frame still holds the game. `with` skips the
//! access in that case instead of panicking on a double borrow.

use std::cell::RefCell;
use std::rc::Rc;

/// Single-threaded shared ownership with non-panicking access
#[derive(Debug, Default)]
pub struct Shared<T> {
    inner: Rc<RefCell<T>>,
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(value)),
        }
    }

    /// Run `f` on the value, or return None if it is already borrowed
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        match self.inner.try_borrow_mut() {
            Ok(mut value) => Some(f(&mut *value)),
            Err(_) => {
                log::warn!("Skipped re-entrant game access");
                None
            }
        }
    }

    /// Whether a `with` call is currently running
    pub fn is_busy(&self) -> bool {
        self.inner.try_borrow_mut().is_err()
    }
}

//! Shared entity handles with explicit identity.
//!
//! A customer can sit in several branches and a branch can be registered
//! with several banks, so both are held through a [`Handle`]. Membership
//! checks compare the handle's key, never the wrapped value.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

/// A shared, identity-compared reference to a ledger entity.
///
/// Cloning a handle yields another reference to the same entity; two
/// handles are equal only when they came from the same [`Handle::new`] call.
pub struct Handle<T> {
    key: u64,
    inner: Rc<RefCell<T>>,
}

impl<T> Handle<T> {
    /// Wraps `value` and assigns it a process-unique key.
    pub fn new(value: T) -> Self {
        Handle {
            key: NEXT_KEY.fetch_add(1, Ordering::Relaxed),
            inner: Rc::new(RefCell::new(value)),
        }
    }

    /// The identity key of this handle.
    pub fn key(&self) -> u64 {
        self.key
    }

    /// Immutably borrows the entity.
    ///
    /// # Panics
    ///
    /// Panics if the entity is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.inner.borrow()
    }

    /// Mutably borrows the entity.
    ///
    /// # Panics
    ///
    /// Panics if the entity is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.inner.borrow_mut()
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Handle {
            key: self.key,
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> Eq for Handle<T> {}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.key).finish()
    }
}

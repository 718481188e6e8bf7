#![forbid(unsafe_code)]

//! Shared, identity-comparable callbacks.
//!
//! A [`Callback`] wraps a closure in an `Rc`, so clones are cheap and all
//! clones of one callback compare equal. Equality is *identity*: two
//! callbacks built from identical closures are still different. Memoized
//! renders rely on this to tell "same handler as last time" from "new
//! handler".

use std::fmt;
use std::rc::Rc;

/// A cloneable handler `A -> R` compared by identity.
pub struct Callback<A, R = ()> {
    inner: Rc<dyn Fn(A) -> R>,
}

impl<A, R> Callback<A, R> {
    /// Wrap a closure.
    pub fn new(f: impl Fn(A) -> R + 'static) -> Self {
        Self { inner: Rc::new(f) }
    }

    /// Invoke the callback.
    pub fn call(&self, args: A) -> R {
        (self.inner)(args)
    }

    /// Whether `self` and `other` are clones of the same callback.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        // Compare data pointers only; vtable addresses are not unique.
        std::ptr::addr_eq(Rc::as_ptr(&self.inner), Rc::as_ptr(&other.inner))
    }
}

impl<A, R> Clone for Callback<A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A, R> PartialEq for Callback<A, R> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<A, R> Eq for Callback<A, R> {}

impl<A, R> fmt::Debug for Callback<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("inner", &Rc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}

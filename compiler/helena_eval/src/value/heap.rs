//! Shared, immutable payload of heap-backed values.
//!
//! `Heap<T>` wraps `Rc<T>`. Its constructors are `pub(super)`, so every
//! heap-backed [`Value`](super::Value) is built through a factory method
//! such as `Value::string` or `Value::tuple`.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// Reference-counted, immutable payload.
#[repr(transparent)]
pub struct Heap<T: ?Sized>(Rc<T>);

impl<T> Heap<T> {
    #[inline]
    pub(super) fn new(value: T) -> Self {
        Heap(Rc::new(value))
    }
}

impl<T: ?Sized> Heap<T> {
    /// Wrap an existing allocation, e.g. a trait object.
    #[inline]
    pub(super) fn from_rc(rc: Rc<T>) -> Self {
        Heap(rc)
    }

    /// The underlying `Rc`, for handing the payload to code that keeps it.
    #[inline]
    pub fn inner(&self) -> &Rc<T> {
        &self.0
    }

    /// Whether both handles share one allocation.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl<T: ?Sized> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Rc::clone(&self.0))
    }
}

impl<T: ?Sized + PartialEq> PartialEq for Heap<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        *self.0 == *other.0
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: ?Sized> AsRef<T> for Heap<T> {
    #[inline]
    fn as_ref(&self) -> &T {
        &self.0
    }
}

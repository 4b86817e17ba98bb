//! Opaque handles to host-owned data.
//!
//! [`Foreign`] wraps an arbitrary host value so it can travel inside a
//! [`Value`](crate::Value). [`ScopeHandle`] is the shared reference a closure
//! keeps to the lexical scope it was defined in; the evaluator decides what
//! a scope actually is.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A host value that can be wrapped in [`Foreign`].
///
/// Implemented for every `Debug + Send + Sync + 'static` type.
pub trait HostValue: Any + fmt::Debug + Send + Sync {
    /// Upcasts to `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + fmt::Debug + Send + Sync> HostValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Opaque wrapper around a host-native value.
///
/// Equality is identity: two wrappers are equal only if they share the same
/// allocation.
#[derive(Clone)]
pub struct Foreign(Arc<dyn HostValue>);

impl Foreign {
    /// Wraps a host value.
    pub fn new<T: HostValue>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Returns the wrapped value if it has type `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.0).as_any().downcast_ref::<T>()
    }

    /// Returns true if both wrappers share one allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }
}

impl fmt::Debug for Foreign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

/// Shared handle to an evaluator scope captured by a closure.
///
/// Every closure defined in a scope holds a clone; the scope is released when
/// the last clone (closure or evaluation frame) is dropped.
#[derive(Clone)]
pub struct ScopeHandle(Arc<dyn Any + Send + Sync>);

impl ScopeHandle {
    /// Wraps an evaluator scope.
    pub fn new<T: Any + Send + Sync>(scope: T) -> Self {
        Self(Arc::new(scope))
    }

    /// Returns the scope if it has type `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.0).downcast_ref::<T>()
    }

    /// Returns true if both handles refer to the same scope.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live holders of this scope.
    #[must_use]
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl fmt::Debug for ScopeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeHandle({:p})", Arc::as_ptr(&self.0))
    }
}

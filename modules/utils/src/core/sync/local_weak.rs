//! Weak counterpart of [`LocalShared`](super::LocalShared).

use alloc::rc::Weak;
use core::cell::RefCell;

use super::LocalShared;

/// Weak reference wrapper backed by [`alloc::rc::Weak`].
pub struct LocalWeak<T> {
  inner: Weak<RefCell<T>>,
}

impl<T> LocalWeak<T> {
  /// Creates a weak handle that points to nothing.
  #[must_use]
  pub const fn new() -> Self {
    Self { inner: Weak::new() }
  }

  pub(crate) const fn from_rc(inner: Weak<RefCell<T>>) -> Self {
    Self { inner }
  }

  /// Attempts to upgrade to a strong handle.
  ///
  /// Returns `None` if the value has been dropped.
  #[must_use]
  pub fn upgrade(&self) -> Option<LocalShared<T>> {
    self.inner.upgrade().map(LocalShared::from_rc)
  }

  /// Returns `true` when both weak handles point at the same allocation.
  #[must_use]
  pub fn ptr_eq(&self, other: &Self) -> bool {
    Weak::ptr_eq(&self.inner, &other.inner)
  }
}

impl<T> Clone for LocalWeak<T> {
  fn clone(&self) -> Self {
    Self { inner: self.inner.clone() }
  }
}

impl<T> Default for LocalWeak<T> {
  fn default() -> Self {
    Self::new()
  }
}

//! Single-threaded shared ownership with scoped interior mutability.

#[cfg(test)]
mod tests;

use alloc::rc::Rc;
use core::{cell::RefCell, fmt};

use super::{LocalWeak, SharedAccess};

/// Shared ownership wrapper backed by `Rc<RefCell<T>>`.
///
/// Suitable for run-to-completion runtimes where every owner lives on one logical thread.
/// Access goes through [`SharedAccess`], which confines each borrow to a closure.
pub struct LocalShared<T> {
  inner: Rc<RefCell<T>>,
}

impl<T> LocalShared<T> {
  /// Creates a new shared handle owning `value`.
  pub fn new(value: T) -> Self {
    Self { inner: Rc::new(RefCell::new(value)) }
  }

  /// Returns a weak handle that does not keep the value alive.
  #[must_use]
  pub fn downgrade(&self) -> LocalWeak<T> {
    LocalWeak::from_rc(Rc::downgrade(&self.inner))
  }

  /// Returns `true` when both handles point at the same allocation.
  #[must_use]
  pub fn ptr_eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.inner, &other.inner)
  }

  /// Returns the number of strong handles.
  #[must_use]
  pub fn strong_count(&self) -> usize {
    Rc::strong_count(&self.inner)
  }

  pub(crate) const fn from_rc(inner: Rc<RefCell<T>>) -> Self {
    Self { inner }
  }
}

impl<T> SharedAccess<T> for LocalShared<T> {
  /// # Panics
  ///
  /// Panics when the value is already mutably borrowed by an enclosing `with_write` scope.
  fn with_read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
    let guard = self.inner.borrow();
    f(&guard)
  }

  /// # Panics
  ///
  /// Panics when the value is already borrowed by an enclosing scope.
  fn with_write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
    let mut guard = self.inner.borrow_mut();
    f(&mut guard)
  }
}

impl<T> Clone for LocalShared<T> {
  fn clone(&self) -> Self {
    Self { inner: self.inner.clone() }
  }
}

impl<T> fmt::Debug for LocalShared<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LocalShared").field("strong", &Rc::strong_count(&self.inner)).finish()
  }
}

//! One-shot result slot shared between a settling side and an observing side.

#[cfg(test)]
mod tests;

use core::task::Waker;

use super::{LocalShared, SettleOnceListener, SharedAccess};

struct SettleState<T> {
  value:   Option<T>,
  settled: bool,
  waker:   Option<Waker>,
}

/// Shared slot that accepts exactly one value.
///
/// The first [`settle`](Self::settle) stores the value and wakes any registered waker.
/// Later calls are rejected and leave the stored value untouched, so completion paths that race
/// each other cannot deliver twice.
pub struct SettleOnce<T> {
  inner: LocalShared<SettleState<T>>,
}

impl<T> SettleOnce<T> {
  /// Creates an unsettled slot.
  #[must_use]
  pub fn new() -> Self {
    Self { inner: LocalShared::new(SettleState { value: None, settled: false, waker: None }) }
  }

  /// Stores `value` if the slot has not been settled yet.
  ///
  /// Returns `false` when the slot was already settled; `value` is dropped in that case.
  pub fn settle(&self, value: T) -> bool {
    let waker = self.inner.with_write(|state| {
      if state.settled {
        return Err(());
      }
      state.settled = true;
      state.value = Some(value);
      Ok(state.waker.take())
    });
    match waker {
      | Ok(Some(waker)) => {
        waker.wake();
        true
      },
      | Ok(None) => true,
      | Err(()) => false,
    }
  }

  /// Returns `true` once a value has been accepted, even if it was already taken.
  #[must_use]
  pub fn is_settled(&self) -> bool {
    self.inner.with_read(|state| state.settled)
  }

  /// Takes the settled value, leaving the slot settled but empty.
  #[must_use]
  pub fn try_take(&self) -> Option<T> {
    self.inner.with_write(|state| state.value.take())
  }

  /// Registers a waker notified when the slot settles.
  pub fn register_waker(&self, waker: &Waker) {
    self.inner.with_write(|state| match &state.waker {
      | Some(current) if current.will_wake(waker) => {},
      | _ => state.waker = Some(waker.clone()),
    });
  }

  /// Returns a future resolving with the settled value.
  #[must_use]
  pub fn listener(&self) -> SettleOnceListener<T> {
    SettleOnceListener::new(self.clone())
  }
}

impl<T> Clone for SettleOnce<T> {
  fn clone(&self) -> Self {
    Self { inner: self.inner.clone() }
  }
}

impl<T> Default for SettleOnce<T> {
  fn default() -> Self {
    Self::new()
  }
}

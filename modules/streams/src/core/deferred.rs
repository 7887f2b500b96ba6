//! Future-like handle for results produced by scheduled tasks.

#[cfg(test)]
mod tests;

use core::{
  future::Future,
  pin::Pin,
  task::{Context, Poll},
};

use sluice_utils_rs::core::sync::{SettleOnce, SettleOnceListener};

/// Pending result that settles once, either immediately or from a scheduled task.
///
/// Hosts without an async runtime call [`try_take`](Self::try_take) after driving the
/// scheduler; async hosts simply `.await` it.
pub struct Deferred<T> {
  slot:     SettleOnce<T>,
  listener: SettleOnceListener<T>,
}

impl<T> Deferred<T> {
  pub(crate) fn new(slot: SettleOnce<T>) -> Self {
    let listener = slot.listener();
    Self { slot, listener }
  }

  /// Returns a deferred value that is already settled.
  #[must_use]
  pub fn ready(value: T) -> Self {
    let slot = SettleOnce::new();
    slot.settle(value);
    Self::new(slot)
  }

  /// Returns `true` once the value is available.
  #[must_use]
  pub fn is_settled(&self) -> bool {
    self.slot.is_settled()
  }

  /// Takes the value if it has settled.
  #[must_use]
  pub fn try_take(&self) -> Option<T> {
    self.slot.try_take()
  }
}

impl<T> Future for Deferred<T> {
  type Output = T;

  fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    Pin::new(&mut self.listener).poll(cx)
  }
}

impl<T> Unpin for Deferred<T> {}

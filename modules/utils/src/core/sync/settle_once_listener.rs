//! Listener adapter for [`SettleOnce`](super::SettleOnce).

#[cfg(test)]
mod tests;

use core::{
  future::Future,
  pin::Pin,
  task::{Context, Poll},
};

use super::SettleOnce;

/// Future adapter that polls the underlying [`SettleOnce`].
pub struct SettleOnceListener<T> {
  slot: SettleOnce<T>,
}

impl<T> SettleOnceListener<T> {
  /// Creates a new listener for the given slot.
  #[must_use]
  pub const fn new(slot: SettleOnce<T>) -> Self {
    Self { slot }
  }
}

impl<T> Future for SettleOnceListener<T> {
  type Output = T;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    if let Some(value) = self.slot.try_take() {
      return Poll::Ready(value);
    }
    self.slot.register_waker(cx.waker());
    // 登録中に settle された場合の取りこぼし防止
    match self.slot.try_take() {
      | Some(value) => Poll::Ready(value),
      | None => Poll::Pending,
    }
  }
}

impl<T> Unpin for SettleOnceListener<T> {}

//! Settle-once completion callback handed to producers and consumers.

#[cfg(test)]
mod tests;

use alloc::boxed::Box;
use core::fmt;

use super::StreamError;

type DoneFn = Box<dyn FnOnce(Result<(), StreamError>)>;

/// Completion callback that can be settled at most once.
///
/// Settling consumes the callback, so a second completion cannot be expressed. Dropping an
/// unsettled callback settles it with [`StreamError::CallbackDropped`], which keeps the endpoint
/// from waiting forever on a consumer that lost it.
pub struct DoneCallback {
  inner: Option<DoneFn>,
}

impl DoneCallback {
  /// Wraps `callback`.
  #[must_use]
  pub fn new(callback: impl FnOnce(Result<(), StreamError>) + 'static) -> Self {
    Self { inner: Some(Box::new(callback)) }
  }

  /// Settles with `result`.
  pub fn complete(mut self, result: Result<(), StreamError>) {
    if let Some(callback) = self.inner.take() {
      callback(result);
    }
  }

  /// Settles successfully.
  pub fn succeed(self) {
    self.complete(Ok(()));
  }

  /// Settles with `error`.
  pub fn fail(self, error: StreamError) {
    self.complete(Err(error));
  }
}

impl Drop for DoneCallback {
  fn drop(&mut self) {
    if let Some(callback) = self.inner.take() {
      callback(Err(StreamError::CallbackDropped));
    }
  }
}

impl fmt::Debug for DoneCallback {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DoneCallback").field("pending", &self.inner.is_some()).finish()
  }
}

#[cfg(test)]
mod tests;

use super::{StreamError, WeakReadable};

/// Handle a producer uses to deliver data into its endpoint.
///
/// The handle does not keep the endpoint alive; once the endpoint is gone every delivery fails with
/// [`StreamError::StreamClosed`].
pub struct PushHandle<T> {
  source: WeakReadable<T>,
}

impl<T: 'static> PushHandle<T> {
  pub(crate) const fn new(source: WeakReadable<T>) -> Self {
    Self { source }
  }

  /// Pushes a chunk; see [`ReadableEndpoint::push`](crate::core::ReadableEndpoint::push).
  ///
  /// # Errors
  ///
  /// Returns the endpoint's rejection, or [`StreamError::StreamClosed`] when it no longer exists.
  pub fn push(&self, chunk: T) -> Result<bool, StreamError> {
    self.source.upgrade().ok_or(StreamError::StreamClosed)?.push(chunk)
  }

  /// Signals end of data.
  ///
  /// # Errors
  ///
  /// Returns the endpoint's rejection, or [`StreamError::StreamClosed`] when it no longer exists.
  pub fn push_end(&self) -> Result<(), StreamError> {
    self.source.upgrade().ok_or(StreamError::StreamClosed)?.push_end()
  }

  /// Destroys the endpoint with `error`.
  pub fn fail(&self, error: StreamError) {
    if let Some(source) = self.source.upgrade() {
      source.destroy(Some(error));
    }
  }

  /// Returns `true` when the endpoint was destroyed or dropped.
  #[must_use]
  pub fn is_closed(&self) -> bool {
    self.source.upgrade().is_none_or(|source| source.is_closed())
  }
}

impl<T> Clone for PushHandle<T> {
  fn clone(&self) -> Self {
    Self { source: self.source.clone() }
  }
}

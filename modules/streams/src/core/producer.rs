use super::{DoneCallback, PushHandle, StreamError};

/// Data source behind a [`ReadableEndpoint`](crate::core::ReadableEndpoint).
///
/// The endpoint calls [`on_pull`](Self::on_pull) when its buffer runs below the high-water mark.
/// The producer delivers through the handle, now or later; it is not pulled again until it pushed
/// something or signalled end.
pub trait Producer<T> {
  /// Requests roughly `requested` cost units of data.
  fn on_pull(&mut self, requested: usize, handle: &PushHandle<T>);

  /// Releases resources when the endpoint is destroyed.
  ///
  /// Settling `done` with an error turns a plain destroy into an errored one.
  fn on_destroy(&mut self, reason: Option<&StreamError>, done: DoneCallback) {
    let _ = reason;
    done.succeed();
  }
}

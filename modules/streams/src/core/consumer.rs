use alloc::vec::Vec;

use super::{DoneCallback, StreamError};

/// Data sink behind a [`WritableEndpoint`](crate::core::WritableEndpoint).
///
/// At most one write, batch or final call is outstanding at a time; the endpoint waits for the
/// supplied [`DoneCallback`] before dispatching the next one.
pub trait Consumer<T> {
  /// Accepts one chunk.
  fn on_write(&mut self, chunk: T, done: DoneCallback);

  /// Returns whether [`on_writev`](Self::on_writev) is implemented.
  fn supports_batch(&self) -> bool {
    false
  }

  /// Accepts every buffered chunk at once.
  fn on_writev(&mut self, chunks: Vec<T>, done: DoneCallback) {
    drop(chunks);
    done.fail(StreamError::BatchUnsupported);
  }

  /// Flushes after the last write, before `finish` is emitted.
  fn on_final(&mut self, done: DoneCallback) {
    done.succeed();
  }

  /// Releases resources when the endpoint is destroyed.
  fn on_destroy(&mut self, reason: Option<&StreamError>, done: DoneCallback) {
    let _ = reason;
    done.succeed();
  }
}

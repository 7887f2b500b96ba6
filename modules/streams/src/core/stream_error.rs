//! Stream error definitions.


use alloc::string::String;

use super::ConsumerKind;

/// Errors produced by endpoint operations and carried as sticky endpoint errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StreamError {
  /// The endpoint was destroyed without an error.
  #[error("stream is closed")]
  StreamClosed,
  /// A chunk was pushed after end of data was signalled.
  #[error("push after end of stream")]
  PushAfterEnd,
  /// A chunk was unshifted after the end event was emitted.
  #[error("unshift after end event")]
  UnshiftAfterEnd,
  /// A chunk was written after `end` was called.
  #[error("write after end")]
  WriteAfterEnd,
  /// `end` was called on a writable that already finished.
  #[error("stream already finished")]
  AlreadyFinished,
  /// A consumer of a different kind is already attached.
  #[error("consumption mode conflict: {active} consumer already attached")]
  ModeConflict {
    /// Kind of the consumer currently attached.
    active: ConsumerKind,
  },
  /// The destination is already piped from the same source.
  #[error("destination is already piped from this source")]
  AlreadyPiped,
  /// The source closed before signalling end of data.
  #[error("premature close")]
  PrematureClose,
  /// A done callback was dropped without being invoked.
  #[error("completion callback dropped before it was invoked")]
  CallbackDropped,
  /// A read asked for more than the largest supported high-water mark.
  #[error("requested read size {requested} is out of range")]
  SizeOutOfRange {
    /// Requested size in bytes.
    requested: usize,
  },
  /// Batched writes were requested from a consumer that does not support them.
  #[error("consumer does not support batched writes")]
  BatchUnsupported,
  /// The producer reported a failure.
  #[error("producer failed: {0}")]
  Producer(String),
  /// The consumer reported a failure.
  #[error("consumer failed: {0}")]
  Consumer(String),
  /// The stream was aborted by its owner.
  #[error("aborted: {0}")]
  Aborted(String),
}

impl StreamError {
  /// Builds a producer failure from any displayable reason.
  #[must_use]
  pub fn producer(reason: impl Into<String>) -> Self {
    Self::Producer(reason.into())
  }

  /// Builds a consumer failure from any displayable reason.
  #[must_use]
  pub fn consumer(reason: impl Into<String>) -> Self {
    Self::Consumer(reason.into())
  }

  /// Builds an abort reason.
  #[must_use]
  pub fn aborted(reason: impl Into<String>) -> Self {
    Self::Aborted(reason.into())
  }
}

use crate::core::StreamError;

/// Lifecycle of a writable endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WritableLifecycle {
  Open,
  /// `end` was called; buffered writes are flushing.
  Ending,
  Finished,
  Errored(StreamError),
  Destroyed,
}

impl WritableLifecycle {
  pub(crate) fn error(&self) -> Option<StreamError> {
    match self {
      | Self::Errored(error) => Some(error.clone()),
      | _ => None,
    }
  }

  /// Returns the rejection for a new write, if any.
  pub(crate) fn write_rejection(&self) -> Option<StreamError> {
    match self {
      | Self::Open => None,
      | Self::Ending => Some(StreamError::WriteAfterEnd),
      | Self::Errored(error) => Some(error.clone()),
      | Self::Finished | Self::Destroyed => Some(StreamError::StreamClosed),
    }
  }
}

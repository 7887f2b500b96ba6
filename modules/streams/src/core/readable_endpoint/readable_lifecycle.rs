use crate::core::StreamError;

/// Data-side lifecycle of a readable endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReadableLifecycle {
  Open,
  /// End of data signalled; buffered chunks remain or end is not emitted yet.
  Ending,
  Ended,
  Errored(StreamError),
  Destroyed,
}

impl ReadableLifecycle {
  /// Returns `true` once end of data was signalled.
  pub(crate) const fn is_eof(&self) -> bool {
    matches!(self, Self::Ending | Self::Ended)
  }

  pub(crate) fn error(&self) -> Option<StreamError> {
    match self {
      | Self::Errored(error) => Some(error.clone()),
      | _ => None,
    }
  }
}

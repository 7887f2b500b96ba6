use core::fmt;

/// Kind of consumer attached to a readable endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerKind {
  /// Chunks are delivered to a data handler (directly or through a pipe).
  Flowing,
  /// Chunks are pulled by a [`StreamIterator`](crate::core::StreamIterator).
  Iterating,
}

impl fmt::Display for ConsumerKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::Flowing => f.write_str("flowing"),
      | Self::Iterating => f.write_str("iterating"),
    }
  }
}

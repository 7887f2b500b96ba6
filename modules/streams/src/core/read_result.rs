use alloc::vec::Vec;

/// Result of a paused-mode read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadResult<T> {
  /// Chunks taken from the head of the buffer, in order.
  Data(Vec<T>),
  /// Nothing is available yet; a `readable` notification follows when data arrives.
  NotReady,
  /// The buffer is drained and end of data was signalled.
  Ended,
}

impl<T> ReadResult<T> {
  /// Returns the chunks, or an empty vector when no data was returned.
  pub fn into_chunks(self) -> Vec<T> {
    match self {
      | Self::Data(chunks) => chunks,
      | Self::NotReady | Self::Ended => Vec::new(),
    }
  }

  /// Returns `true` for [`ReadResult::Ended`].
  #[must_use]
  pub const fn is_ended(&self) -> bool {
    matches!(self, Self::Ended)
  }
}

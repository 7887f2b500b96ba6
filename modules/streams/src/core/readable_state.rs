/// Observable state of a readable endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadableState {
  /// No consumption mode chosen yet and nothing buffered.
  Idle,
  /// Chunks are buffered but no consumption mode was chosen yet.
  Buffering,
  /// Chunks are delivered to the data handler as they arrive.
  Flowing,
  /// Chunks stay buffered until read.
  Paused,
  /// End of data was signalled but buffered chunks remain.
  Ending,
  /// End was emitted.
  Ended,
  /// Destroyed with an error.
  Errored,
  /// Destroyed without an error.
  Destroyed,
}

impl ReadableState {
  /// Returns `true` for states no further data can leave.
  #[must_use]
  pub const fn is_terminal(self) -> bool {
    matches!(self, Self::Ended | Self::Errored | Self::Destroyed)
  }
}

/// Observable state of a writable endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritableState {
  /// Accepting writes below the high-water mark.
  Writable,
  /// Writes are buffered until uncorked.
  Corked,
  /// Pending cost reached the high-water mark; `drain` follows.
  Draining,
  /// `end` was called and buffered writes are flushing.
  Finishing,
  /// Every write completed and `finish` was emitted.
  Finished,
  /// Destroyed with an error.
  Errored,
  /// Destroyed without an error.
  Destroyed,
}

impl WritableState {
  /// Returns `true` for states that accept no further writes.
  #[must_use]
  pub const fn is_terminal(self) -> bool {
    matches!(self, Self::Finished | Self::Errored | Self::Destroyed)
  }
}

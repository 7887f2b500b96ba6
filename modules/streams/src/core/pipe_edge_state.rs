/// State of one source-to-destination pipe edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeEdgeState {
  /// Chunks are forwarded.
  Active,
  /// Waiting for the destination to drain.
  Paused,
  /// The source ended and end was forwarded as configured.
  Ended,
  /// The source or the destination failed.
  Failed,
  /// Removed by unpipe or by the other side closing.
  Detached,
}

impl PipeEdgeState {
  /// Returns `true` once the edge no longer forwards chunks.
  #[must_use]
  pub const fn is_settled(self) -> bool {
    matches!(self, Self::Ended | Self::Failed | Self::Detached)
  }
}

/// Amount of buffered data a read takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReadRequest {
  /// The head chunk.
  Head,
  /// Up to `n` bytes, splitting the last chunk when needed.
  UpTo(usize),
  /// Everything buffered.
  All,
  /// Nothing; only triggers a producer pull.
  Probe,
}

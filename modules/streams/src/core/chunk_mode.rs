/// Accounting mode of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkMode {
  /// Each chunk costs its length in bytes.
  Bytes,
  /// Each chunk costs one unit regardless of content.
  Objects,
}

impl ChunkMode {
  /// Returns `true` for object mode.
  #[must_use]
  pub const fn is_objects(self) -> bool {
    matches!(self, Self::Objects)
  }
}

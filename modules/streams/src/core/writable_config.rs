use super::{ChunkMode, DEFAULT_BYTE_HIGH_WATER_MARK, DEFAULT_OBJECT_HIGH_WATER_MARK};

/// Configuration for [`WritableEndpoint`](crate::core::WritableEndpoint).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WritableConfig {
  high_water_mark: Option<usize>,
  auto_destroy:    bool,
}

impl WritableConfig {
  /// Creates a configuration that uses the mode default high-water mark.
  #[must_use]
  pub const fn new() -> Self {
    Self { high_water_mark: None, auto_destroy: true }
  }

  /// Resolves the high-water mark for `mode`.
  #[must_use]
  pub const fn resolved_high_water_mark(&self, mode: ChunkMode) -> usize {
    match (self.high_water_mark, mode) {
      | (Some(limit), _) => limit,
      | (None, ChunkMode::Bytes) => DEFAULT_BYTE_HIGH_WATER_MARK,
      | (None, ChunkMode::Objects) => DEFAULT_OBJECT_HIGH_WATER_MARK,
    }
  }

  /// Returns whether the endpoint closes itself after finishing.
  #[must_use]
  pub const fn auto_destroy(&self) -> bool {
    self.auto_destroy
  }

  /// Updates the high-water mark.
  #[must_use]
  pub const fn with_high_water_mark(mut self, high_water_mark: usize) -> Self {
    self.high_water_mark = Some(high_water_mark);
    self
  }

  /// Updates the auto-destroy flag.
  #[must_use]
  pub const fn with_auto_destroy(mut self, auto_destroy: bool) -> Self {
    self.auto_destroy = auto_destroy;
    self
  }
}

impl Default for WritableConfig {
  fn default() -> Self {
    Self::new()
  }
}

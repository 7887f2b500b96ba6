//! Readable endpoint configuration.


use super::{ChunkMode, DEFAULT_BYTE_HIGH_WATER_MARK, DEFAULT_OBJECT_HIGH_WATER_MARK};

/// Largest high-water mark a byte-mode read may raise the threshold to.
pub const MAX_HIGH_WATER_MARK: usize = 1 << 30;

/// Configuration for [`ReadableEndpoint`](crate::core::ReadableEndpoint).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadableConfig {
  high_water_mark: Option<usize>,
  auto_destroy:    bool,
}

impl ReadableConfig {
  /// Creates a configuration that uses the mode default high-water mark.
  #[must_use]
  pub const fn new() -> Self {
    Self { high_water_mark: None, auto_destroy: true }
  }

  /// Returns the explicitly configured high-water mark.
  #[must_use]
  pub const fn high_water_mark(&self) -> Option<usize> {
    self.high_water_mark
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

  /// Returns whether the endpoint closes itself after end is emitted.
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

impl Default for ReadableConfig {
  fn default() -> Self {
    Self::new()
  }
}

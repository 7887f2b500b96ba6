#[cfg(test)]
mod tests;

/// Options for a single pipe edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipeOptions {
  propagate_end:   bool,
  propagate_error: bool,
}

impl PipeOptions {
  /// Creates options that propagate both end and errors.
  #[must_use]
  pub const fn new() -> Self {
    Self { propagate_end: true, propagate_error: true }
  }

  /// Returns whether the destination is ended when the source ends.
  #[must_use]
  pub const fn propagate_end(&self) -> bool {
    self.propagate_end
  }

  /// Returns whether the destination is destroyed when the source errors.
  #[must_use]
  pub const fn propagate_error(&self) -> bool {
    self.propagate_error
  }

  /// Updates end propagation.
  #[must_use]
  pub const fn with_propagate_end(mut self, propagate_end: bool) -> Self {
    self.propagate_end = propagate_end;
    self
  }

  /// Updates error propagation.
  #[must_use]
  pub const fn with_propagate_error(mut self, propagate_error: bool) -> Self {
    self.propagate_error = propagate_error;
    self
  }
}

impl Default for PipeOptions {
  fn default() -> Self {
    Self::new()
  }
}

/// Options for [`StreamIterator`](crate::core::StreamIterator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IteratorOptions {
  destroy_on_return: bool,
}

impl IteratorOptions {
  /// Creates options that destroy the source on early return.
  #[must_use]
  pub const fn new() -> Self {
    Self { destroy_on_return: true }
  }

  /// Returns whether an early return destroys the source.
  #[must_use]
  pub const fn destroy_on_return(&self) -> bool {
    self.destroy_on_return
  }

  /// Updates the early-return policy.
  ///
  /// With `false`, an early return only detaches the iterator and the source keeps its buffered
  /// data for another consumer.
  #[must_use]
  pub const fn with_destroy_on_return(mut self, destroy_on_return: bool) -> Self {
    self.destroy_on_return = destroy_on_return;
    self
  }
}

impl Default for IteratorOptions {
  fn default() -> Self {
    Self::new()
  }
}

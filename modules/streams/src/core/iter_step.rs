/// One step of pull-based iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IterStep<T> {
  /// The next chunk in source order.
  Item(T),
  /// Iteration is over; every later step is `Done` too.
  Done,
}

impl<T> IterStep<T> {
  /// Returns the chunk, or `None` for `Done`.
  pub fn into_item(self) -> Option<T> {
    match self {
      | Self::Item(item) => Some(item),
      | Self::Done => None,
    }
  }

  /// Returns `true` for `Done`.
  #[must_use]
  pub const fn is_done(&self) -> bool {
    matches!(self, Self::Done)
  }
}

use super::{Chunk, ChunkMode};

/// Cost and split strategy selected when an endpoint is constructed.
pub(crate) struct ChunkSizing<T> {
  mode:  ChunkMode,
  cost:  fn(&T) -> usize,
  split: Option<fn(&mut T, usize) -> T>,
}

const fn unit_cost<T>(_: &T) -> usize {
  1
}

impl<T> ChunkSizing<T> {
  pub(crate) fn bytes() -> Self
  where
    T: Chunk, {
    Self { mode: ChunkMode::Bytes, cost: T::byte_len, split: Some(T::split_front) }
  }

  pub(crate) fn objects() -> Self {
    Self { mode: ChunkMode::Objects, cost: unit_cost::<T>, split: None }
  }

  pub(crate) const fn mode(&self) -> ChunkMode {
    self.mode
  }

  pub(crate) fn cost(&self, chunk: &T) -> usize {
    (self.cost)(chunk)
  }

  /// Returns the split function; object mode never splits.
  pub(crate) const fn splitter(&self) -> Option<fn(&mut T, usize) -> T> {
    self.split
  }
}

impl<T> Clone for ChunkSizing<T> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T> Copy for ChunkSizing<T> {}

//! Cost-accounted FIFO of chunks.


use alloc::{collections::VecDeque, vec::Vec};

struct QueuedChunk<T> {
  chunk: T,
  cost:  usize,
}

/// Ordered chunk buffer that tracks the summed cost of its entries.
///
/// The cost of every entry is fixed when it is enqueued, so `total_cost` always equals the sum of
/// the entries currently held.
pub struct ChunkQueue<T> {
  entries:    VecDeque<QueuedChunk<T>>,
  total_cost: usize,
}

impl<T> ChunkQueue<T> {
  /// Creates an empty queue.
  #[must_use]
  pub const fn new() -> Self {
    Self { entries: VecDeque::new(), total_cost: 0 }
  }

  /// Appends a chunk at the tail.
  pub fn push(&mut self, chunk: T, cost: usize) {
    self.total_cost += cost;
    self.entries.push_back(QueuedChunk { chunk, cost });
  }

  /// Prepends a chunk at the head.
  pub fn unshift(&mut self, chunk: T, cost: usize) {
    self.total_cost += cost;
    self.entries.push_front(QueuedChunk { chunk, cost });
  }

  /// Removes the head chunk.
  pub fn shift(&mut self) -> Option<T> {
    self.shift_with_cost().map(|(chunk, _)| chunk)
  }

  /// Removes the head chunk together with the cost it was accounted at.
  pub fn shift_with_cost(&mut self) -> Option<(T, usize)> {
    let entry = self.entries.pop_front()?;
    self.total_cost -= entry.cost;
    Some((entry.chunk, entry.cost))
  }

  /// Returns the summed cost of all queued chunks.
  #[must_use]
  pub const fn total_cost(&self) -> usize {
    self.total_cost
  }

  /// Returns the cost of the head chunk.
  #[must_use]
  pub fn head_cost(&self) -> Option<usize> {
    self.entries.front().map(|entry| entry.cost)
  }

  /// Splits `at` cost units off the head chunk and returns them.
  ///
  /// Returns `None` when the queue is empty or `at` does not fall strictly inside the head chunk.
  pub fn split_head(&mut self, at: usize, split: impl FnOnce(&mut T, usize) -> T) -> Option<T> {
    let head = self.entries.front_mut()?;
    if at == 0 || at >= head.cost {
      return None;
    }
    let front = split(&mut head.chunk, at);
    head.cost -= at;
    self.total_cost -= at;
    Some(front)
  }

  /// Removes every chunk in order.
  pub fn drain_all(&mut self) -> Vec<T> {
    self.total_cost = 0;
    self.entries.drain(..).map(|entry| entry.chunk).collect()
  }

  /// Drops every chunk.
  pub fn clear(&mut self) {
    self.entries.clear();
    self.total_cost = 0;
  }

  /// Returns the number of queued chunks.
  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns `true` when nothing is queued.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl<T> Default for ChunkQueue<T> {
  fn default() -> Self {
    Self::new()
  }
}

//! Byte-sized chunk abstraction.

#[cfg(test)]
mod tests;

use alloc::vec::Vec;

/// Chunk whose cost is its length in bytes.
///
/// Byte-mode endpoints account for queued data with [`byte_len`](Self::byte_len) and may split the
/// head chunk when a read asks for fewer bytes than it holds.
pub trait Chunk: Sized {
  /// Returns the number of bytes held by the chunk.
  fn byte_len(&self) -> usize;

  /// Removes and returns the first `at` bytes, leaving the remainder in `self`.
  ///
  /// Callers guarantee `at <= self.byte_len()`.
  #[must_use]
  fn split_front(&mut self, at: usize) -> Self;
}

impl Chunk for Vec<u8> {
  fn byte_len(&self) -> usize {
    self.len()
  }

  fn split_front(&mut self, at: usize) -> Self {
    let tail = self.split_off(at);
    core::mem::replace(self, tail)
  }
}

use alloc::vec::Vec;

use crate::core::WriteCallback;

/// Write (or batch) handed to the consumer and not completed yet.
pub(crate) struct InFlightWrite {
  /// Sequence number matched against the completion; stale completions are dropped.
  pub(crate) seq:       u64,
  pub(crate) cost:      usize,
  pub(crate) callbacks: Vec<WriteCallback>,
}

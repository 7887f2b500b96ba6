use alloc::vec::Vec;

use crate::core::{StreamError, WriteCallback, listener_list::Listener};

/// What to do once an in-flight write completed.
pub(crate) enum WriteOutcome {
  /// The endpoint was destroyed meanwhile; callbacks fail with its close reason.
  Discarded { callbacks: Vec<WriteCallback>, error: StreamError },
  Failed { callbacks: Vec<WriteCallback>, error: StreamError },
  Completed { callbacks: Vec<WriteCallback>, drain: Vec<Listener<()>> },
}

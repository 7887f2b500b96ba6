use alloc::{collections::VecDeque, vec::Vec};

use sluice_utils_rs::core::sync::SettleOnce;

use crate::core::{IterStep, IteratorOptions, ListenerId, ReadableEndpoint, StreamError};

pub(crate) type NextSlot<T> = SettleOnce<Result<IterStep<T>, StreamError>>;

/// Mutable state behind a [`StreamIterator`](crate::core::StreamIterator).
pub(crate) struct IteratorCore<T> {
  pub(super) source:         ReadableEndpoint<T>,
  pub(super) options:        IteratorOptions,
  /// Unresolved `next` requests, oldest first.
  pub(super) pending:        VecDeque<NextSlot<T>>,
  pub(super) return_waiters: Vec<NextSlot<T>>,
  pub(super) error:          Option<StreamError>,
  pub(super) ended:          bool,
  pub(super) returned:       bool,
  pub(super) detached:       bool,
  pub(super) servicing:      bool,
  pub(super) listeners:      Vec<ListenerId>,
}

impl<T> IteratorCore<T> {
  pub(super) const fn new(source: ReadableEndpoint<T>, options: IteratorOptions) -> Self {
    Self {
      source,
      options,
      pending: VecDeque::new(),
      return_waiters: Vec::new(),
      error: None,
      ended: false,
      returned: false,
      detached: false,
      servicing: false,
      listeners: Vec::new(),
    }
  }

  /// Returns the step every request receives once iteration is over.
  pub(super) fn terminal_step(&self) -> Option<Result<IterStep<T>, StreamError>> {
    match &self.error {
      | Some(error) if !self.returned => Some(Err(error.clone())),
      | _ if self.ended || self.returned || self.error.is_some() => Some(Ok(IterStep::Done)),
      | _ => None,
    }
  }
}

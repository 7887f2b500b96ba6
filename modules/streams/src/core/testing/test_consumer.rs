
use alloc::{collections::VecDeque, vec::Vec};
use core::mem;

use sluice_utils_rs::core::sync::{LocalShared, SharedAccess};

use crate::core::{Consumer, DoneCallback, StreamError};

struct ConsumerRecord<T> {
  written:     Vec<T>,
  batches:     Vec<usize>,
  manual:      bool,
  batching:    bool,
  held:        VecDeque<DoneCallback>,
  fail_at:     Option<(usize, StreamError)>,
  final_error: Option<StreamError>,
  final_calls: usize,
  destroyed:   Option<Option<StreamError>>,
}

/// Recording consumer with scriptable completions.
///
/// By default every write completes immediately. In manual mode completions are held until the
/// test releases them with [`complete_next`](Self::complete_next). Clones share the record.
pub struct TestConsumer<T> {
  inner: LocalShared<ConsumerRecord<T>>,
}

impl<T> TestConsumer<T> {
  /// Creates a consumer that completes every write immediately.
  #[must_use]
  pub fn new() -> Self {
    Self {
      inner: LocalShared::new(ConsumerRecord {
        written:     Vec::new(),
        batches:     Vec::new(),
        manual:      false,
        batching:    false,
        held:        VecDeque::new(),
        fail_at:     None,
        final_error: None,
        final_calls: 0,
        destroyed:   None,
      }),
    }
  }

  /// Creates a consumer that holds completions until released.
  #[must_use]
  pub fn manual() -> Self {
    let consumer = Self::new();
    consumer.inner.with_write(|record| record.manual = true);
    consumer
  }

  /// Accepts batched writes.
  #[must_use]
  pub fn with_batching(self) -> Self {
    self.inner.with_write(|record| record.batching = true);
    self
  }

  /// Fails the write of the chunk at `index` (zero based) with `error`.
  #[must_use]
  pub fn with_write_failure_at(self, index: usize, error: StreamError) -> Self {
    self.inner.with_write(|record| record.fail_at = Some((index, error)));
    self
  }

  /// Fails the final flush with `error`.
  #[must_use]
  pub fn with_final_error(self, error: StreamError) -> Self {
    self.inner.with_write(|record| record.final_error = Some(error));
    self
  }

  /// Settles the oldest held completion. Returns `false` when none was held.
  pub fn complete_next(&self, result: Result<(), StreamError>) -> bool {
    match self.inner.with_write(|record| record.held.pop_front()) {
      | Some(done) => {
        done.complete(result);
        true
      },
      | None => false,
    }
  }

  /// Settles every held completion successfully and returns how many there were.
  pub fn complete_all(&self) -> usize {
    let mut completed = 0;
    while self.complete_next(Ok(())) {
      completed += 1;
    }
    completed
  }

  /// Returns the number of held completions.
  #[must_use]
  pub fn held_completions(&self) -> usize {
    self.inner.with_read(|record| record.held.len())
  }

  /// Returns the number of chunks received so far.
  #[must_use]
  pub fn write_count(&self) -> usize {
    self.inner.with_read(|record| record.written.len())
  }

  /// Returns the size of every batch received.
  #[must_use]
  pub fn batches(&self) -> Vec<usize> {
    self.inner.with_read(|record| record.batches.clone())
  }

  /// Returns how many times the final flush ran.
  #[must_use]
  pub fn final_calls(&self) -> usize {
    self.inner.with_read(|record| record.final_calls)
  }

  /// Returns the destroy reason once the destroy hook ran.
  #[must_use]
  pub fn destroyed(&self) -> Option<Option<StreamError>> {
    self.inner.with_read(|record| record.destroyed.clone())
  }

  fn settle(&self, done: DoneCallback, failure: Option<StreamError>) {
    if let Some(error) = failure {
      done.fail(error);
      return;
    }
    let held = self.inner.with_write(|record| {
      if record.manual {
        record.held.push_back(done);
        None
      } else {
        Some(done)
      }
    });
    if let Some(done) = held {
      done.succeed();
    }
  }

  fn record(&self, chunks: impl IntoIterator<Item = T>) -> Option<StreamError> {
    self.inner.with_write(|record| {
      let start = record.written.len();
      record.written.extend(chunks);
      match &record.fail_at {
        | Some((index, error)) if (start..record.written.len()).contains(index) => Some(error.clone()),
        | _ => None,
      }
    })
  }
}

impl<T: Clone> TestConsumer<T> {
  /// Returns every chunk received so far, in arrival order.
  #[must_use]
  pub fn written(&self) -> Vec<T> {
    self.inner.with_read(|record| record.written.clone())
  }
}

impl<T> Consumer<T> for TestConsumer<T> {
  fn on_write(&mut self, chunk: T, done: DoneCallback) {
    let failure = self.record([chunk]);
    self.settle(done, failure);
  }

  fn supports_batch(&self) -> bool {
    self.inner.with_read(|record| record.batching)
  }

  fn on_writev(&mut self, chunks: Vec<T>, done: DoneCallback) {
    let size = chunks.len();
    self.inner.with_write(|record| record.batches.push(size));
    let failure = self.record(chunks);
    self.settle(done, failure);
  }

  fn on_final(&mut self, done: DoneCallback) {
    let failure = self.inner.with_write(|record| {
      record.final_calls += 1;
      record.final_error.clone()
    });
    match failure {
      | Some(error) => done.fail(error),
      | None => done.succeed(),
    }
  }

  fn on_destroy(&mut self, reason: Option<&StreamError>, done: DoneCallback) {
    let held = self.inner.with_write(|record| {
      record.destroyed = Some(reason.cloned());
      mem::take(&mut record.held)
    });
    drop(held);
    done.succeed();
  }
}

impl<T> Clone for TestConsumer<T> {
  fn clone(&self) -> Self {
    Self { inner: self.inner.clone() }
  }
}

impl<T> Default for TestConsumer<T> {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests;

use alloc::collections::VecDeque;

use sluice_utils_rs::core::sync::{LocalShared, SharedAccess};

use crate::core::{DoneCallback, Producer, PushHandle, StreamError};

struct ProducerScript<T> {
  items:           VecDeque<T>,
  chunks_per_pull: usize,
  end_when_empty:  bool,
  failure:         Option<StreamError>,
  destroy_error:   Option<StreamError>,
  hold_destroy:    bool,
  held_done:       Option<DoneCallback>,
  pulls:           usize,
  destroyed:       Option<Option<StreamError>>,
}

/// Scripted producer that serves queued items on each pull.
///
/// Clones share the script, so a test keeps one handle for inspection while the endpoint owns the
/// other.
pub struct TestProducer<T> {
  inner: LocalShared<ProducerScript<T>>,
}

impl<T> TestProducer<T> {
  /// Creates a producer serving `items`, one per pull, then signalling end.
  #[must_use]
  pub fn new(items: impl IntoIterator<Item = T>) -> Self {
    Self {
      inner: LocalShared::new(ProducerScript {
        items:           items.into_iter().collect(),
        chunks_per_pull: 1,
        end_when_empty:  true,
        failure:         None,
        destroy_error:   None,
        hold_destroy:    false,
        held_done:       None,
        pulls:           0,
        destroyed:       None,
      }),
    }
  }

  /// Serves up to `count` items per pull, stopping early on backpressure.
  #[must_use]
  pub fn with_chunks_per_pull(self, count: usize) -> Self {
    self.inner.with_write(|script| script.chunks_per_pull = count.max(1));
    self
  }

  /// Keeps the stream open once the items are exhausted.
  #[must_use]
  pub fn without_end(self) -> Self {
    self.inner.with_write(|script| script.end_when_empty = false);
    self
  }

  /// Fails the endpoint with `error` instead of ending it.
  #[must_use]
  pub fn with_failure(self, error: StreamError) -> Self {
    self.inner.with_write(|script| script.failure = Some(error));
    self
  }

  /// Reports `error` from the destroy hook.
  #[must_use]
  pub fn with_destroy_error(self, error: StreamError) -> Self {
    self.inner.with_write(|script| script.destroy_error = Some(error));
    self
  }

  /// Holds the destroy completion until [`release_destroy`](Self::release_destroy).
  #[must_use]
  pub fn holding_destroy(self) -> Self {
    self.inner.with_write(|script| script.hold_destroy = true);
    self
  }

  /// Appends more items to serve.
  pub fn enqueue(&self, item: T) {
    self.inner.with_write(|script| script.items.push_back(item));
  }

  /// Settles a held destroy completion. Returns `false` when none was held.
  pub fn release_destroy(&self) -> bool {
    match self.inner.with_write(|script| script.held_done.take()) {
      | Some(done) => {
        done.succeed();
        true
      },
      | None => false,
    }
  }

  /// Returns how many times the producer was pulled.
  #[must_use]
  pub fn pulls(&self) -> usize {
    self.inner.with_read(|script| script.pulls)
  }

  /// Returns how many items are left to serve.
  #[must_use]
  pub fn remaining(&self) -> usize {
    self.inner.with_read(|script| script.items.len())
  }

  /// Returns the destroy reason once the destroy hook ran.
  #[must_use]
  pub fn destroyed(&self) -> Option<Option<StreamError>> {
    self.inner.with_read(|script| script.destroyed.clone())
  }
}

impl<T: 'static> Producer<T> for TestProducer<T> {
  fn on_pull(&mut self, _requested: usize, handle: &PushHandle<T>) {
    let chunks_per_pull = self.inner.with_write(|script| {
      script.pulls += 1;
      script.chunks_per_pull
    });
    for _ in 0..chunks_per_pull {
      let Some(item) = self.inner.with_write(|script| script.items.pop_front()) else {
        break;
      };
      if !matches!(handle.push(item), Ok(true)) {
        return;
      }
    }
    let (exhausted, end, failure) =
      self.inner.with_read(|script| (script.items.is_empty(), script.end_when_empty, script.failure.clone()));
    if !exhausted {
      return;
    }
    match failure {
      | Some(error) => handle.fail(error),
      | None if end => {
        let _ = handle.push_end();
      },
      | None => {},
    }
  }

  fn on_destroy(&mut self, reason: Option<&StreamError>, done: DoneCallback) {
    let (hold, error) = self.inner.with_write(|script| {
      script.destroyed = Some(reason.cloned());
      (script.hold_destroy, script.destroy_error.clone())
    });
    match (hold, error) {
      | (true, _) => self.inner.with_write(|script| script.held_done = Some(done)),
      | (false, Some(error)) => done.fail(error),
      | (false, None) => done.succeed(),
    }
  }
}

impl<T> Clone for TestProducer<T> {
  fn clone(&self) -> Self {
    Self { inner: self.inner.clone() }
  }
}

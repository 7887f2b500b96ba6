//! Pull-based iteration over a readable endpoint.

mod iterator_core;

#[cfg(test)]
mod tests;

use alloc::vec::Vec;
use core::{
  future::Future,
  mem,
  pin::Pin,
  task::{Context, Poll},
};

use futures_core::Stream;
use iterator_core::{IteratorCore, NextSlot};
use sluice_utils_rs::core::sync::{LocalShared, LocalWeak, SettleOnce, SharedAccess};
use tracing::{debug, trace};

use super::{Deferred, IterStep, IteratorOptions, ReadRequest, ReadResult, ReadableEndpoint, StreamError};

/// Result a `next` request settles with.
pub type NextResult<T> = Result<IterStep<T>, StreamError>;

/// Requests values one at a time from a readable endpoint.
///
/// Every [`next`](Self::next) call settles exactly once and calls settle in call order, no matter
/// how many `readable` notifications arrive in between. While attached the iterator owns the
/// endpoint's consumer slot.
pub struct StreamIterator<T: 'static> {
  driver:  Driver<T>,
  polling: Option<Deferred<NextResult<T>>>,
  fused:   bool,
}

/// Shared iteration logic; listener callbacks hold it through weak references.
struct Driver<T> {
  inner: LocalShared<IteratorCore<T>>,
}

impl<T: 'static> StreamIterator<T> {
  /// Attaches a new iterator to `source`.
  ///
  /// # Errors
  ///
  /// Fails with [`StreamError::ModeConflict`] when another consumer is attached.
  pub fn new(source: &ReadableEndpoint<T>, options: IteratorOptions) -> Result<Self, StreamError> {
    source.attach_iterator()?;
    let inner = LocalShared::new(IteratorCore::new(source.clone(), options));
    let weak = inner.downgrade();
    let listeners = [
      source.on_readable(Driver::notify(&weak, |driver| driver.service())),
      source.on_end(Driver::notify(&weak, |driver| {
        driver.inner.with_write(|core| core.ended = true);
        driver.service();
      })),
      source.on_error({
        let weak = weak.clone();
        move |error: &StreamError| {
          if let Some(inner) = weak.upgrade() {
            Driver { inner }.on_source_error(error);
          }
        }
      }),
      source.on_close(Driver::notify(&weak, |driver| driver.on_source_close())),
    ];
    inner.with_write(|core| core.listeners.extend(listeners));
    trace!(endpoint = %source.id(), "iterator attached");
    Ok(Self { driver: Driver { inner }, polling: None, fused: false })
  }

  /// Requests the next value.
  ///
  /// Resolves right away when a value is buffered or iteration is over; otherwise it queues behind
  /// earlier unresolved requests.
  pub fn next(&self) -> Deferred<NextResult<T>> {
    self.driver.next()
  }

  /// Ends iteration early.
  ///
  /// Pending requests settle with `Done`. With `destroy_on_return` the source is destroyed with
  /// `reason` and the returned value settles once its cleanup finished; otherwise the iterator
  /// only detaches.
  pub fn return_early(&self, reason: Option<StreamError>) -> Deferred<NextResult<T>> {
    self.driver.return_early(reason)
  }

  /// Returns `true` once the iterator no longer listens to its source.
  #[must_use]
  pub fn is_detached(&self) -> bool {
    self.driver.inner.with_read(|core| core.detached)
  }

  /// Returns the number of unresolved `next` requests.
  #[must_use]
  pub fn pending_requests(&self) -> usize {
    self.driver.inner.with_read(|core| core.pending.len())
  }
}

impl<T: 'static> Driver<T> {
  fn notify(weak: &LocalWeak<IteratorCore<T>>, then: impl Fn(&Self) + 'static) -> impl Fn() + 'static {
    let weak = weak.clone();
    move || {
      if let Some(inner) = weak.upgrade() {
        then(&Self { inner });
      }
    }
  }

  fn next(&self) -> Deferred<NextResult<T>> {
    let slot = SettleOnce::new();
    let deferred = Deferred::new(slot.clone());
    let queued = self.inner.with_write(|core| {
      if core.pending.is_empty() {
        return false;
      }
      core.pending.push_back(slot.clone());
      true
    });
    if queued {
      return deferred;
    }
    match self.try_resolve() {
      | Some(result) => {
        slot.settle(result);
      },
      | None => self.inner.with_write(|core| core.pending.push_back(slot)),
    }
    deferred
  }

  fn return_early(&self, reason: Option<StreamError>) -> Deferred<NextResult<T>> {
    let slot = SettleOnce::new();
    let deferred = Deferred::new(slot.clone());
    let (pending, source, destroy) = self.inner.with_write(|core| {
      core.returned = true;
      let pending: Vec<NextSlot<T>> = core.pending.drain(..).collect();
      let destroy = !core.detached && core.options.destroy_on_return() && !core.source.close_emitted();
      if destroy {
        core.return_waiters.push(slot.clone());
      }
      (pending, core.source.clone(), destroy)
    });
    for waiter in pending {
      waiter.settle(Ok(IterStep::Done));
    }
    if destroy {
      debug!(endpoint = %source.id(), "iterator returned early, destroying source");
      source.destroy(reason);
    } else {
      self.detach();
      slot.settle(Ok(IterStep::Done));
    }
    deferred
  }

  fn try_resolve(&self) -> Option<NextResult<T>> {
    let source = self.inner.with_read(|core| match core.terminal_step() {
      | Some(step) => Err(step),
      | None => Ok(core.source.clone()),
    });
    let source = match source {
      | Ok(source) => source,
      | Err(step) => return Some(step),
    };
    match source.read_internal(ReadRequest::Head) {
      | Ok(ReadResult::Data(chunks)) => chunks.into_iter().next().map(|chunk| Ok(IterStep::Item(chunk))),
      | Ok(ReadResult::NotReady) => None,
      | Ok(ReadResult::Ended) => {
        self.inner.with_write(|core| core.ended = true);
        self.detach();
        Some(Ok(IterStep::Done))
      },
      | Err(StreamError::StreamClosed) => Some(Err(self.record_error(StreamError::PrematureClose))),
      | Err(error) => Some(Err(self.record_error(error))),
    }
  }

  /// Settles as many queued requests as the buffer allows, oldest first.
  fn service(&self) {
    let reentered = self.inner.with_write(|core| mem::replace(&mut core.servicing, true));
    if reentered {
      return;
    }
    while let Some(front) = self.inner.with_read(|core| core.pending.front().cloned()) {
      let Some(result) = self.try_resolve() else {
        break;
      };
      self.inner.with_write(|core| core.pending.pop_front());
      front.settle(result);
    }
    self.inner.with_write(|core| core.servicing = false);
  }

  fn record_error(&self, error: StreamError) -> StreamError {
    let recorded = self.inner.with_write(|core| core.error.get_or_insert(error).clone());
    self.detach();
    recorded
  }

  fn on_source_error(&self, error: &StreamError) {
    let returned = self.inner.with_read(|core| core.returned);
    if !returned {
      trace!(%error, "iterator observed source error");
      self.record_error(error.clone());
    }
    self.service();
  }

  fn on_source_close(&self) {
    let premature = self.inner.with_write(|core| {
      let premature = !core.ended && !core.returned && core.error.is_none();
      if premature {
        core.error = Some(StreamError::PrematureClose);
      }
      premature
    });
    if premature {
      debug!("source closed before end, failing pending iterations");
    }
    self.service();
    let waiters = self.inner.with_write(|core| mem::take(&mut core.return_waiters));
    for waiter in waiters {
      waiter.settle(Ok(IterStep::Done));
    }
    self.detach();
  }

  fn detach(&self) {
    let released = self.inner.with_write(|core| {
      if core.detached {
        return None;
      }
      core.detached = true;
      Some((mem::take(&mut core.listeners), core.source.clone()))
    });
    let Some((listeners, source)) = released else {
      return;
    };
    for id in listeners {
      source.remove_listener(id);
    }
    source.release_iterator();
    trace!(endpoint = %source.id(), "iterator detached");
  }
}

impl<T: 'static> Stream for StreamIterator<T> {
  type Item = NextResult<T>;

  fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    let this = self.get_mut();
    if this.fused {
      return Poll::Ready(None);
    }
    let mut request = match this.polling.take() {
      | Some(request) => request,
      | None => this.next(),
    };
    match Pin::new(&mut request).poll(cx) {
      | Poll::Pending => {
        this.polling = Some(request);
        Poll::Pending
      },
      | Poll::Ready(Ok(IterStep::Item(chunk))) => Poll::Ready(Some(Ok(IterStep::Item(chunk)))),
      | Poll::Ready(Ok(IterStep::Done)) => {
        this.fused = true;
        Poll::Ready(None)
      },
      | Poll::Ready(Err(error)) => {
        this.fused = true;
        Poll::Ready(Some(Err(error)))
      },
    }
  }
}

impl<T: 'static> Drop for StreamIterator<T> {
  fn drop(&mut self) {
    let waiters = self.driver.inner.with_write(|core| {
      core.returned = true;
      core.pending.drain(..).chain(core.return_waiters.drain(..)).collect::<Vec<NextSlot<T>>>()
    });
    for waiter in waiters {
      waiter.settle(Ok(IterStep::Done));
    }
    self.driver.detach();
  }
}

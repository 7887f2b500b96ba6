//! Writable endpoint: buffers writes and feeds them to a consumer one at a time.

mod delivery;
mod in_flight_write;
mod pending_write;
mod writable_core;
mod writable_lifecycle;
mod write_outcome;

#[cfg(test)]
mod tests;

use alloc::{boxed::Box, rc::Rc, vec::Vec};

use delivery::Delivery;
use in_flight_write::InFlightWrite;
use pending_write::PendingWrite;
use sluice_utils_rs::core::sync::{LocalShared, SharedAccess};
use tracing::{debug, trace, warn};
pub(crate) use writable_core::WritableCore;
use writable_lifecycle::WritableLifecycle;
use write_outcome::WriteOutcome;

use super::{
  Chunk, ChunkMode, ChunkSizing, Consumer, DoneCallback, EndpointId, ListenerId, Scheduler, StreamError,
  WeakWritable, WritableConfig, WritableState, close_step::CloseStep,
};

/// Completion callback of a single write.
pub type WriteCallback = Box<dyn FnOnce(Result<(), StreamError>)>;

/// Handle to a buffered sink of chunks.
///
/// Writes are handed to the [`Consumer`] strictly in order and one at a time (or as one batch when
/// the consumer supports it). [`write`](Self::write) returns `false` once the pending cost reaches
/// the high-water mark; `drain` is emitted after the backlog has been flushed.
pub struct WritableEndpoint<T> {
  inner:     LocalShared<WritableCore<T>>,
  scheduler: Scheduler,
}

impl<T: 'static> WritableEndpoint<T> {
  /// Creates a byte-mode endpoint where a chunk costs its length.
  #[must_use]
  pub fn bytes(scheduler: &Scheduler, config: WritableConfig, consumer: impl Consumer<T> + 'static) -> Self
  where
    T: Chunk, {
    Self::with_sizing(scheduler, config, ChunkSizing::bytes(), Box::new(consumer))
  }

  /// Creates an object-mode endpoint where every chunk costs one unit.
  #[must_use]
  pub fn objects(scheduler: &Scheduler, config: WritableConfig, consumer: impl Consumer<T> + 'static) -> Self {
    Self::with_sizing(scheduler, config, ChunkSizing::objects(), Box::new(consumer))
  }

  fn with_sizing(
    scheduler: &Scheduler,
    config: WritableConfig,
    sizing: ChunkSizing<T>,
    consumer: Box<dyn Consumer<T>>,
  ) -> Self {
    let id = EndpointId::next();
    let high_water_mark = config.resolved_high_water_mark(sizing.mode());
    trace!(endpoint = %id, high_water_mark, "writable endpoint created");
    Self {
      inner:     LocalShared::new(WritableCore::new(id, sizing, high_water_mark, config.auto_destroy(), consumer)),
      scheduler: scheduler.clone(),
    }
  }

  pub(crate) const fn from_parts(inner: LocalShared<WritableCore<T>>, scheduler: Scheduler) -> Self {
    Self { inner, scheduler }
  }

  /// Queues `chunk` and returns whether the caller may keep writing.
  ///
  /// A rejected write (after `end`, after an error or after destroy) reports its error through
  /// `callback` right away and returns `false`.
  pub fn write(&self, chunk: T, callback: impl FnOnce(Result<(), StreamError>) + 'static) -> bool {
    let callback: WriteCallback = Box::new(callback);
    let admitted = self.inner.with_write(move |core| match core.lifecycle.write_rejection() {
      | Some(error) => Err((error, callback)),
      | None => Ok(core.enqueue(chunk, callback)),
    });
    match admitted {
      | Ok(below) => {
        self.clear_buffer();
        below && !self.is_closed()
      },
      | Err((error, callback)) => {
        trace!(endpoint = %self.id(), %error, "write rejected");
        callback(Err(error));
        false
      },
    }
  }

  /// Signals that no more data will be written, optionally writing `final_chunk` first.
  ///
  /// `finish` is emitted once every write completed and the consumer flushed. Ending also uncorks.
  /// Calling `end` again without a chunk while finishing is a no-op.
  ///
  /// # Errors
  ///
  /// Fails with [`StreamError::AlreadyFinished`] after `finish`, with
  /// [`StreamError::WriteAfterEnd`] when a chunk is passed while finishing, and with the sticky error
  /// or [`StreamError::StreamClosed`] once destroyed.
  pub fn end(&self, final_chunk: Option<T>) -> Result<(), StreamError> {
    let first = self.inner.with_read(|core| match &core.lifecycle {
      | WritableLifecycle::Open => Ok(true),
      | WritableLifecycle::Ending if final_chunk.is_none() => Ok(false),
      | WritableLifecycle::Ending => Err(StreamError::WriteAfterEnd),
      | WritableLifecycle::Finished => Err(StreamError::AlreadyFinished),
      | WritableLifecycle::Errored(error) => Err(error.clone()),
      | WritableLifecycle::Destroyed => Err(StreamError::StreamClosed),
    })?;
    if !first {
      return Ok(());
    }
    if let Some(chunk) = final_chunk {
      self.write(chunk, |_| {});
    }
    self.inner.with_write(|core| {
      if core.lifecycle == WritableLifecycle::Open {
        core.lifecycle = WritableLifecycle::Ending;
        core.cork_count = 0;
      }
    });
    debug!(endpoint = %self.id(), pending = self.pending_cost(), "writable ending");
    self.clear_buffer();
    self.maybe_finish();
    Ok(())
  }

  /// Holds writes in the buffer until a matching [`uncork`](Self::uncork).
  pub fn cork(&self) {
    self.inner.with_write(|core| {
      if core.lifecycle == WritableLifecycle::Open {
        core.cork_count += 1;
      }
    });
  }

  /// Releases one cork; the buffer flushes when none remain.
  pub fn uncork(&self) {
    let released = self.inner.with_write(|core| {
      if core.cork_count == 0 {
        return false;
      }
      core.cork_count -= 1;
      core.cork_count == 0
    });
    if released {
      self.clear_buffer();
    }
  }

  /// Destroys the endpoint and fails every buffered or in-flight write.
  ///
  /// With a reason the endpoint becomes errored and `error` is emitted before `close`. Only the
  /// first call has any effect.
  pub fn destroy(&self, reason: Option<StreamError>) {
    let step = self.inner.with_write(|core| {
      if core.closed {
        return None;
      }
      core.lifecycle = match &reason {
        | Some(error) => WritableLifecycle::Errored(error.clone()),
        | None => WritableLifecycle::Destroyed,
      };
      let callbacks = core.take_all_callbacks();
      Some((callbacks, core.begin_close()))
    });
    let Some((callbacks, step)) = step else {
      trace!(endpoint = %self.id(), "destroy ignored, already closed");
      return;
    };
    match &reason {
      | Some(error) => debug!(endpoint = %self.id(), %error, failed = callbacks.len(), "writable destroyed with error"),
      | None => debug!(endpoint = %self.id(), failed = callbacks.len(), "writable destroyed"),
    }
    let failure = reason.clone().unwrap_or(StreamError::StreamClosed);
    for callback in callbacks {
      callback(Err(failure.clone()));
    }
    self.run_close_step(step, reason);
  }

  /// Registers a listener for `drain`.
  pub fn on_drain(&self, listener: impl Fn() + 'static) -> ListenerId {
    self.inner.with_write(|core| core.drain_listeners.add(Rc::new(move |_: &()| listener()), false))
  }

  /// Registers a listener for `finish`.
  pub fn on_finish(&self, listener: impl Fn() + 'static) -> ListenerId {
    self.inner.with_write(|core| core.finish_listeners.add(Rc::new(move |_: &()| listener()), false))
  }

  /// Registers a listener for `error`.
  pub fn on_error(&self, listener: impl Fn(&StreamError) + 'static) -> ListenerId {
    self.inner.with_write(|core| core.error_listeners.add(Rc::new(listener), false))
  }

  /// Registers a listener for `close`, the last event an endpoint emits.
  pub fn on_close(&self, listener: impl Fn() + 'static) -> ListenerId {
    self.inner.with_write(|core| core.close_listeners.add(Rc::new(move |_: &()| listener()), false))
  }

  /// Removes a listener registered on any event.
  pub fn remove_listener(&self, id: ListenerId) -> bool {
    self.inner.with_write(|core| {
      core.drain_listeners.remove(id)
        || core.finish_listeners.remove(id)
        || core.error_listeners.remove(id)
        || core.close_listeners.remove(id)
    })
  }

  /// Returns the endpoint identifier.
  #[must_use]
  pub fn id(&self) -> EndpointId {
    self.inner.with_read(|core| core.id)
  }

  /// Returns the observable state.
  #[must_use]
  pub fn state(&self) -> WritableState {
    self.inner.with_read(WritableCore::state)
  }

  /// Returns the sticky error, if any.
  #[must_use]
  pub fn error(&self) -> Option<StreamError> {
    self.inner.with_read(|core| core.lifecycle.error())
  }

  /// Returns the cost of buffered plus in-flight writes.
  #[must_use]
  pub fn pending_cost(&self) -> usize {
    self.inner.with_read(|core| core.pending_cost)
  }

  /// Returns the number of buffered writes not yet handed to the consumer.
  #[must_use]
  pub fn buffered_writes(&self) -> usize {
    self.inner.with_read(|core| core.buffer.len())
  }

  /// Returns the high-water mark.
  #[must_use]
  pub fn high_water_mark(&self) -> usize {
    self.inner.with_read(|core| core.high_water_mark)
  }

  /// Returns the accounting mode.
  #[must_use]
  pub fn mode(&self) -> ChunkMode {
    self.inner.with_read(|core| core.sizing.mode())
  }

  /// Returns `true` when every chunk costs one unit.
  #[must_use]
  pub fn is_object_mode(&self) -> bool {
    self.mode().is_objects()
  }

  /// Returns the number of outstanding corks.
  #[must_use]
  pub fn cork_count(&self) -> usize {
    self.inner.with_read(|core| core.cork_count)
  }

  /// Returns `true` while a `drain` is owed to writers that saw `false`.
  #[must_use]
  pub fn need_drain(&self) -> bool {
    self.inner.with_read(|core| core.need_drain)
  }

  /// Returns `true` once `end` was called.
  #[must_use]
  pub fn is_ending(&self) -> bool {
    self.inner.with_read(|core| !matches!(core.lifecycle, WritableLifecycle::Open))
  }

  /// Returns `true` once `finish` was emitted.
  #[must_use]
  pub fn is_finished(&self) -> bool {
    self.inner.with_read(|core| core.lifecycle == WritableLifecycle::Finished)
  }

  /// Returns `true` once destroy started, explicitly or after finish.
  #[must_use]
  pub fn is_closed(&self) -> bool {
    self.inner.with_read(|core| core.closed)
  }

  /// Returns `true` once `close` was emitted.
  #[must_use]
  pub fn close_emitted(&self) -> bool {
    self.inner.with_read(|core| core.close_emitted)
  }

  /// Returns the scheduler the endpoint runs on.
  #[must_use]
  pub const fn scheduler(&self) -> &Scheduler {
    &self.scheduler
  }

  /// Returns `true` when both handles refer to the same endpoint.
  #[must_use]
  pub fn ptr_eq(&self, other: &Self) -> bool {
    self.inner.ptr_eq(&other.inner)
  }

  pub(crate) fn downgrade(&self) -> WeakWritable<T> {
    WeakWritable::new(self.inner.downgrade(), self.scheduler.clone())
  }

  /// Fails when a new write would be rejected.
  pub(crate) fn check_writable(&self) -> Result<(), StreamError> {
    self.inner.with_read(|core| core.lifecycle.write_rejection()).map_or(Ok(()), Err)
  }

  fn clear_buffer(&self) {
    let Some((mut consumer, delivery, seq)) = self.inner.with_write(WritableCore::begin_dispatch) else {
      return;
    };
    let done = self.completion(move |endpoint, result| endpoint.after_write(seq, result));
    match delivery {
      | Delivery::Single(chunk) => consumer.on_write(chunk, done),
      | Delivery::Batch(chunks) => {
        trace!(endpoint = %self.id(), chunks = chunks.len(), "dispatching batched write");
        consumer.on_writev(chunks, done);
      },
    }
    self.restore_consumer(consumer);
  }

  /// Builds a done callback that runs `then` from a scheduler task.
  fn completion(&self, then: impl FnOnce(&Self, Result<(), StreamError>) + 'static) -> DoneCallback {
    let weak = self.downgrade();
    let scheduler = self.scheduler.clone();
    DoneCallback::new(move |result| {
      scheduler.schedule(move || {
        if let Some(endpoint) = weak.upgrade() {
          then(&endpoint, result);
        }
      });
    })
  }

  fn after_write(&self, seq: u64, result: Result<(), StreamError>) {
    let outcome = self.inner.with_write(|core| {
      let in_flight = core.in_flight.take_if(|in_flight| in_flight.seq == seq)?;
      core.pending_cost = core.pending_cost.saturating_sub(in_flight.cost);
      if core.closed {
        let error = core.lifecycle.error().unwrap_or(StreamError::StreamClosed);
        return Some(WriteOutcome::Discarded { callbacks: in_flight.callbacks, error });
      }
      Some(match result {
        | Err(error) => WriteOutcome::Failed { callbacks: in_flight.callbacks, error },
        | Ok(()) => {
          let drain = core.need_drain && core.pending_cost == 0 && core.lifecycle == WritableLifecycle::Open;
          if drain {
            core.need_drain = false;
          }
          let drain = if drain { core.drain_listeners.snapshot() } else { Vec::new() };
          WriteOutcome::Completed { callbacks: in_flight.callbacks, drain }
        },
      })
    });
    match outcome {
      | None => trace!(endpoint = %self.id(), seq, "stale write completion ignored"),
      | Some(WriteOutcome::Discarded { callbacks, error }) => {
        for callback in callbacks {
          callback(Err(error.clone()));
        }
      },
      | Some(WriteOutcome::Failed { callbacks, error }) => {
        debug!(endpoint = %self.id(), %error, "consumer write failed");
        for callback in callbacks {
          callback(Err(error.clone()));
        }
        self.destroy(Some(error));
      },
      | Some(WriteOutcome::Completed { callbacks, drain }) => {
        if !drain.is_empty() {
          trace!(endpoint = %self.id(), "drain emitted");
        }
        for listener in &drain {
          listener(&());
        }
        for callback in callbacks {
          callback(Ok(()));
        }
        self.clear_buffer();
        self.maybe_finish();
      },
    }
  }

  fn maybe_finish(&self) {
    let consumer = self.inner.with_write(|core| {
      if !core.ready_to_finish() {
        return None;
      }
      core.final_called = true;
      let consumer = core.consumer.take();
      core.consumer_busy = consumer.is_some();
      Some(consumer)
    });
    match consumer {
      | None => {},
      | Some(Some(mut consumer)) => {
        consumer.on_final(self.completion(Self::after_final));
        self.restore_consumer(consumer);
      },
      | Some(None) => {
        let this = self.clone();
        self.scheduler.schedule(move || this.after_final(Ok(())));
      },
    }
  }

  fn after_final(&self, result: Result<(), StreamError>) {
    if let Err(error) = result {
      debug!(endpoint = %self.id(), %error, "consumer final failed");
      self.destroy(Some(error));
      return;
    }
    let listeners = self.inner.with_write(|core| {
      if core.closed || core.lifecycle != WritableLifecycle::Ending {
        return None;
      }
      core.lifecycle = WritableLifecycle::Finished;
      Some((core.finish_listeners.snapshot(), core.auto_destroy))
    });
    let Some((listeners, auto_destroy)) = listeners else {
      return;
    };
    debug!(endpoint = %self.id(), "finish emitted");
    for listener in &listeners {
      listener(&());
    }
    if auto_destroy {
      let step = self.inner.with_write(|core| (!core.closed).then(|| core.begin_close()));
      if let Some(step) = step {
        trace!(endpoint = %self.id(), "auto-destroying after finish");
        self.run_close_step(step, None);
      }
    }
  }

  fn restore_consumer(&self, consumer: Box<dyn Consumer<T>>) {
    let teardown = self.inner.with_write(move |core| {
      core.consumer_busy = false;
      if core.destroy_pending {
        core.destroy_pending = false;
        return Some((consumer, core.lifecycle.error()));
      }
      core.consumer = Some(consumer);
      None
    });
    if let Some((consumer, reason)) = teardown {
      self.teardown_consumer(consumer, reason);
    }
  }

  fn run_close_step(&self, step: CloseStep<Box<dyn Consumer<T>>>, reason: Option<StreamError>) {
    match step {
      | CloseStep::Teardown(consumer) => self.teardown_consumer(consumer, reason),
      | CloseStep::AwaitIdle => {},
      | CloseStep::Finalize => {
        let this = self.clone();
        self.scheduler.schedule(move || this.finalize_close(Ok(())));
      },
    }
  }

  fn teardown_consumer(&self, mut consumer: Box<dyn Consumer<T>>, reason: Option<StreamError>) {
    consumer.on_destroy(reason.as_ref(), self.completion(Self::finalize_close));
  }

  fn finalize_close(&self, cleanup: Result<(), StreamError>) {
    let emission = self.inner.with_write(|core| {
      if core.close_emitted {
        return None;
      }
      core.close_emitted = true;
      if let Err(error) = cleanup {
        if core.lifecycle.error().is_none() {
          core.lifecycle = WritableLifecycle::Errored(error);
        }
      }
      let error = core.lifecycle.error();
      let error_listeners = if error.is_some() { core.error_listeners.snapshot() } else { Vec::new() };
      let close_listeners = core.close_listeners.snapshot();
      core.clear_listeners();
      Some((error, error_listeners, close_listeners))
    });
    let Some((error, error_listeners, close_listeners)) = emission else {
      return;
    };
    if let Some(error) = &error {
      if error_listeners.is_empty() {
        warn!(endpoint = %self.id(), %error, "writable errored without error listeners");
      }
      for listener in &error_listeners {
        listener(error);
      }
    }
    trace!(endpoint = %self.id(), "close emitted");
    for listener in &close_listeners {
      listener(&());
    }
  }
}

impl<T> Clone for WritableEndpoint<T> {
  fn clone(&self) -> Self {
    Self { inner: self.inner.clone(), scheduler: self.scheduler.clone() }
  }
}

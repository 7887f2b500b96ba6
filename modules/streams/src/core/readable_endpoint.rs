//! Readable endpoint: a buffered source consumed by flowing delivery, explicit reads, a pipe or an
//! iterator.

mod consumer_slot;
mod flow_mode;
mod readable_core;
mod readable_lifecycle;
mod wakeups;


use alloc::{boxed::Box, rc::Rc, vec::Vec};

pub(crate) use consumer_slot::{ConsumerSlot, DataHandler};
use flow_mode::FlowMode;
pub(crate) use readable_core::ReadableCore;
use readable_lifecycle::ReadableLifecycle;
use sluice_utils_rs::core::sync::{LocalShared, SharedAccess};
use tracing::{debug, trace, warn};
use wakeups::Wakeups;

use super::{
  Chunk, ChunkMode, ChunkSizing, ConsumerKind, DoneCallback, EndpointId, IterProducer, IteratorOptions, ListenerId,
  PipeController, PipeEdge, PipeOptions, Producer, PushHandle, ReadRequest, ReadResult, ReadableConfig, ReadableState,
  Scheduler, StreamError, StreamIterator, WeakReadable, WritableEndpoint, close_step::CloseStep,
};

/// Handle to a buffered, backpressured source of chunks.
///
/// Handles are cheap to clone and all refer to the same endpoint. Data enters through
/// [`push`](Self::push) (or a [`Producer`]) and leaves through exactly one consumption mode at a
/// time: a data handler ([`on_data`](Self::on_data)), explicit [`read`](Self::read) calls, a pipe or
/// a [`StreamIterator`]. Notifications are always delivered from scheduler tasks.
pub struct ReadableEndpoint<T> {
  inner:     LocalShared<ReadableCore<T>>,
  scheduler: Scheduler,
}

impl<T: 'static> ReadableEndpoint<T> {
  /// Creates a byte-mode endpoint where a chunk costs its length.
  #[must_use]
  pub fn bytes(scheduler: &Scheduler, config: ReadableConfig) -> Self
  where
    T: Chunk, {
    Self::with_sizing(scheduler, config, ChunkSizing::bytes())
  }

  /// Creates an object-mode endpoint where every chunk costs one unit.
  #[must_use]
  pub fn objects(scheduler: &Scheduler, config: ReadableConfig) -> Self {
    Self::with_sizing(scheduler, config, ChunkSizing::objects())
  }

  /// Creates an object-mode endpoint that pulls its chunks from `items` and ends once it is
  /// exhausted.
  #[must_use]
  pub fn from_iter<I>(scheduler: &Scheduler, config: ReadableConfig, items: I) -> Self
  where
    I: IntoIterator<Item = T>,
    I::IntoIter: 'static, {
    Self::try_from_iter(scheduler, config, items.into_iter().map(Ok))
  }

  /// Like [`from_iter`](Self::from_iter), but an `Err` item destroys the endpoint with that error.
  #[must_use]
  pub fn try_from_iter<I>(scheduler: &Scheduler, config: ReadableConfig, items: I) -> Self
  where
    I: IntoIterator<Item = Result<T, StreamError>>,
    I::IntoIter: 'static, {
    Self::objects(scheduler, config).with_producer(IterProducer::new(items.into_iter()))
  }

  fn with_sizing(scheduler: &Scheduler, config: ReadableConfig, sizing: ChunkSizing<T>) -> Self {
    let id = EndpointId::next();
    let high_water_mark = config.resolved_high_water_mark(sizing.mode());
    trace!(endpoint = %id, high_water_mark, "readable endpoint created");
    Self {
      inner:     LocalShared::new(ReadableCore::new(id, sizing, high_water_mark, config.auto_destroy())),
      scheduler: scheduler.clone(),
    }
  }

  pub(crate) const fn from_parts(inner: LocalShared<ReadableCore<T>>, scheduler: Scheduler) -> Self {
    Self { inner, scheduler }
  }

  /// Installs the producer pulled whenever the buffer runs below the high-water mark.
  #[must_use]
  pub fn with_producer(self, producer: impl Producer<T> + 'static) -> Self {
    self.inner.with_write(|core| core.producer = Some(Box::new(producer)));
    self
  }

  /// Appends a chunk to the buffer.
  ///
  /// Returns `true` while the buffer is below the high-water mark. Zero-length byte chunks are
  /// accepted but not buffered.
  ///
  /// # Errors
  ///
  /// Fails with [`StreamError::PushAfterEnd`] after [`push_end`](Self::push_end), with the sticky
  /// error once errored and with [`StreamError::StreamClosed`] once destroyed.
  pub fn push(&self, chunk: T) -> Result<bool, StreamError> {
    let (wakeups, below) = self.inner.with_write(|core| -> Result<(Wakeups, bool), StreamError> {
      core.push_guard()?;
      core.reading = false;
      core.enqueue(chunk, false);
      Ok((core.plan_wakeups(), core.can_push_more()))
    })?;
    self.apply(wakeups);
    Ok(below)
  }

  /// Signals end of data. Calling it again is a no-op.
  ///
  /// # Errors
  ///
  /// Fails with the sticky error once errored and with [`StreamError::StreamClosed`] once destroyed.
  pub fn push_end(&self) -> Result<(), StreamError> {
    let wakeups = self.inner.with_write(|core| -> Result<Option<Wakeups>, StreamError> {
      core.check_error()?;
      if core.lifecycle.is_eof() {
        return Ok(None);
      }
      core.lifecycle = ReadableLifecycle::Ending;
      core.reading = false;
      core.need_readable = true;
      Ok(Some(core.plan_wakeups()))
    })?;
    if let Some(wakeups) = wakeups {
      debug!(endpoint = %self.id(), buffered = self.readable_length(), "end of data signalled");
      self.apply(wakeups);
    }
    Ok(())
  }

  /// Puts a chunk back at the head of the buffer.
  ///
  /// Returns `true` while the buffer is below the high-water mark.
  ///
  /// # Errors
  ///
  /// Fails with [`StreamError::UnshiftAfterEnd`] once end was emitted, with the sticky error once
  /// errored and with [`StreamError::StreamClosed`] once destroyed.
  pub fn unshift(&self, chunk: T) -> Result<bool, StreamError> {
    let (wakeups, below) = self.inner.with_write(|core| -> Result<(Wakeups, bool), StreamError> {
      core.check_error()?;
      if core.lifecycle == ReadableLifecycle::Ended {
        return Err(StreamError::UnshiftAfterEnd);
      }
      core.enqueue(chunk, true);
      Ok((core.plan_wakeups(), core.can_push_more()))
    })?;
    self.apply(wakeups);
    Ok(below)
  }

  /// Reads from the buffer in paused mode.
  ///
  /// `None` takes every buffered chunk; in byte mode `Some(n)` takes at most `n` bytes, splitting the
  /// last chunk when needed, and `Some(0)` only triggers a pull. Object-mode reads take the head
  /// chunk. A read never waits: it returns whatever is buffered.
  ///
  /// # Errors
  ///
  /// Fails with [`StreamError::ModeConflict`] while a data handler or iterator is attached, with
  /// [`StreamError::SizeOutOfRange`] for byte reads above [`MAX_HIGH_WATER_MARK`](crate::core::MAX_HIGH_WATER_MARK),
  /// and with the sticky error once errored.
  pub fn read(&self, size: Option<usize>) -> Result<ReadResult<T>, StreamError> {
    let request = self.inner.with_write(|core| -> Result<ReadRequest, StreamError> {
      core.check_error()?;
      if let Some(active) = core.consumer.kind() {
        return Err(StreamError::ModeConflict { active });
      }
      // 明示的な read を優先し、予約済みの自動読み出しを一回見送る
      if core.flow_scheduled {
        core.suppress_next_flow = true;
      }
      Ok(match (size, core.sizing.mode()) {
        | (Some(0), _) => ReadRequest::Probe,
        | (_, ChunkMode::Objects) => ReadRequest::Head,
        | (None, ChunkMode::Bytes) => ReadRequest::All,
        | (Some(limit), ChunkMode::Bytes) => ReadRequest::UpTo(limit),
      })
    })?;
    self.read_internal(request)
  }

  pub(crate) fn read_internal(&self, request: ReadRequest) -> Result<ReadResult<T>, StreamError> {
    let pull = self.inner.with_write(|core| -> Result<Option<(Box<dyn Producer<T>>, usize)>, StreamError> {
      core.check_error()?;
      if let ReadRequest::UpTo(limit) = request {
        core.raise_high_water_mark(limit)?;
      }
      Ok(core.begin_pull(request).map(|producer| (producer, core.high_water_mark)))
    })?;
    if let Some((mut producer, requested)) = pull {
      trace!(endpoint = %self.id(), requested, "pulling producer");
      producer.on_pull(requested, &PushHandle::new(self.downgrade()));
      self.restore_producer(producer);
    }
    let (result, schedule_end) = self.inner.with_write(|core| -> Result<(ReadResult<T>, bool), StreamError> {
      core.check_error()?;
      Ok(core.dequeue(request))
    })?;
    if schedule_end {
      self.defer(Self::run_end);
    }
    Ok(result)
  }

  /// Switches to flowing mode (or keeps it) so buffered chunks reach the data handler.
  ///
  /// # Errors
  ///
  /// Fails with [`StreamError::ModeConflict`] while an iterator is attached.
  pub fn resume(&self) -> Result<(), StreamError> {
    let schedule_flow = self.inner.with_write(|core| -> Result<bool, StreamError> {
      if let ConsumerSlot::Iterating = core.consumer {
        return Err(StreamError::ModeConflict { active: ConsumerKind::Iterating });
      }
      if core.flow != FlowMode::Flowing {
        core.flow = FlowMode::Flowing;
        trace!(endpoint = %core.id, "resumed");
      }
      Ok(core.plan_flow())
    })?;
    if schedule_flow {
      self.defer(Self::run_flow);
    }
    Ok(())
  }

  /// Stops flowing delivery; chunks stay buffered until resumed or read.
  pub fn pause(&self) {
    let changed = self.inner.with_write(|core| {
      if core.flow == FlowMode::Paused {
        return false;
      }
      core.flow = FlowMode::Paused;
      true
    });
    if changed {
      trace!(endpoint = %self.id(), "paused");
    }
  }

  /// Attaches a flowing data handler.
  ///
  /// The endpoint starts flowing unless it was explicitly paused before.
  ///
  /// # Errors
  ///
  /// Fails with [`StreamError::ModeConflict`] when another consumer is attached, with the sticky
  /// error once errored and with [`StreamError::StreamClosed`] once destroyed.
  pub fn on_data(&self, handler: impl FnMut(T) + 'static) -> Result<(), StreamError> {
    self.attach_data_handler(Box::new(handler))
  }

  fn attach_data_handler(&self, handler: DataHandler<T>) -> Result<(), StreamError> {
    let schedule_flow = self.inner.with_write(|core| -> Result<bool, StreamError> {
      core.check_error()?;
      if let Some(active) = core.consumer.kind() {
        return Err(StreamError::ModeConflict { active });
      }
      core.generation += 1;
      core.consumer = ConsumerSlot::Flowing { handler: Some(handler), generation: core.generation };
      if core.flow != FlowMode::Paused {
        core.flow = FlowMode::Flowing;
      }
      Ok(core.plan_flow())
    })?;
    if schedule_flow {
      self.defer(Self::run_flow);
    }
    Ok(())
  }

  /// Detaches the data handler and pauses. Returns `false` when none was attached.
  pub fn off_data(&self) -> bool {
    self.inner.with_write(|core| {
      if !matches!(core.consumer, ConsumerSlot::Flowing { .. }) {
        return false;
      }
      core.consumer = ConsumerSlot::Vacant;
      if core.flow == FlowMode::Flowing {
        core.flow = FlowMode::Paused;
      }
      true
    })
  }

  /// Pipes this endpoint into `destination`.
  ///
  /// # Errors
  ///
  /// See [`PipeController::pipe`].
  pub fn pipe(&self, destination: &WritableEndpoint<T>, options: PipeOptions) -> Result<PipeEdge, StreamError>
  where
    T: Clone, {
    PipeController::pipe(self, destination, options)
  }

  /// Removes the pipe edge towards `destination`. Returns `false` when it was not piped.
  pub fn unpipe(&self, destination: &WritableEndpoint<T>) -> bool
  where
    T: Clone, {
    PipeController::unpipe(self, destination)
  }

  /// Attaches a pull-based iterator.
  ///
  /// # Errors
  ///
  /// Fails with [`StreamError::ModeConflict`] when another consumer is attached.
  pub fn iterate(&self, options: IteratorOptions) -> Result<StreamIterator<T>, StreamError> {
    StreamIterator::new(self, options)
  }

  /// Destroys the endpoint, discarding buffered data.
  ///
  /// With a reason the endpoint becomes errored and `error` is emitted before `close`. Only the
  /// first call has any effect.
  pub fn destroy(&self, reason: Option<StreamError>) {
    let step = self.inner.with_write(|core| {
      if core.closed {
        return None;
      }
      core.lifecycle = match &reason {
        | Some(error) => ReadableLifecycle::Errored(error.clone()),
        | None => ReadableLifecycle::Destroyed,
      };
      core.queue.clear();
      Some(core.begin_close())
    });
    let Some(step) = step else {
      trace!(endpoint = %self.id(), "destroy ignored, already closed");
      return;
    };
    match &reason {
      | Some(error) => debug!(endpoint = %self.id(), %error, "readable destroyed with error"),
      | None => debug!(endpoint = %self.id(), "readable destroyed"),
    }
    self.run_close_step(step, reason);
  }

  /// Registers a listener for `readable`, emitted when data or end of data becomes available.
  pub fn on_readable(&self, listener: impl Fn() + 'static) -> ListenerId {
    let (id, schedule) = self.inner.with_write(|core| {
      let id = core.readable_listeners.add(Rc::new(move |_: &()| listener()), false);
      core.need_readable = true;
      if core.flow == FlowMode::Unset {
        core.flow = FlowMode::Paused;
      }
      let ready = !core.queue.is_empty() || core.lifecycle.is_eof();
      let schedule = ready && !core.closed && !core.readable_scheduled;
      if schedule {
        core.readable_scheduled = true;
      }
      (id, schedule)
    });
    if schedule {
      self.defer(Self::run_readable);
    }
    id
  }

  /// Registers a listener for `end`.
  pub fn on_end(&self, listener: impl Fn() + 'static) -> ListenerId {
    self.inner.with_write(|core| core.end_listeners.add(Rc::new(move |_: &()| listener()), false))
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
      core.readable_listeners.remove(id)
        || core.end_listeners.remove(id)
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
  pub fn state(&self) -> ReadableState {
    self.inner.with_read(ReadableCore::state)
  }

  /// Returns the sticky error, if any.
  #[must_use]
  pub fn error(&self) -> Option<StreamError> {
    self.inner.with_read(|core| core.lifecycle.error())
  }

  /// Returns the summed cost of buffered chunks.
  #[must_use]
  pub fn readable_length(&self) -> usize {
    self.inner.with_read(|core| core.queue.total_cost())
  }

  /// Returns the number of buffered chunks.
  #[must_use]
  pub fn buffered_chunks(&self) -> usize {
    self.inner.with_read(|core| core.queue.len())
  }

  /// Returns the current high-water mark.
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

  /// Returns `true` after an explicit pause, or once a readable listener or iterator took over.
  #[must_use]
  pub fn is_paused(&self) -> bool {
    self.inner.with_read(|core| core.flow == FlowMode::Paused)
  }

  /// Returns `true` when at least one chunk was ever buffered.
  #[must_use]
  pub fn has_pushed(&self) -> bool {
    self.inner.with_read(|core| core.has_pushed)
  }

  /// Returns `true` once `end` was emitted.
  #[must_use]
  pub fn end_emitted(&self) -> bool {
    self.inner.with_read(|core| core.lifecycle == ReadableLifecycle::Ended)
  }

  /// Returns `true` once destroy started, explicitly or after end.
  #[must_use]
  pub fn is_closed(&self) -> bool {
    self.inner.with_read(|core| core.closed)
  }

  /// Returns `true` once `close` was emitted.
  #[must_use]
  pub fn close_emitted(&self) -> bool {
    self.inner.with_read(|core| core.close_emitted)
  }

  /// Returns the kind of the attached consumer.
  #[must_use]
  pub fn consumer_kind(&self) -> Option<ConsumerKind> {
    self.inner.with_read(|core| core.consumer.kind())
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

  pub(crate) fn downgrade(&self) -> WeakReadable<T> {
    WeakReadable::new(self.inner.downgrade(), self.scheduler.clone())
  }

  pub(crate) fn check_attachable(&self) -> Result<(), StreamError> {
    self.inner.with_read(|core| {
      core.check_error()?;
      match core.consumer.kind() {
        | Some(ConsumerKind::Iterating) => Err(StreamError::ModeConflict { active: ConsumerKind::Iterating }),
        | _ => Ok(()),
      }
    })
  }

  pub(crate) fn pipe_controller(&self) -> Option<PipeController<T>> {
    self.inner.with_read(|core| core.pipe.clone())
  }

  pub(crate) fn install_pipe(&self, controller: PipeController<T>, handler: DataHandler<T>) -> Result<(), StreamError> {
    self.attach_data_handler(handler)?;
    self.inner.with_write(|core| core.pipe = Some(controller));
    Ok(())
  }

  pub(crate) fn release_pipe(&self, controller: &PipeController<T>) {
    let released = self.inner.with_write(|core| match &core.pipe {
      | Some(current) if current.ptr_eq(controller) => {
        core.pipe = None;
        true
      },
      | _ => false,
    });
    if released {
      self.off_data();
    }
  }

  pub(crate) fn attach_iterator(&self) -> Result<(), StreamError> {
    self.inner.with_write(|core| {
      if let Some(active) = core.consumer.kind() {
        return Err(StreamError::ModeConflict { active });
      }
      core.consumer = ConsumerSlot::Iterating;
      core.flow = FlowMode::Paused;
      Ok(())
    })
  }

  pub(crate) fn release_iterator(&self) {
    self.inner.with_write(|core| {
      if matches!(core.consumer, ConsumerSlot::Iterating) {
        core.consumer = ConsumerSlot::Vacant;
      }
    });
  }

  fn apply(&self, wakeups: Wakeups) {
    if wakeups.readable {
      self.defer(Self::run_readable);
    }
    if wakeups.flow {
      self.defer(Self::run_flow);
    }
    if wakeups.read_more {
      self.defer(Self::run_read_more);
    }
  }

  fn defer(&self, task: fn(&Self)) {
    let this = self.clone();
    self.scheduler.schedule(move || task(&this));
  }

  fn run_readable(&self) {
    let listeners = self.inner.with_write(|core| {
      core.readable_scheduled = false;
      if core.closed {
        return Vec::new();
      }
      let ready = !core.queue.is_empty() || core.lifecycle.is_eof();
      let listeners = if ready { core.readable_listeners.snapshot() } else { Vec::new() };
      core.need_readable = core.flow != FlowMode::Flowing
        && !core.lifecycle.is_eof()
        && core.queue.total_cost() <= core.high_water_mark;
      listeners
    });
    for listener in &listeners {
      listener(&());
    }
  }

  fn run_flow(&self) {
    let skipped = self.inner.with_write(|core| {
      core.flow_scheduled = false;
      if !core.suppress_next_flow {
        return None;
      }
      core.suppress_next_flow = false;
      Some(core.plan_flow())
    });
    if let Some(reschedule) = skipped {
      // 見送った周期は次の tick に回す
      trace!(endpoint = %self.id(), reschedule, "auto-read cycle skipped after explicit read");
      if reschedule {
        self.defer(Self::run_flow);
      }
      return;
    }
    while self.inner.with_read(ReadableCore::is_delivering) {
      match self.read_internal(ReadRequest::Head) {
        | Ok(ReadResult::Data(chunks)) => {
          for chunk in chunks {
            self.deliver(chunk);
          }
        },
        | Ok(ReadResult::NotReady | ReadResult::Ended) | Err(_) => break,
      }
    }
  }

  fn deliver(&self, chunk: T) {
    let taken = self.inner.with_write(|core| match &mut core.consumer {
      | ConsumerSlot::Flowing { handler, generation } => handler.take().map(|handler| (handler, *generation)),
      | _ => None,
    });
    let Some((mut handler, generation)) = taken else {
      self.inner.with_write(|core| {
        if !core.closed {
          core.enqueue(chunk, true);
        }
      });
      return;
    };
    handler(chunk);
    self.inner.with_write(|core| {
      if let ConsumerSlot::Flowing { handler: slot @ None, generation: current } = &mut core.consumer {
        if *current == generation {
          *slot = Some(handler);
        }
      }
    });
  }

  fn run_read_more(&self) {
    self.inner.with_write(|core| core.read_more_scheduled = false);
    loop {
      let before = self.inner.with_read(|core| core.wants_read_more().then(|| core.queue.total_cost()));
      let Some(before) = before else {
        break;
      };
      if self.read_internal(ReadRequest::Probe).is_err() {
        break;
      }
      if self.readable_length() == before {
        break;
      }
    }
  }

  fn run_end(&self) {
    let listeners = self.inner.with_write(|core| {
      core.end_scheduled = false;
      if core.closed || core.lifecycle != ReadableLifecycle::Ending || !core.queue.is_empty() {
        return None;
      }
      core.lifecycle = ReadableLifecycle::Ended;
      Some(core.end_listeners.snapshot())
    });
    let Some(listeners) = listeners else {
      return;
    };
    debug!(endpoint = %self.id(), "end emitted");
    for listener in &listeners {
      listener(&());
    }
    self.maybe_auto_close();
  }

  fn maybe_auto_close(&self) {
    let step = self.inner.with_write(|core| {
      if core.closed || !core.auto_destroy || core.lifecycle != ReadableLifecycle::Ended {
        return None;
      }
      Some(core.begin_close())
    });
    if let Some(step) = step {
      trace!(endpoint = %self.id(), "auto-destroying after end");
      self.run_close_step(step, None);
    }
  }

  fn restore_producer(&self, producer: Box<dyn Producer<T>>) {
    let teardown = self.inner.with_write(move |core| {
      core.producer_busy = false;
      if core.destroy_pending {
        core.destroy_pending = false;
        return Some((producer, core.lifecycle.error()));
      }
      core.producer = Some(producer);
      None
    });
    if let Some((producer, reason)) = teardown {
      self.teardown_producer(producer, reason);
    }
  }

  fn run_close_step(&self, step: CloseStep<Box<dyn Producer<T>>>, reason: Option<StreamError>) {
    match step {
      | CloseStep::Teardown(producer) => self.teardown_producer(producer, reason),
      | CloseStep::AwaitIdle => {},
      | CloseStep::Finalize => {
        let this = self.clone();
        self.scheduler.schedule(move || this.finalize_close(Ok(())));
      },
    }
  }

  fn teardown_producer(&self, mut producer: Box<dyn Producer<T>>, reason: Option<StreamError>) {
    let weak = self.downgrade();
    let scheduler = self.scheduler.clone();
    let done = DoneCallback::new(move |result| {
      scheduler.schedule(move || {
        if let Some(endpoint) = weak.upgrade() {
          endpoint.finalize_close(result);
        }
      });
    });
    producer.on_destroy(reason.as_ref(), done);
  }

  fn finalize_close(&self, cleanup: Result<(), StreamError>) {
    let emission = self.inner.with_write(|core| {
      if core.close_emitted {
        return None;
      }
      core.close_emitted = true;
      if let Err(error) = cleanup {
        if core.lifecycle.error().is_none() {
          core.lifecycle = ReadableLifecycle::Errored(error);
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
        warn!(endpoint = %self.id(), %error, "readable errored without error listeners");
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

impl<T> Clone for ReadableEndpoint<T> {
  fn clone(&self) -> Self {
    Self { inner: self.inner.clone(), scheduler: self.scheduler.clone() }
  }
}

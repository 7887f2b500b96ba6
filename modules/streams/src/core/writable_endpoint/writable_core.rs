use alloc::{boxed::Box, vec::Vec};

use super::{Delivery, InFlightWrite, PendingWrite, WritableLifecycle};
use crate::core::{
  ChunkQueue, ChunkSizing, Consumer, EndpointId, ListenerList, StreamError, WritableState, WriteCallback,
  close_step::CloseStep,
};

/// Mutable state behind a [`WritableEndpoint`](crate::core::WritableEndpoint) handle.
pub(crate) struct WritableCore<T> {
  pub(super) id:               EndpointId,
  pub(super) lifecycle:        WritableLifecycle,
  pub(super) buffer:           ChunkQueue<PendingWrite<T>>,
  pub(super) sizing:           ChunkSizing<T>,
  pub(super) high_water_mark:  usize,
  pub(super) auto_destroy:     bool,
  /// Cost of buffered plus in-flight writes.
  pub(super) pending_cost:     usize,
  pub(super) in_flight:        Option<InFlightWrite>,
  pub(super) next_seq:         u64,
  pub(super) cork_count:       usize,
  pub(super) need_drain:       bool,
  pub(super) final_called:     bool,
  pub(super) closed:           bool,
  pub(super) close_emitted:    bool,
  pub(super) consumer:         Option<Box<dyn Consumer<T>>>,
  pub(super) consumer_busy:    bool,
  pub(super) destroy_pending:  bool,
  pub(super) drain_listeners:  ListenerList<()>,
  pub(super) finish_listeners: ListenerList<()>,
  pub(super) error_listeners:  ListenerList<StreamError>,
  pub(super) close_listeners:  ListenerList<()>,
}

impl<T> WritableCore<T> {
  pub(super) fn new(
    id: EndpointId,
    sizing: ChunkSizing<T>,
    high_water_mark: usize,
    auto_destroy: bool,
    consumer: Box<dyn Consumer<T>>,
  ) -> Self {
    Self {
      id,
      lifecycle: WritableLifecycle::Open,
      buffer: ChunkQueue::new(),
      sizing,
      high_water_mark,
      auto_destroy,
      pending_cost: 0,
      in_flight: None,
      next_seq: 0,
      cork_count: 0,
      need_drain: false,
      final_called: false,
      closed: false,
      close_emitted: false,
      consumer: Some(consumer),
      consumer_busy: false,
      destroy_pending: false,
      drain_listeners: ListenerList::new(),
      finish_listeners: ListenerList::new(),
      error_listeners: ListenerList::new(),
      close_listeners: ListenerList::new(),
    }
  }

  /// Buffers an accepted write and reports whether the caller may keep writing.
  pub(super) fn enqueue(&mut self, chunk: T, callback: WriteCallback) -> bool {
    let cost = self.sizing.cost(&chunk);
    self.pending_cost += cost;
    self.buffer.push(PendingWrite { chunk, callback }, cost);
    let below = self.pending_cost < self.high_water_mark;
    if !below {
      self.need_drain = true;
    }
    below
  }

  /// Takes the next dispatch out of the buffer together with the consumer.
  pub(super) fn begin_dispatch(&mut self) -> Option<(Box<dyn Consumer<T>>, Delivery<T>, u64)> {
    if self.closed || self.cork_count > 0 || self.in_flight.is_some() || self.consumer_busy || self.buffer.is_empty() {
      return None;
    }
    let batch = match &self.consumer {
      | Some(consumer) => self.buffer.len() > 1 && consumer.supports_batch(),
      | None => return None,
    };
    let (delivery, cost, callbacks) = if batch {
      let cost = self.buffer.total_cost();
      let (chunks, callbacks): (Vec<T>, Vec<WriteCallback>) =
        self.buffer.drain_all().into_iter().map(|write| (write.chunk, write.callback)).unzip();
      (Delivery::Batch(chunks), cost, callbacks)
    } else {
      let (write, cost) = self.buffer.shift_with_cost()?;
      (Delivery::Single(write.chunk), cost, alloc::vec![write.callback])
    };
    let consumer = self.consumer.take()?;
    let seq = self.next_seq;
    self.next_seq += 1;
    self.in_flight = Some(InFlightWrite { seq, cost, callbacks });
    self.consumer_busy = true;
    Some((consumer, delivery, seq))
  }

  /// Returns `true` when `end` was called and nothing is left to flush.
  pub(super) fn ready_to_finish(&self) -> bool {
    self.lifecycle == WritableLifecycle::Ending
      && !self.closed
      && !self.final_called
      && !self.consumer_busy
      && self.in_flight.is_none()
      && self.buffer.is_empty()
  }

  /// Fails every buffered and in-flight write, keeping the in-flight cost accounted until its
  /// completion arrives.
  pub(super) fn take_all_callbacks(&mut self) -> Vec<WriteCallback> {
    let mut callbacks = Vec::new();
    if let Some(in_flight) = &mut self.in_flight {
      callbacks.append(&mut in_flight.callbacks);
    }
    callbacks.extend(self.buffer.drain_all().into_iter().map(|write| write.callback));
    self.pending_cost = self.in_flight.as_ref().map_or(0, |in_flight| in_flight.cost);
    callbacks
  }

  pub(super) fn begin_close(&mut self) -> CloseStep<Box<dyn Consumer<T>>> {
    self.closed = true;
    self.need_drain = false;
    if self.consumer_busy {
      self.destroy_pending = true;
      return CloseStep::AwaitIdle;
    }
    match self.consumer.take() {
      | Some(consumer) => CloseStep::Teardown(consumer),
      | None => CloseStep::Finalize,
    }
  }

  pub(super) fn clear_listeners(&mut self) {
    self.drain_listeners.clear();
    self.finish_listeners.clear();
    self.error_listeners.clear();
    self.close_listeners.clear();
  }

  pub(super) const fn state(&self) -> WritableState {
    match &self.lifecycle {
      | WritableLifecycle::Errored(_) => WritableState::Errored,
      | WritableLifecycle::Destroyed => WritableState::Destroyed,
      | WritableLifecycle::Finished => WritableState::Finished,
      | WritableLifecycle::Ending => WritableState::Finishing,
      | WritableLifecycle::Open if self.cork_count > 0 => WritableState::Corked,
      | WritableLifecycle::Open if self.need_drain => WritableState::Draining,
      | WritableLifecycle::Open => WritableState::Writable,
    }
  }
}

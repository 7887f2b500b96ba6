use alloc::{boxed::Box, vec::Vec};

use super::{ConsumerSlot, FlowMode, ReadableLifecycle, Wakeups};
use crate::core::{
  ChunkQueue, ChunkSizing, EndpointId, ListenerList, MAX_HIGH_WATER_MARK, PipeController, Producer, ReadRequest,
  ReadResult, ReadableState, StreamError, close_step::CloseStep,
};

/// Mutable state behind a [`ReadableEndpoint`](crate::core::ReadableEndpoint) handle.
pub(crate) struct ReadableCore<T> {
  pub(super) id:                  EndpointId,
  pub(super) lifecycle:           ReadableLifecycle,
  pub(super) flow:                FlowMode,
  pub(super) queue:               ChunkQueue<T>,
  pub(super) sizing:              ChunkSizing<T>,
  pub(super) high_water_mark:     usize,
  pub(super) auto_destroy:        bool,
  pub(super) has_pushed:          bool,
  pub(super) reading:             bool,
  pub(super) need_readable:       bool,
  pub(super) readable_scheduled:  bool,
  pub(super) read_more_scheduled: bool,
  pub(super) flow_scheduled:      bool,
  pub(super) suppress_next_flow:  bool,
  pub(super) end_scheduled:       bool,
  pub(super) closed:              bool,
  pub(super) close_emitted:       bool,
  pub(super) producer:            Option<Box<dyn Producer<T>>>,
  pub(super) producer_busy:       bool,
  pub(super) destroy_pending:     bool,
  pub(super) consumer:            ConsumerSlot<T>,
  pub(super) generation:          u64,
  pub(super) pipe:                Option<PipeController<T>>,
  pub(super) readable_listeners:  ListenerList<()>,
  pub(super) end_listeners:       ListenerList<()>,
  pub(super) error_listeners:     ListenerList<StreamError>,
  pub(super) close_listeners:     ListenerList<()>,
}

impl<T> ReadableCore<T> {
  pub(super) fn new(id: EndpointId, sizing: ChunkSizing<T>, high_water_mark: usize, auto_destroy: bool) -> Self {
    Self {
      id,
      lifecycle: ReadableLifecycle::Open,
      flow: FlowMode::Unset,
      queue: ChunkQueue::new(),
      sizing,
      high_water_mark,
      auto_destroy,
      has_pushed: false,
      reading: false,
      need_readable: false,
      readable_scheduled: false,
      read_more_scheduled: false,
      flow_scheduled: false,
      suppress_next_flow: false,
      end_scheduled: false,
      closed: false,
      close_emitted: false,
      producer: None,
      producer_busy: false,
      destroy_pending: false,
      consumer: ConsumerSlot::Vacant,
      generation: 0,
      pipe: None,
      readable_listeners: ListenerList::new(),
      end_listeners: ListenerList::new(),
      error_listeners: ListenerList::new(),
      close_listeners: ListenerList::new(),
    }
  }

  /// Fails with the sticky error or [`StreamError::StreamClosed`] after destroy.
  pub(super) fn check_error(&self) -> Result<(), StreamError> {
    match &self.lifecycle {
      | ReadableLifecycle::Errored(error) => Err(error.clone()),
      | ReadableLifecycle::Destroyed => Err(StreamError::StreamClosed),
      | _ => Ok(()),
    }
  }

  pub(super) fn push_guard(&self) -> Result<(), StreamError> {
    self.check_error()?;
    if self.lifecycle.is_eof() {
      return Err(StreamError::PushAfterEnd);
    }
    Ok(())
  }

  pub(super) fn can_push_more(&self) -> bool {
    !self.lifecycle.is_eof() && (self.queue.total_cost() < self.high_water_mark || self.queue.is_empty())
  }

  pub(super) fn enqueue(&mut self, chunk: T, at_front: bool) {
    let cost = self.sizing.cost(&chunk);
    if cost == 0 && !self.sizing.mode().is_objects() {
      return;
    }
    if at_front {
      self.queue.unshift(chunk, cost);
    } else {
      self.queue.push(chunk, cost);
    }
    self.has_pushed = true;
  }

  /// Plans the notifications owed after the buffer or end state changed.
  pub(super) fn plan_wakeups(&mut self) -> Wakeups {
    let mut wakeups = Wakeups::default();
    if self.closed {
      return wakeups;
    }
    if self.need_readable && !self.readable_scheduled && self.flow != FlowMode::Flowing {
      self.need_readable = false;
      self.readable_scheduled = true;
      wakeups.readable = true;
    }
    wakeups.flow = self.plan_flow();
    if self.wants_read_more() && !self.read_more_scheduled {
      self.read_more_scheduled = true;
      wakeups.read_more = true;
    }
    wakeups
  }

  pub(super) fn plan_flow(&mut self) -> bool {
    if self.closed || self.flow_scheduled || self.flow != FlowMode::Flowing || !self.consumer.has_handler() {
      return false;
    }
    self.flow_scheduled = true;
    true
  }

  pub(super) fn wants_read_more(&self) -> bool {
    !self.closed
      && !self.reading
      && !self.producer_busy
      && self.producer.is_some()
      && !self.lifecycle.is_eof()
      && (self.queue.total_cost() < self.high_water_mark || (self.flow == FlowMode::Flowing && self.queue.is_empty()))
  }

  pub(super) const fn is_delivering(&self) -> bool {
    !self.closed && matches!(self.flow, FlowMode::Flowing) && self.consumer.has_handler()
  }

  /// Raises the byte-mode threshold to the next power of two covering `requested`.
  pub(super) fn raise_high_water_mark(&mut self, requested: usize) -> Result<(), StreamError> {
    if self.sizing.mode().is_objects() || requested <= self.high_water_mark {
      return Ok(());
    }
    if requested > MAX_HIGH_WATER_MARK {
      return Err(StreamError::SizeOutOfRange { requested });
    }
    self.high_water_mark = requested.next_power_of_two();
    Ok(())
  }

  /// Takes the producer out when a pull is due for `request`.
  pub(super) fn begin_pull(&mut self, request: ReadRequest) -> Option<Box<dyn Producer<T>>> {
    if self.lifecycle.is_eof() || self.reading || self.closed || self.producer_busy {
      return None;
    }
    let total = self.queue.total_cost();
    let wanted = match request {
      | ReadRequest::Head => self.queue.head_cost().unwrap_or(0),
      | ReadRequest::UpTo(limit) => limit,
      | ReadRequest::All => total,
      | ReadRequest::Probe => 0,
    };
    if !(self.need_readable || total == 0 || total.saturating_sub(wanted) < self.high_water_mark) {
      return None;
    }
    let producer = self.producer.take()?;
    self.reading = true;
    self.producer_busy = true;
    if total == 0 {
      self.need_readable = true;
    }
    Some(producer)
  }

  /// Takes data for `request` and reports whether the end event must be scheduled.
  pub(super) fn dequeue(&mut self, request: ReadRequest) -> (ReadResult<T>, bool) {
    if self.lifecycle == ReadableLifecycle::Ended {
      return (ReadResult::Ended, false);
    }
    if self.queue.is_empty() {
      if self.lifecycle.is_eof() {
        return (ReadResult::Ended, self.mark_end_scheduled());
      }
      self.need_readable = true;
      return (ReadResult::NotReady, false);
    }
    let chunks = match request {
      | ReadRequest::Probe => return (ReadResult::NotReady, false),
      | ReadRequest::Head => self.queue.shift().into_iter().collect(),
      | ReadRequest::All => self.queue.drain_all(),
      | ReadRequest::UpTo(limit) => self.take_up_to(limit),
    };
    let schedule_end = if self.queue.is_empty() {
      if self.lifecycle.is_eof() {
        self.mark_end_scheduled()
      } else {
        self.need_readable = true;
        false
      }
    } else {
      false
    };
    (ReadResult::Data(chunks), schedule_end)
  }

  fn take_up_to(&mut self, limit: usize) -> Vec<T> {
    let mut chunks = Vec::new();
    let mut remaining = limit;
    while remaining > 0 {
      let Some(head_cost) = self.queue.head_cost() else {
        break;
      };
      if head_cost <= remaining {
        if let Some((chunk, cost)) = self.queue.shift_with_cost() {
          remaining -= cost;
          chunks.push(chunk);
        }
        continue;
      }
      let front = match self.sizing.splitter() {
        | Some(split) => self.queue.split_head(remaining, split),
        | None => self.queue.shift(),
      };
      chunks.extend(front);
      break;
    }
    chunks
  }

  pub(super) fn mark_end_scheduled(&mut self) -> bool {
    if self.lifecycle != ReadableLifecycle::Ending || self.end_scheduled {
      return false;
    }
    self.end_scheduled = true;
    true
  }

  /// Marks the endpoint closed and decides how to tear the producer down.
  pub(super) fn begin_close(&mut self) -> CloseStep<Box<dyn Producer<T>>> {
    self.closed = true;
    self.reading = false;
    self.need_readable = false;
    if self.producer_busy {
      self.destroy_pending = true;
      return CloseStep::AwaitIdle;
    }
    match self.producer.take() {
      | Some(producer) => CloseStep::Teardown(producer),
      | None => CloseStep::Finalize,
    }
  }

  pub(super) fn clear_listeners(&mut self) {
    self.readable_listeners.clear();
    self.end_listeners.clear();
    self.error_listeners.clear();
    self.close_listeners.clear();
  }

  pub(super) fn state(&self) -> ReadableState {
    match &self.lifecycle {
      | ReadableLifecycle::Errored(_) => ReadableState::Errored,
      | ReadableLifecycle::Destroyed => ReadableState::Destroyed,
      | ReadableLifecycle::Ended => ReadableState::Ended,
      | ReadableLifecycle::Ending => ReadableState::Ending,
      | ReadableLifecycle::Open => match self.flow {
        | FlowMode::Unset if self.queue.is_empty() => ReadableState::Idle,
        | FlowMode::Unset => ReadableState::Buffering,
        | FlowMode::Flowing => ReadableState::Flowing,
        | FlowMode::Paused => ReadableState::Paused,
      },
    }
  }
}

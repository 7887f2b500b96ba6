//! Pipe controller: forwards chunks from one readable to its writable destinations.

mod pipe_core;
mod pipe_edge_entry;


use alloc::{boxed::Box, vec::Vec};
use core::mem;

use pipe_core::PipeCore;
use pipe_edge_entry::PipeEdgeEntry;
use sluice_utils_rs::core::sync::{LocalShared, LocalWeak, SharedAccess};
use tracing::{debug, trace, warn};

use super::{
  EndpointId, ListenerId, PipeEdge, PipeEdgeState, PipeOptions, ReadableEndpoint, StreamError, WritableEndpoint,
};

/// Moves chunks from a source to every attached destination.
///
/// A source has at most one controller, created by the first [`pipe`](Self::pipe) call and dropped
/// once the last edge is removed. Chunks are cloned for every destination but the last one. When a
/// destination reports backpressure the source pauses until every saturated destination drained.
pub struct PipeController<T> {
  inner: LocalShared<PipeCore<T>>,
}

impl<T: Clone + 'static> PipeController<T> {
  /// Connects `source` to `destination` and returns the new edge.
  ///
  /// The source switches to flowing mode unless the destination is already saturated. A source
  /// whose end was already emitted ends the destination right away when `propagate_end` is set.
  ///
  /// # Errors
  ///
  /// Fails with [`StreamError::AlreadyPiped`] for a destination already piped from this source,
  /// with [`StreamError::ModeConflict`] when the source is iterated or has a plain data handler,
  /// with [`StreamError::WriteAfterEnd`] for an ending destination, and with the sticky error or
  /// [`StreamError::StreamClosed`] when either side was destroyed.
  pub fn pipe(
    source: &ReadableEndpoint<T>,
    destination: &WritableEndpoint<T>,
    options: PipeOptions,
  ) -> Result<PipeEdge, StreamError> {
    source.check_attachable()?;
    destination.check_writable()?;
    let controller = match source.pipe_controller() {
      | Some(controller) => controller,
      | None => Self::attach(source)?,
    };
    if controller.inner.with_read(|core| core.position(destination.id()).is_some()) {
      return Err(StreamError::AlreadyPiped);
    }

    let edge = PipeEdge::new(source.id(), destination.id());
    let listeners = controller.watch_destination(destination);
    let saturated = destination.need_drain();
    if saturated {
      edge.transition(PipeEdgeState::Paused);
    }
    let idle = controller.inner.with_write(|core| {
      core.edges.push(PipeEdgeEntry {
        edge: edge.clone(),
        destination: destination.clone(),
        options,
        awaiting_drain: saturated,
        listeners,
      });
      !core.any_awaiting_drain()
    });
    debug!(source = %source.id(), destination = %destination.id(), "pipe attached");

    if idle {
      source.resume()?;
    } else {
      source.pause();
    }
    if source.end_emitted() {
      let weak = controller.inner.downgrade();
      source.scheduler().schedule(move || {
        if let Some(inner) = weak.upgrade() {
          Self { inner }.on_source_end();
        }
      });
    }
    Ok(edge)
  }

  /// Removes the edge from `source` to `destination`. Returns `false` when there was none.
  pub fn unpipe(source: &ReadableEndpoint<T>, destination: &WritableEndpoint<T>) -> bool {
    source.pipe_controller().is_some_and(|controller| controller.remove_edge(destination.id(), PipeEdgeState::Detached))
  }

  /// Removes every edge of `source` and returns how many were removed.
  pub fn unpipe_all(source: &ReadableEndpoint<T>) -> usize {
    source.pipe_controller().map_or(0, |controller| controller.settle_all(|_| PipeEdgeState::Detached).len())
  }

  /// Returns the controller currently attached to `source`.
  #[must_use]
  pub fn of(source: &ReadableEndpoint<T>) -> Option<Self> {
    source.pipe_controller()
  }

  /// Returns the number of attached destinations.
  #[must_use]
  pub fn destinations(&self) -> usize {
    self.inner.with_read(|core| core.edges.len())
  }

  /// Returns the edges in attach order.
  #[must_use]
  pub fn edges(&self) -> Vec<PipeEdge> {
    self.inner.with_read(|core| core.edges.iter().map(|entry| entry.edge.clone()).collect())
  }

  /// Returns the source identifier.
  #[must_use]
  pub fn source_id(&self) -> EndpointId {
    self.inner.with_read(|core| core.source_id)
  }

  fn attach(source: &ReadableEndpoint<T>) -> Result<Self, StreamError> {
    let controller = Self { inner: LocalShared::new(PipeCore::new(source.downgrade(), source.id())) };
    let handler = {
      let weak = controller.inner.downgrade();
      Box::new(move |chunk: T| match weak.upgrade() {
        | Some(inner) => Self { inner }.on_data(chunk),
        | None => warn!("pipe data handler outlived its controller"),
      })
    };
    source.install_pipe(controller.clone(), handler)?;

    let ids = [
      source.on_end(Self::callback(controller.inner.downgrade(), |controller| controller.on_source_end())),
      source.on_error({
        let weak = controller.inner.downgrade();
        move |error: &StreamError| {
          if let Some(inner) = weak.upgrade() {
            Self { inner }.on_source_error(error);
          }
        }
      }),
      source.on_close(Self::callback(controller.inner.downgrade(), |controller| controller.on_source_close())),
    ];
    controller.inner.with_write(|core| core.source_listeners.extend(ids));
    trace!(source = %source.id(), "pipe controller created");
    Ok(controller)
  }

  fn callback(weak: LocalWeak<PipeCore<T>>, then: impl Fn(Self) + 'static) -> impl Fn() + 'static {
    move || {
      if let Some(inner) = weak.upgrade() {
        then(Self { inner });
      }
    }
  }

  fn watch_destination(&self, destination: &WritableEndpoint<T>) -> Vec<ListenerId> {
    let id = destination.id();
    let mut listeners = Vec::with_capacity(4);
    listeners.push(
      destination.on_drain(Self::callback(self.inner.downgrade(), move |controller| controller.on_drain(id))),
    );
    listeners.push(destination.on_error({
      let weak = self.inner.downgrade();
      move |error: &StreamError| {
        if let Some(inner) = weak.upgrade() {
          Self { inner }.on_destination_error(id, error);
        }
      }
    }));
    listeners.push(destination.on_finish(
      Self::callback(self.inner.downgrade(), move |controller| {
        controller.remove_edge(id, PipeEdgeState::Detached);
      }),
    ));
    listeners.push(destination.on_close(
      Self::callback(self.inner.downgrade(), move |controller| {
        controller.remove_edge(id, PipeEdgeState::Detached);
      }),
    ));
    listeners
  }

  fn source(&self) -> Option<ReadableEndpoint<T>> {
    self.inner.with_read(|core| core.source.upgrade())
  }

  fn on_data(&self, chunk: T) {
    let targets: Vec<(EndpointId, WritableEndpoint<T>)> = self.inner.with_read(|core| {
      core
        .edges
        .iter()
        .filter(|entry| !entry.edge.state().is_settled() && entry.destination.check_writable().is_ok())
        .map(|entry| (entry.edge.destination_id(), entry.destination.clone()))
        .collect()
    });
    let Some(source) = self.source() else {
      return;
    };
    if targets.is_empty() {
      // 転送先が無いチャンクは捨てずに戻す
      source.pause();
      if source.unshift(chunk).is_err() {
        trace!(source = %source.id(), "chunk dropped, source closed");
      }
      trace!(source = %source.id(), "no writable destination, chunk returned to source");
      return;
    }

    let last = targets.len() - 1;
    let mut chunk = Some(chunk);
    let mut saturated = Vec::new();
    for (index, (id, destination)) in targets.into_iter().enumerate() {
      let data = if index == last { chunk.take() } else { chunk.clone() };
      let Some(data) = data else {
        break;
      };
      if !destination.write(data, |_| {}) {
        saturated.push(id);
      }
    }
    if saturated.is_empty() {
      return;
    }
    self.inner.with_write(|core| {
      for entry in core.edges.iter_mut().filter(|entry| saturated.contains(&entry.edge.destination_id())) {
        entry.awaiting_drain = true;
        entry.edge.transition(PipeEdgeState::Paused);
      }
    });
    trace!(source = %source.id(), saturated = saturated.len(), "destination saturated, pausing source");
    source.pause();
  }

  fn on_drain(&self, destination: EndpointId) {
    let resume = self.inner.with_write(|core| {
      let Some(position) = core.position(destination) else {
        return false;
      };
      let entry = &mut core.edges[position];
      if entry.awaiting_drain {
        entry.awaiting_drain = false;
        if entry.edge.state() == PipeEdgeState::Paused {
          entry.edge.transition(PipeEdgeState::Active);
        }
      }
      !core.detached && !core.any_awaiting_drain()
    });
    if resume {
      if let Some(source) = self.source() {
        trace!(source = %source.id(), %destination, "destination drained, resuming source");
        if let Err(error) = source.resume() {
          debug!(source = %source.id(), %error, "pipe could not resume source");
        }
      }
    }
  }

  fn on_source_end(&self) {
    for entry in self.settle_all(|_| PipeEdgeState::Ended) {
      if !entry.options.propagate_end() {
        continue;
      }
      if let Err(error) = entry.destination.end(None) {
        trace!(destination = %entry.destination.id(), %error, "end not propagated");
      }
    }
  }

  fn on_source_error(&self, error: &StreamError) {
    for entry in self.settle_all(|_| PipeEdgeState::Failed) {
      if entry.options.propagate_error() {
        entry.destination.destroy(Some(error.clone()));
      }
    }
  }

  fn on_source_close(&self) {
    self.settle_all(|_| PipeEdgeState::Detached);
  }

  /// A failing destination stops the whole pipe; the source is left paused and intact.
  fn on_destination_error(&self, destination: EndpointId, error: &StreamError) {
    debug!(%destination, %error, "pipe destination failed, unpiping");
    self.settle_all(|entry| {
      if entry.edge.destination_id() == destination { PipeEdgeState::Failed } else { PipeEdgeState::Detached }
    });
  }

  /// Removes one edge; the controller detaches when it was the last one.
  fn remove_edge(&self, destination: EndpointId, state: PipeEdgeState) -> bool {
    let removed = self.inner.with_write(|core| {
      let position = core.position(destination)?;
      let entry = core.edges.remove(position);
      let resume = entry.awaiting_drain && !core.edges.is_empty() && !core.any_awaiting_drain();
      Some((entry, core.edges.is_empty(), resume))
    });
    let Some((entry, now_empty, resume)) = removed else {
      return false;
    };
    entry.release_listeners();
    entry.edge.transition(state);
    debug!(source = %entry.edge.source_id(), %destination, "pipe edge removed");
    if now_empty {
      self.detach_from_source();
    } else if resume {
      if let Some(source) = self.source() {
        if let Err(error) = source.resume() {
          debug!(source = %source.id(), %error, "pipe could not resume source");
        }
      }
    }
    true
  }

  /// Removes every edge, settling each with the state chosen by `settle`, and detaches.
  fn settle_all(&self, settle: impl Fn(&PipeEdgeEntry<T>) -> PipeEdgeState) -> Vec<PipeEdgeEntry<T>> {
    let entries = self.inner.with_write(|core| {
      if core.detached {
        return Vec::new();
      }
      mem::take(&mut core.edges)
    });
    for entry in &entries {
      entry.release_listeners();
      entry.edge.transition(settle(entry));
    }
    self.detach_from_source();
    entries
  }

  fn detach_from_source(&self) {
    let released = self.inner.with_write(|core| {
      if core.detached {
        return None;
      }
      core.detached = true;
      Some(mem::take(&mut core.source_listeners))
    });
    let Some(listeners) = released else {
      return;
    };
    if let Some(source) = self.source() {
      for id in listeners {
        source.remove_listener(id);
      }
      source.release_pipe(self);
      trace!(source = %source.id(), "pipe controller detached");
    }
  }
}

impl<T> PipeController<T> {
  pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
    self.inner.ptr_eq(&other.inner)
  }
}

impl<T> Clone for PipeController<T> {
  fn clone(&self) -> Self {
    Self { inner: self.inner.clone() }
  }
}

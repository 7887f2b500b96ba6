use alloc::vec::Vec;

use super::PipeEdgeEntry;
use crate::core::{EndpointId, ListenerId, WeakReadable};

/// Mutable state behind a [`PipeController`](crate::core::PipeController).
pub(crate) struct PipeCore<T> {
  pub(super) source:           WeakReadable<T>,
  pub(super) source_id:        EndpointId,
  pub(super) edges:            Vec<PipeEdgeEntry<T>>,
  pub(super) source_listeners: Vec<ListenerId>,
  pub(super) detached:         bool,
}

impl<T> PipeCore<T> {
  pub(super) const fn new(source: WeakReadable<T>, source_id: EndpointId) -> Self {
    Self { source, source_id, edges: Vec::new(), source_listeners: Vec::new(), detached: false }
  }

  pub(super) fn position(&self, destination: EndpointId) -> Option<usize> {
    self.edges.iter().position(|entry| entry.edge.destination_id() == destination)
  }

  pub(super) fn any_awaiting_drain(&self) -> bool {
    self.edges.iter().any(|entry| entry.awaiting_drain)
  }
}

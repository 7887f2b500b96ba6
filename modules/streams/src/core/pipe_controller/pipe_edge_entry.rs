use alloc::vec::Vec;

use crate::core::{ListenerId, PipeEdge, PipeOptions, WritableEndpoint};

/// Destination attached to a pipe controller.
pub(crate) struct PipeEdgeEntry<T> {
  pub(crate) edge:           PipeEdge,
  pub(crate) destination:    WritableEndpoint<T>,
  pub(crate) options:        PipeOptions,
  pub(crate) awaiting_drain: bool,
  pub(crate) listeners:      Vec<ListenerId>,
}

impl<T: 'static> PipeEdgeEntry<T> {
  /// Unregisters the controller's listeners from the destination.
  pub(crate) fn release_listeners(&self) {
    for id in &self.listeners {
      self.destination.remove_listener(*id);
    }
  }
}

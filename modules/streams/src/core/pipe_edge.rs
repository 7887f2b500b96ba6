#[cfg(test)]
mod tests;

use sluice_utils_rs::core::sync::{LocalShared, SharedAccess};

use super::{EndpointId, PipeEdgeState};

/// Observable handle of one source-to-destination pipe edge.
pub struct PipeEdge {
  state:       LocalShared<PipeEdgeState>,
  source:      EndpointId,
  destination: EndpointId,
}

impl PipeEdge {
  pub(crate) fn new(source: EndpointId, destination: EndpointId) -> Self {
    Self { state: LocalShared::new(PipeEdgeState::Active), source, destination }
  }

  /// Returns the current edge state.
  #[must_use]
  pub fn state(&self) -> PipeEdgeState {
    self.state.with_read(|state| *state)
  }

  /// Returns the source endpoint identifier.
  #[must_use]
  pub const fn source_id(&self) -> EndpointId {
    self.source
  }

  /// Returns the destination endpoint identifier.
  #[must_use]
  pub const fn destination_id(&self) -> EndpointId {
    self.destination
  }

  /// Moves to `next` unless the edge already settled.
  pub(crate) fn transition(&self, next: PipeEdgeState) {
    self.state.with_write(|state| {
      if !state.is_settled() {
        *state = next;
      }
    });
  }
}

impl Clone for PipeEdge {
  fn clone(&self) -> Self {
    Self { state: self.state.clone(), source: self.source, destination: self.destination }
  }
}

use super::PipeEdge;
use crate::core::{EndpointId, PipeEdgeState};

#[test]
fn settled_states_are_final() {
  let edge = PipeEdge::new(EndpointId::next(), EndpointId::next());
  assert_eq!(edge.state(), PipeEdgeState::Active);

  edge.transition(PipeEdgeState::Paused);
  assert_eq!(edge.state(), PipeEdgeState::Paused);
  edge.transition(PipeEdgeState::Failed);
  edge.transition(PipeEdgeState::Active);
  assert_eq!(edge.state(), PipeEdgeState::Failed);
}

#[test]
fn clones_observe_the_same_state() {
  let edge = PipeEdge::new(EndpointId::next(), EndpointId::next());
  let observer = edge.clone();
  edge.transition(PipeEdgeState::Detached);
  assert_eq!(observer.state(), PipeEdgeState::Detached);
  assert_eq!(observer.source_id(), edge.source_id());
  assert_ne!(observer.source_id(), observer.destination_id());
}

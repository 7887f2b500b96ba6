/// Consumption mode selected on a readable endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FlowMode {
  Unset,
  Flowing,
  Paused,
}

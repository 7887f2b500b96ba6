//! Scheduler drive outcome definitions.

/// Outcome of a single scheduler drive step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveOutcome {
  /// A task ran.
  Progressed,
  /// No task was pending.
  Idle,
}

/// Next step after an endpoint was marked closed.
pub(crate) enum CloseStep<P> {
  /// The callback owner is idle and must be torn down now.
  Teardown(P),
  /// The callback owner is running; teardown happens when it returns.
  AwaitIdle,
  /// Nothing to tear down; close can be finalized right away.
  Finalize,
}

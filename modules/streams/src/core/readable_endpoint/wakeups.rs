/// Deferred notifications planned while the endpoint was borrowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Wakeups {
  pub(crate) readable:  bool,
  pub(crate) flow:      bool,
  pub(crate) read_more: bool,
}

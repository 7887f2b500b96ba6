use crate::core::WriteCallback;

/// Buffered write waiting for the consumer.
pub(crate) struct PendingWrite<T> {
  pub(crate) chunk:    T,
  pub(crate) callback: WriteCallback,
}

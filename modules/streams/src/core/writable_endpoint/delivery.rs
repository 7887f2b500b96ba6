use alloc::vec::Vec;

/// Data dispatched to the consumer in one call.
pub(crate) enum Delivery<T> {
  Single(T),
  Batch(Vec<T>),
}

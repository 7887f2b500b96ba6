#[cfg(test)]
mod tests;

use core::fmt;

use portable_atomic::{AtomicU64, Ordering};

static NEXT_ENDPOINT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a readable or writable endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EndpointId(u64);

impl EndpointId {
  pub(crate) fn next() -> Self {
    Self(NEXT_ENDPOINT_ID.fetch_add(1, Ordering::Relaxed))
  }

  /// Returns the raw identifier value.
  #[must_use]
  pub const fn value(&self) -> u64 {
    self.0
  }
}

impl fmt::Display for EndpointId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "ep-{}", self.0)
  }
}

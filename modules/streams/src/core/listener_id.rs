use portable_atomic::{AtomicU64, Ordering};

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Handle of a registered event listener, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
  pub(crate) fn next() -> Self {
    Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
  }

  /// Returns the raw identifier value.
  #[must_use]
  pub const fn value(&self) -> u64 {
    self.0
  }
}

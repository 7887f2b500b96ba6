use sluice_utils_rs::core::sync::LocalWeak;

use super::{ReadableEndpoint, Scheduler, readable_endpoint::ReadableCore};

/// Non-owning handle to a readable endpoint.
pub(crate) struct WeakReadable<T> {
  inner:     LocalWeak<ReadableCore<T>>,
  scheduler: Scheduler,
}

impl<T: 'static> WeakReadable<T> {
  pub(crate) const fn new(inner: LocalWeak<ReadableCore<T>>, scheduler: Scheduler) -> Self {
    Self { inner, scheduler }
  }

  pub(crate) fn upgrade(&self) -> Option<ReadableEndpoint<T>> {
    self.inner.upgrade().map(|inner| ReadableEndpoint::from_parts(inner, self.scheduler.clone()))
  }
}

impl<T> Clone for WeakReadable<T> {
  fn clone(&self) -> Self {
    Self { inner: self.inner.clone(), scheduler: self.scheduler.clone() }
  }
}

use sluice_utils_rs::core::sync::LocalWeak;

use super::{Scheduler, WritableEndpoint, writable_endpoint::WritableCore};

/// Non-owning handle to a writable endpoint.
pub(crate) struct WeakWritable<T> {
  inner:     LocalWeak<WritableCore<T>>,
  scheduler: Scheduler,
}

impl<T: 'static> WeakWritable<T> {
  pub(crate) const fn new(inner: LocalWeak<WritableCore<T>>, scheduler: Scheduler) -> Self {
    Self { inner, scheduler }
  }

  pub(crate) fn upgrade(&self) -> Option<WritableEndpoint<T>> {
    self.inner.upgrade().map(|inner| WritableEndpoint::from_parts(inner, self.scheduler.clone()))
  }
}

impl<T> Clone for WeakWritable<T> {
  fn clone(&self) -> Self {
    Self { inner: self.inner.clone(), scheduler: self.scheduler.clone() }
  }
}

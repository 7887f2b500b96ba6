#[cfg(test)]
mod tests;

use super::{DoneCallback, Producer, PushHandle, StreamError};

/// Producer that drains an iterator of fallible items.
///
/// Each pull pushes items until the endpoint reports backpressure. An `Err` item destroys the
/// endpoint with that error and exhaustion signals end. The iterator is dropped on destroy.
pub struct IterProducer<I> {
  items: Option<I>,
}

impl<I> IterProducer<I> {
  /// Wraps `items`.
  #[must_use]
  pub const fn new(items: I) -> Self {
    Self { items: Some(items) }
  }

  /// Returns `true` until the iterator was exhausted, failed or released.
  #[must_use]
  pub const fn is_active(&self) -> bool {
    self.items.is_some()
  }
}

impl<T: 'static, I> Producer<T> for IterProducer<I>
where
  I: Iterator<Item = Result<T, StreamError>>,
{
  fn on_pull(&mut self, _requested: usize, handle: &PushHandle<T>) {
    let Some(items) = self.items.as_mut() else {
      return;
    };
    loop {
      match items.next() {
        | Some(Ok(item)) => {
          if !matches!(handle.push(item), Ok(true)) {
            return;
          }
        },
        | Some(Err(error)) => {
          self.items = None;
          handle.fail(error);
          return;
        },
        | None => {
          self.items = None;
          let _ = handle.push_end();
          return;
        },
      }
    }
  }

  fn on_destroy(&mut self, _reason: Option<&StreamError>, done: DoneCallback) {
    self.items = None;
    done.succeed();
  }
}

use alloc::{sync::Arc, task::Wake};
use core::{
  future::Future,
  pin::Pin,
  sync::atomic::{AtomicUsize, Ordering},
  task::{Context, Poll, Waker},
};

use sluice_utils_rs::core::sync::SettleOnce;

use super::Deferred;

struct CountingWaker(AtomicUsize);

impl Wake for CountingWaker {
  fn wake(self: Arc<Self>) {
    self.0.fetch_add(1, Ordering::SeqCst);
  }
}

#[test]
fn ready_values_are_taken_once() {
  let deferred = Deferred::ready(5_u8);
  assert!(deferred.is_settled());
  assert_eq!(deferred.try_take(), Some(5));
  assert_eq!(deferred.try_take(), None);
}

#[test]
fn poll_wakes_after_settlement() {
  let slot = SettleOnce::new();
  let mut deferred = Deferred::new(slot.clone());
  let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));
  let waker = Waker::from(counter.clone());
  let mut cx = Context::from_waker(&waker);

  assert_eq!(Pin::new(&mut deferred).poll(&mut cx), Poll::Pending);
  slot.settle("done");
  assert_eq!(counter.0.load(Ordering::SeqCst), 1);
  assert_eq!(Pin::new(&mut deferred).poll(&mut cx), Poll::Ready("done"));
}

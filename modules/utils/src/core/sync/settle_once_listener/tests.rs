use alloc::{sync::Arc, task::Wake};
use core::{
  future::Future,
  pin::Pin,
  sync::atomic::{AtomicUsize, Ordering},
  task::{Context, Poll, Waker},
};

use crate::core::sync::SettleOnce;

struct CountingWaker {
  wakes: AtomicUsize,
}

impl Wake for CountingWaker {
  fn wake(self: Arc<Self>) {
    self.wakes.fetch_add(1, Ordering::SeqCst);
  }
}

#[test]
fn listener_is_pending_until_settled() {
  let counter = Arc::new(CountingWaker { wakes: AtomicUsize::new(0) });
  let waker = Waker::from(counter.clone());
  let mut cx = Context::from_waker(&waker);

  let slot = SettleOnce::new();
  let mut listener = slot.listener();
  assert_eq!(Pin::new(&mut listener).poll(&mut cx), Poll::Pending);

  assert!(slot.settle(3_u8));
  assert_eq!(counter.wakes.load(Ordering::SeqCst), 1);
  assert_eq!(Pin::new(&mut listener).poll(&mut cx), Poll::Ready(3));
}

#[test]
fn listener_resolves_immediately_when_already_settled() {
  let waker = Waker::from(Arc::new(CountingWaker { wakes: AtomicUsize::new(0) }));
  let mut cx = Context::from_waker(&waker);

  let slot = SettleOnce::new();
  assert!(slot.settle("ready"));
  let mut listener = slot.listener();
  assert_eq!(Pin::new(&mut listener).poll(&mut cx), Poll::Ready("ready"));
}

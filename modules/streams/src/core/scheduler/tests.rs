use alloc::{rc::Rc, vec::Vec};
use core::cell::{Cell, RefCell};

use super::Scheduler;
use crate::core::DriveOutcome;

#[test]
fn tasks_run_in_fifo_order_only_when_driven() {
  let scheduler = Scheduler::new();
  let log = Rc::new(RefCell::new(Vec::new()));
  for tag in 0..3 {
    let log = log.clone();
    scheduler.schedule(move || log.borrow_mut().push(tag));
  }
  assert!(log.borrow().is_empty());
  assert_eq!(scheduler.pending_tasks(), 3);

  assert_eq!(scheduler.run_until_idle(), 3);
  assert_eq!(*log.borrow(), [0, 1, 2]);
  assert_eq!(scheduler.executed_tasks(), 3);
}

#[test]
fn nested_tasks_run_after_already_queued_ones() {
  let scheduler = Scheduler::new();
  let log = Rc::new(RefCell::new(Vec::new()));
  {
    let log = log.clone();
    let inner = scheduler.clone();
    scheduler.schedule(move || {
      log.borrow_mut().push("outer");
      let log = log.clone();
      inner.schedule(move || log.borrow_mut().push("nested"));
    });
  }
  {
    let log = log.clone();
    scheduler.schedule(move || log.borrow_mut().push("second"));
  }
  scheduler.run_until_idle();
  assert_eq!(*log.borrow(), ["outer", "second", "nested"]);
}

#[test]
fn drive_reports_idle_when_empty() {
  let scheduler = Scheduler::default();
  assert_eq!(scheduler.drive(), DriveOutcome::Idle);
  scheduler.schedule(|| {});
  assert_eq!(scheduler.drive(), DriveOutcome::Progressed);
  assert_eq!(scheduler.drive(), DriveOutcome::Idle);
}

#[test]
fn run_for_stops_at_the_limit() {
  let scheduler = Scheduler::new();
  for _ in 0..5 {
    scheduler.schedule(|| {});
  }
  assert_eq!(scheduler.run_for(2), 2);
  assert_eq!(scheduler.pending_tasks(), 3);
}

#[test]
fn wake_hook_fires_when_queue_leaves_idle() {
  let scheduler = Scheduler::new();
  let wakes = Rc::new(Cell::new(0));
  {
    let wakes = wakes.clone();
    scheduler.set_wake_hook(move || wakes.set(wakes.get() + 1));
  }
  scheduler.schedule(|| {});
  scheduler.schedule(|| {});
  assert_eq!(wakes.get(), 1);
  scheduler.run_until_idle();
  scheduler.schedule(|| {});
  assert_eq!(wakes.get(), 2);

  scheduler.clear_wake_hook();
  scheduler.run_until_idle();
  scheduler.schedule(|| {});
  assert_eq!(wakes.get(), 2);
  assert!(scheduler.ptr_eq(&scheduler.clone()));
}

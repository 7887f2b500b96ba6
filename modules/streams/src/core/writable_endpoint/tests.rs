use alloc::{rc::Rc, vec::Vec};
use core::cell::{Cell, RefCell};

use super::WritableEndpoint;
use crate::core::{Scheduler, StreamError, WritableConfig, WritableState, testing::TestConsumer};

type Outcomes = Rc<RefCell<Vec<(u32, Result<(), StreamError>)>>>;

fn record(outcomes: &Outcomes, tag: u32) -> impl FnOnce(Result<(), StreamError>) + 'static {
  let outcomes = outcomes.clone();
  move |result| outcomes.borrow_mut().push((tag, result))
}

#[test]
fn write_signals_backpressure_and_drain_follows_the_flush() {
  let scheduler = Scheduler::new();
  let consumer = TestConsumer::new();
  let writable =
    WritableEndpoint::objects(&scheduler, WritableConfig::new().with_high_water_mark(2), consumer.clone());
  let drains = Rc::new(Cell::new(0));
  {
    let drains = drains.clone();
    writable.on_drain(move || drains.set(drains.get() + 1));
  }

  assert!(writable.write(1_u32, |_| {}));
  assert!(!writable.write(2, |_| {}));
  assert!(writable.need_drain());
  assert_eq!(writable.state(), WritableState::Draining);

  scheduler.run_until_idle();
  assert_eq!(drains.get(), 1);
  assert!(!writable.need_drain());
  assert_eq!(writable.pending_cost(), 0);
  assert_eq!(consumer.written(), [1, 2]);
}

#[test]
fn write_callbacks_complete_in_order_on_a_later_tick() {
  let scheduler = Scheduler::new();
  let writable = WritableEndpoint::objects(&scheduler, WritableConfig::new(), TestConsumer::new());
  let outcomes = Outcomes::default();

  writable.write(1_u32, record(&outcomes, 1));
  writable.write(2, record(&outcomes, 2));
  assert!(outcomes.borrow().is_empty());

  scheduler.run_until_idle();
  assert_eq!(*outcomes.borrow(), [(1, Ok(())), (2, Ok(()))]);
}

#[test]
fn end_flushes_then_finishes_and_closes() {
  let scheduler = Scheduler::new();
  let consumer = TestConsumer::new();
  let writable = WritableEndpoint::objects(&scheduler, WritableConfig::new(), consumer.clone());
  let log = Rc::new(RefCell::new(Vec::new()));
  {
    let log = log.clone();
    writable.on_finish(move || log.borrow_mut().push("finish"));
  }
  {
    let log = log.clone();
    writable.on_close(move || log.borrow_mut().push("close"));
  }

  writable.write(1_u32, |_| {});
  writable.end(Some(2)).unwrap();
  assert_eq!(writable.state(), WritableState::Finishing);
  scheduler.run_until_idle();

  assert_eq!(consumer.written(), [1, 2]);
  assert_eq!(consumer.final_calls(), 1);
  assert_eq!(*log.borrow(), ["finish", "close"]);
  assert!(writable.is_finished());
  assert_eq!(consumer.destroyed(), Some(None));
}

#[test]
fn writes_after_end_are_rejected_through_the_callback() {
  let scheduler = Scheduler::new();
  let writable = WritableEndpoint::objects(&scheduler, WritableConfig::new(), TestConsumer::<u32>::manual());
  let outcomes = Outcomes::default();

  writable.end(None).unwrap();
  assert!(!writable.write(9, record(&outcomes, 9)));
  assert_eq!(*outcomes.borrow(), [(9, Err(StreamError::WriteAfterEnd))]);
  assert_eq!(writable.end(None), Ok(()));
  assert_eq!(writable.end(Some(10)), Err(StreamError::WriteAfterEnd));

  scheduler.run_until_idle();
  assert!(writable.is_finished());
  assert_eq!(writable.end(None), Err(StreamError::AlreadyFinished));
}

#[test]
fn writes_after_finish_report_a_closed_stream() {
  let scheduler = Scheduler::new();
  let writable = WritableEndpoint::objects(&scheduler, WritableConfig::new(), TestConsumer::<u32>::new());
  let outcomes = Outcomes::default();

  writable.end(None).unwrap();
  scheduler.run_until_idle();
  assert!(writable.is_finished());

  assert!(!writable.write(11, record(&outcomes, 11)));
  assert_eq!(*outcomes.borrow(), [(11, Err(StreamError::StreamClosed))]);
  assert_eq!(writable.buffered_writes(), 0);
}

#[test]
fn corked_writes_wait_for_the_last_uncork() {
  let scheduler = Scheduler::new();
  let consumer = TestConsumer::new();
  let writable = WritableEndpoint::objects(&scheduler, WritableConfig::new(), consumer.clone());

  writable.cork();
  writable.cork();
  writable.write(1_u32, |_| {});
  writable.write(2, |_| {});
  scheduler.run_until_idle();
  assert_eq!(consumer.write_count(), 0);
  assert_eq!(writable.state(), WritableState::Corked);

  writable.uncork();
  scheduler.run_until_idle();
  assert_eq!(consumer.write_count(), 0);

  writable.uncork();
  scheduler.run_until_idle();
  assert_eq!(consumer.written(), [1, 2]);
  assert_eq!(writable.cork_count(), 0);
}

#[test]
fn corked_backlog_is_flushed_as_one_batch() {
  let scheduler = Scheduler::new();
  let consumer = TestConsumer::new().with_batching();
  let writable = WritableEndpoint::objects(&scheduler, WritableConfig::new(), consumer.clone());
  let outcomes = Outcomes::default();

  writable.cork();
  for tag in 1..=3 {
    writable.write(tag, record(&outcomes, tag));
  }
  writable.uncork();
  scheduler.run_until_idle();

  assert_eq!(consumer.batches(), [3]);
  assert_eq!(*outcomes.borrow(), [(1, Ok(())), (2, Ok(())), (3, Ok(()))]);
}

#[test]
fn destroy_fails_buffered_and_in_flight_writes() {
  let scheduler = Scheduler::new();
  let consumer = TestConsumer::manual();
  let writable = WritableEndpoint::objects(&scheduler, WritableConfig::new(), consumer.clone());
  let outcomes = Outcomes::default();
  let closes = Rc::new(Cell::new(0));
  {
    let closes = closes.clone();
    writable.on_close(move || closes.set(closes.get() + 1));
  }

  writable.write(1_u32, record(&outcomes, 1));
  writable.write(2, record(&outcomes, 2));
  writable.destroy(None);
  writable.destroy(None);
  assert_eq!(*outcomes.borrow(), [(1, Err(StreamError::StreamClosed)), (2, Err(StreamError::StreamClosed))]);

  scheduler.run_until_idle();
  assert_eq!(closes.get(), 1);
  assert_eq!(writable.state(), WritableState::Destroyed);
  assert_eq!(writable.pending_cost(), 0);
  assert!(!writable.write(3, |_| {}));
}

#[test]
fn consumer_write_failure_errors_the_endpoint() {
  let scheduler = Scheduler::new();
  let error = StreamError::consumer("disk full");
  let consumer = TestConsumer::new().with_write_failure_at(0, error.clone());
  let writable = WritableEndpoint::objects(&scheduler, WritableConfig::new(), consumer);
  let outcomes = Outcomes::default();
  let seen = Rc::new(RefCell::new(Vec::new()));
  {
    let seen = seen.clone();
    writable.on_error(move |error| seen.borrow_mut().push(error.clone()));
  }

  writable.write(1_u32, record(&outcomes, 1));
  writable.write(2, record(&outcomes, 2));
  scheduler.run_until_idle();

  assert_eq!(*outcomes.borrow(), [(1, Err(error.clone())), (2, Err(error.clone()))]);
  assert_eq!(*seen.borrow(), [error.clone()]);
  assert_eq!(writable.error(), Some(error));
}

#[test]
fn failing_final_flush_errors_instead_of_finishing() {
  let scheduler = Scheduler::new();
  let error = StreamError::consumer("fsync failed");
  let writable = WritableEndpoint::objects(
    &scheduler,
    WritableConfig::new(),
    TestConsumer::<u32>::new().with_final_error(error.clone()),
  );
  let finished = Rc::new(Cell::new(false));
  {
    let finished = finished.clone();
    writable.on_finish(move || finished.set(true));
  }
  writable.on_error(|_| {});

  writable.end(None).unwrap();
  scheduler.run_until_idle();
  assert!(!finished.get());
  assert_eq!(writable.state(), WritableState::Errored);
}

#[test]
fn byte_writes_account_their_length() {
  let scheduler = Scheduler::new();
  let consumer = TestConsumer::manual();
  let writable = WritableEndpoint::<Vec<u8>>::bytes(
    &scheduler,
    WritableConfig::new().with_high_water_mark(8),
    consumer.clone(),
  );

  assert!(writable.write(b"abcd".to_vec(), |_| {}));
  assert!(!writable.write(b"efgh".to_vec(), |_| {}));
  assert_eq!(writable.pending_cost(), 8);
  assert_eq!(writable.buffered_writes(), 1);

  consumer.complete_next(Ok(()));
  scheduler.run_until_idle();
  assert_eq!(writable.pending_cost(), 4);
}

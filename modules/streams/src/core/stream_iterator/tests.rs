use core::{
  pin::Pin,
  task::{Context, Poll, Waker},
};

use futures_core::Stream;

use crate::core::{
  ConsumerKind, IterStep, IteratorOptions, ReadResult, ReadableConfig, ReadableEndpoint, ReadableState, Scheduler,
  StreamError,
};

fn source(scheduler: &Scheduler) -> ReadableEndpoint<&'static str> {
  ReadableEndpoint::objects(scheduler, ReadableConfig::new())
}

#[test]
fn buffered_values_resolve_immediately() {
  let scheduler = Scheduler::new();
  let readable = source(&scheduler);
  readable.push("a").unwrap();
  let iterator = readable.iterate(IteratorOptions::new()).unwrap();

  assert_eq!(iterator.next().try_take(), Some(Ok(IterStep::Item("a"))));
  assert_eq!(readable.consumer_kind(), Some(ConsumerKind::Iterating));
}

#[test]
fn queued_requests_settle_in_call_order() {
  let scheduler = Scheduler::new();
  let readable = source(&scheduler);
  let iterator = readable.iterate(IteratorOptions::new()).unwrap();
  let requests = [iterator.next(), iterator.next(), iterator.next()];
  assert_eq!(iterator.pending_requests(), 3);

  for value in ["A", "B", "C"] {
    readable.push(value).unwrap();
  }
  assert!(requests.iter().all(|request| !request.is_settled()));
  scheduler.run_until_idle();

  let values: alloc::vec::Vec<_> = requests.iter().map(|request| request.try_take()).collect();
  assert_eq!(values, [Some(Ok(IterStep::Item("A"))), Some(Ok(IterStep::Item("B"))), Some(Ok(IterStep::Item("C")))]);
  assert_eq!(iterator.pending_requests(), 0);
}

#[test]
fn end_of_data_yields_done_and_detaches() {
  let scheduler = Scheduler::new();
  let readable = source(&scheduler);
  let iterator = readable.iterate(IteratorOptions::new()).unwrap();
  let request = iterator.next();

  readable.push_end().unwrap();
  scheduler.run_until_idle();
  assert_eq!(request.try_take(), Some(Ok(IterStep::Done)));
  assert!(iterator.is_detached());
  assert_eq!(iterator.next().try_take(), Some(Ok(IterStep::Done)));
}

#[test]
fn source_error_is_sticky_for_later_requests() {
  let scheduler = Scheduler::new();
  let readable = source(&scheduler);
  let iterator = readable.iterate(IteratorOptions::new()).unwrap();
  let pending = iterator.next();
  let reason = StreamError::producer("checksum mismatch");

  readable.destroy(Some(reason.clone()));
  scheduler.run_until_idle();
  assert_eq!(pending.try_take(), Some(Err(reason.clone())));
  assert_eq!(iterator.next().try_take(), Some(Err(reason.clone())));
  assert_eq!(iterator.next().try_take(), Some(Err(reason)));
}

#[test]
fn destroy_without_reason_is_a_premature_close() {
  let scheduler = Scheduler::new();
  let readable = source(&scheduler);
  let iterator = readable.iterate(IteratorOptions::new()).unwrap();
  let pending = iterator.next();

  readable.destroy(None);
  scheduler.run_until_idle();
  assert_eq!(pending.try_take(), Some(Err(StreamError::PrematureClose)));
}

#[test]
fn early_return_destroys_the_source_and_settles_after_close() {
  let scheduler = Scheduler::new();
  let readable = source(&scheduler);
  readable.push("kept").unwrap();
  let iterator = readable.iterate(IteratorOptions::new()).unwrap();
  assert_eq!(iterator.next().try_take(), Some(Ok(IterStep::Item("kept"))));
  let pending = iterator.next();

  let returned = iterator.return_early(None);
  assert_eq!(pending.try_take(), Some(Ok(IterStep::Done)));
  assert!(!returned.is_settled());

  scheduler.run_until_idle();
  assert_eq!(returned.try_take(), Some(Ok(IterStep::Done)));
  assert_eq!(readable.state(), ReadableState::Destroyed);
  assert_eq!(iterator.next().try_take(), Some(Ok(IterStep::Done)));
}

#[test]
fn early_return_can_leave_the_source_alive() {
  let scheduler = Scheduler::new();
  let readable = source(&scheduler);
  readable.push("x").unwrap();
  let iterator = readable.iterate(IteratorOptions::new().with_destroy_on_return(false)).unwrap();

  assert_eq!(iterator.return_early(None).try_take(), Some(Ok(IterStep::Done)));
  assert!(iterator.is_detached());
  assert_eq!(readable.consumer_kind(), None);
  assert_eq!(readable.read(None), Ok(ReadResult::Data(alloc::vec!["x"])));
}

#[test]
fn a_second_iterator_conflicts_with_the_first() {
  let scheduler = Scheduler::new();
  let readable = source(&scheduler);
  let _first = readable.iterate(IteratorOptions::new()).unwrap();

  assert!(matches!(
    readable.iterate(IteratorOptions::new()),
    Err(StreamError::ModeConflict { active: ConsumerKind::Iterating })
  ));
}

#[test]
fn dropping_the_iterator_releases_the_source() {
  let scheduler = Scheduler::new();
  let readable = source(&scheduler);
  let iterator = readable.iterate(IteratorOptions::new()).unwrap();
  drop(iterator);

  assert_eq!(readable.consumer_kind(), None);
  assert!(readable.on_data(|_| {}).is_ok());
}

#[test]
fn polling_as_a_stream_ends_after_done() {
  let scheduler = Scheduler::new();
  let readable = source(&scheduler);
  readable.push("only").unwrap();
  readable.push_end().unwrap();
  let mut iterator = readable.iterate(IteratorOptions::new()).unwrap();
  let mut cx = Context::from_waker(Waker::noop());

  assert_eq!(Pin::new(&mut iterator).poll_next(&mut cx), Poll::Ready(Some(Ok(IterStep::Item("only")))));
  assert_eq!(Pin::new(&mut iterator).poll_next(&mut cx), Poll::Ready(None));
  assert_eq!(Pin::new(&mut iterator).poll_next(&mut cx), Poll::Ready(None));
}

#[test]
fn pending_poll_completes_once_data_arrives() {
  let scheduler = Scheduler::new();
  let readable = source(&scheduler);
  let mut iterator = readable.iterate(IteratorOptions::new()).unwrap();
  let mut cx = Context::from_waker(Waker::noop());

  assert_eq!(Pin::new(&mut iterator).poll_next(&mut cx), Poll::Pending);
  readable.push("late").unwrap();
  scheduler.run_until_idle();
  assert_eq!(Pin::new(&mut iterator).poll_next(&mut cx), Poll::Ready(Some(Ok(IterStep::Item("late")))));
}

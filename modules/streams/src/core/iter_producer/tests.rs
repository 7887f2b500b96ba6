use alloc::{rc::Rc, vec::Vec};
use core::cell::{Cell, RefCell};

use crate::core::{ReadResult, ReadableConfig, ReadableEndpoint, ReadableState, Scheduler, StreamError};

#[test]
fn iterator_source_flows_every_item_then_ends() {
  let scheduler = Scheduler::new();
  let readable = ReadableEndpoint::from_iter(&scheduler, ReadableConfig::new().with_high_water_mark(2), 1_u32..=5);
  let log = Rc::new(RefCell::new(Vec::new()));
  {
    let log = log.clone();
    readable.on_data(move |chunk| log.borrow_mut().push(chunk)).unwrap();
  }
  let ended = Rc::new(Cell::new(false));
  {
    let ended = ended.clone();
    readable.on_end(move || ended.set(true));
  }

  scheduler.run_until_idle();
  assert_eq!(*log.borrow(), [1, 2, 3, 4, 5]);
  assert!(ended.get());
  assert!(readable.close_emitted());
  assert!(readable.is_object_mode());
}

#[test]
fn pulls_stop_at_the_high_water_mark() {
  let scheduler = Scheduler::new();
  let consumed = Rc::new(Cell::new(0));
  let items = {
    let consumed = consumed.clone();
    (1_u32..=10).inspect(move |_| consumed.set(consumed.get() + 1))
  };
  let readable = ReadableEndpoint::from_iter(&scheduler, ReadableConfig::new().with_high_water_mark(2), items);

  assert_eq!(readable.read(None), Ok(ReadResult::Data(alloc::vec![1])));
  assert_eq!(consumed.get(), 2);
  assert_eq!(readable.buffered_chunks(), 1);
}

#[test]
fn failing_item_errors_the_endpoint_after_earlier_items() {
  let scheduler = Scheduler::new();
  let failure = StreamError::producer("source unavailable");
  let items = [Ok(1_u32), Ok(2), Err(failure.clone()), Ok(3)];
  let readable = ReadableEndpoint::try_from_iter(&scheduler, ReadableConfig::new(), items);
  let errors = Rc::new(RefCell::new(Vec::new()));
  {
    let errors = errors.clone();
    readable.on_error(move |error| errors.borrow_mut().push(error.clone()));
  }

  assert_eq!(readable.read(None), Err(failure.clone()));
  scheduler.run_until_idle();
  assert_eq!(readable.state(), ReadableState::Errored);
  assert_eq!(*errors.borrow(), [failure]);
}

#[test]
fn destroy_releases_the_iterator() {
  let scheduler = Scheduler::new();
  let token = Rc::new(());
  let items = {
    let held = token.clone();
    core::iter::repeat(7_u32).take(3).map(move |value| {
      let _ = &held;
      value
    })
  };
  let readable = ReadableEndpoint::from_iter(&scheduler, ReadableConfig::new(), items);
  assert_eq!(Rc::strong_count(&token), 2);

  readable.destroy(None);
  scheduler.run_until_idle();
  assert_eq!(Rc::strong_count(&token), 1);
  assert!(readable.close_emitted());
}

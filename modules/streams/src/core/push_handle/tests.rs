use crate::core::{ReadResult, ReadableConfig, ReadableEndpoint, Scheduler, StreamError};

#[test]
fn delivers_into_the_live_endpoint() {
  let scheduler = Scheduler::new();
  let readable = ReadableEndpoint::<u32>::objects(&scheduler, ReadableConfig::new().with_high_water_mark(2));
  let handle = super::PushHandle::new(readable.downgrade());

  assert_eq!(handle.push(1), Ok(true));
  assert_eq!(handle.push(2), Ok(false));
  assert_eq!(handle.push_end(), Ok(()));
  assert!(!handle.is_closed());
  assert_eq!(readable.read(None), Ok(ReadResult::Data(alloc::vec![1])));
}

#[test]
fn fail_destroys_with_the_given_error() {
  let scheduler = Scheduler::new();
  let readable = ReadableEndpoint::<u32>::objects(&scheduler, ReadableConfig::new());
  readable.on_error(|_| {});
  let handle = super::PushHandle::new(readable.downgrade());

  handle.fail(StreamError::producer("socket reset"));
  assert!(handle.is_closed());
  assert_eq!(handle.push(1), Err(StreamError::producer("socket reset")));
}

#[test]
fn dropped_endpoint_reports_closed() {
  let scheduler = Scheduler::new();
  let readable = ReadableEndpoint::<u32>::objects(&scheduler, ReadableConfig::new());
  let handle = super::PushHandle::new(readable.downgrade());
  drop(readable);

  assert!(handle.is_closed());
  assert_eq!(handle.push(1), Err(StreamError::StreamClosed));
  assert_eq!(handle.push_end(), Err(StreamError::StreamClosed));
}

use super::TestProducer;
use crate::core::{ReadResult, ReadableConfig, ReadableEndpoint, ReadableState, Scheduler, StreamError};

#[test]
fn serves_one_item_per_pull_then_ends() {
  let scheduler = Scheduler::new();
  let producer = TestProducer::new([1_u32, 2]);
  let readable = ReadableEndpoint::objects(&scheduler, ReadableConfig::new()).with_producer(producer.clone());

  assert_eq!(readable.read(None), Ok(ReadResult::Data(alloc::vec![1])));
  assert_eq!(producer.remaining(), 1);
  assert_eq!(readable.read(None), Ok(ReadResult::Data(alloc::vec![2])));
  assert_eq!(readable.read(None), Ok(ReadResult::Ended));
  assert_eq!(producer.pulls(), 2);

  scheduler.run_until_idle();
  assert!(readable.end_emitted());
}

#[test]
fn scripted_failure_destroys_the_endpoint() {
  let scheduler = Scheduler::new();
  let error = StreamError::producer("disk unplugged");
  let producer = TestProducer::<u32>::new([]).with_failure(error.clone());
  let readable = ReadableEndpoint::objects(&scheduler, ReadableConfig::new()).with_producer(producer.clone());
  readable.on_error(|_| {});

  assert_eq!(readable.read(None), Err(error.clone()));
  scheduler.run_until_idle();
  assert_eq!(readable.state(), ReadableState::Errored);
  assert_eq!(producer.destroyed(), Some(Some(error)));
  assert!(readable.close_emitted());
}

#[test]
fn held_destroy_delays_close_until_released() {
  let scheduler = Scheduler::new();
  let producer = TestProducer::<u32>::new([]).without_end().holding_destroy();
  let readable = ReadableEndpoint::objects(&scheduler, ReadableConfig::new()).with_producer(producer.clone());

  readable.destroy(None);
  scheduler.run_until_idle();
  assert_eq!(producer.destroyed(), Some(None));
  assert!(!readable.close_emitted());

  assert!(producer.release_destroy());
  scheduler.run_until_idle();
  assert!(readable.close_emitted());
  assert!(!producer.release_destroy());
}

extern crate std;

use std::{cell::Cell, rc::Rc, time::Duration};

use super::drive_until;
use crate::core::{
  IterStep, IteratorOptions, ReadableConfig, ReadableEndpoint, Scheduler, WritableConfig, WritableEndpoint,
  testing::TestConsumer,
};

#[tokio::test(flavor = "current_thread")]
async fn resolves_iteration_requests_settled_by_scheduled_tasks() {
  let scheduler = Scheduler::new();
  let readable = ReadableEndpoint::<u32>::objects(&scheduler, ReadableConfig::new());
  let iterator = readable.iterate(IteratorOptions::new()).unwrap();
  let request = iterator.next();
  readable.push(42).unwrap();

  let step = drive_until(&scheduler, request).await;
  assert_eq!(step, Ok(IterStep::Item(42)));
}

#[tokio::test(flavor = "current_thread")]
async fn wakes_up_for_tasks_scheduled_while_parked() {
  let scheduler = Scheduler::new();
  let readable = ReadableEndpoint::<u32>::objects(&scheduler, ReadableConfig::new());
  let iterator = readable.iterate(IteratorOptions::new()).unwrap();
  let request = iterator.next();

  let producer = async {
    tokio::time::sleep(Duration::from_millis(5)).await;
    readable.push(7).unwrap();
  };
  let (step, ()) = tokio::join!(drive_until(&scheduler, request), producer);
  assert_eq!(step, Ok(IterStep::Item(7)));
}

#[tokio::test(flavor = "current_thread")]
async fn drives_a_pipe_to_completion() {
  let scheduler = Scheduler::new();
  let readable = ReadableEndpoint::<u32>::objects(&scheduler, ReadableConfig::new());
  let consumer = TestConsumer::new();
  let writable = WritableEndpoint::objects(&scheduler, WritableConfig::new(), consumer.clone());
  let finished = Rc::new(Cell::new(false));
  let (settle, done) = tokio::sync::oneshot::channel::<()>();
  let settle = Rc::new(Cell::new(Some(settle)));
  {
    let finished = finished.clone();
    writable.on_finish(move || {
      finished.set(true);
      if let Some(settle) = settle.take() {
        let _ = settle.send(());
      }
    });
  }

  readable.pipe(&writable, crate::core::PipeOptions::new()).unwrap();
  for value in 0..10 {
    readable.push(value).unwrap();
  }
  readable.push_end().unwrap();
  drive_until(&scheduler, done).await.unwrap();

  assert!(finished.get());
  assert_eq!(consumer.written(), (0..10).collect::<std::vec::Vec<_>>());
}

#[tokio::test(flavor = "current_thread")]
async fn pending_tasks_run_before_a_ready_future_returns() {
  let scheduler = Scheduler::new();
  let ran = Rc::new(Cell::new(false));
  {
    let ran = ran.clone();
    scheduler.schedule(move || ran.set(true));
  }

  drive_until(&scheduler, async {}).await;
  assert!(ran.get());
  assert_eq!(scheduler.pending_tasks(), 0);
}

#![cfg(feature = "std")]

use sluice_streams_rs::{
  core::{IterStep, IteratorOptions, ReadableConfig, ReadableEndpoint, Scheduler, testing::TestProducer},
  std::drive_until,
};

#[tokio::test(flavor = "current_thread")]
async fn iterator_awaits_a_pull_driven_producer_to_the_end() {
  let scheduler = Scheduler::new();
  let producer = TestProducer::new(1_u32..=5);
  let readable = ReadableEndpoint::objects(&scheduler, ReadableConfig::new().with_high_water_mark(2))
    .with_producer(producer.clone());
  let iterator = readable.iterate(IteratorOptions::new()).unwrap();

  let collected = drive_until(&scheduler, async {
    let mut collected = Vec::new();
    while let IterStep::Item(value) = iterator.next().await.unwrap() {
      collected.push(value);
    }
    collected
  })
  .await;

  assert_eq!(collected, [1, 2, 3, 4, 5]);
  assert_eq!(producer.remaining(), 0);
  drive_until(&scheduler, async {}).await;
  assert!(readable.close_emitted());
}

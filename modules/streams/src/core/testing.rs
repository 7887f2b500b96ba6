//! Test utilities for endpoint verification.

mod test_consumer;
mod test_producer;

pub use test_consumer::TestConsumer;
pub use test_producer::TestProducer;

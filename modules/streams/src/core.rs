//! Core stream engine types.

mod chunk;
mod chunk_mode;
mod chunk_queue;
mod chunk_sizing;
mod close_step;
mod consumer;
mod consumer_kind;
mod deferred;
mod done_callback;
mod drive_outcome;
mod endpoint_id;
mod iter_producer;
mod iter_step;
mod iterator_options;
mod listener_id;
mod listener_list;
mod pipe_controller;
mod pipe_edge;
mod pipe_edge_state;
mod pipe_options;
mod producer;
mod push_handle;
mod read_request;
mod read_result;
mod readable_config;
mod readable_endpoint;
mod readable_state;
mod scheduler;
mod stream_error;
mod stream_iterator;
/// Test probes for exercising endpoints.
pub mod testing;
mod weak_readable;
mod weak_writable;
mod writable_config;
mod writable_endpoint;
mod writable_state;

pub use chunk::Chunk;
pub use chunk_mode::ChunkMode;
pub use chunk_queue::ChunkQueue;
pub(crate) use chunk_sizing::ChunkSizing;
pub use consumer::Consumer;
pub use consumer_kind::ConsumerKind;
pub use deferred::Deferred;
pub use done_callback::DoneCallback;
pub use drive_outcome::DriveOutcome;
pub use endpoint_id::EndpointId;
pub use iter_producer::IterProducer;
pub use iter_step::IterStep;
pub use iterator_options::IteratorOptions;
pub use listener_id::ListenerId;
pub(crate) use listener_list::ListenerList;
pub use pipe_controller::PipeController;
pub use pipe_edge::PipeEdge;
pub use pipe_edge_state::PipeEdgeState;
pub use pipe_options::PipeOptions;
pub use producer::Producer;
pub use push_handle::PushHandle;
pub(crate) use read_request::ReadRequest;
pub use read_result::ReadResult;
pub use readable_config::{MAX_HIGH_WATER_MARK, ReadableConfig};
pub use readable_endpoint::ReadableEndpoint;
pub use readable_state::ReadableState;
pub use scheduler::Scheduler;
pub use stream_error::StreamError;
pub use stream_iterator::{NextResult, StreamIterator};
pub(crate) use weak_readable::WeakReadable;
pub(crate) use weak_writable::WeakWritable;
pub use writable_config::WritableConfig;
pub use writable_endpoint::{WritableEndpoint, WriteCallback};
pub use writable_state::WritableState;

/// Default high-water mark, in bytes, for byte-mode endpoints.
pub const DEFAULT_BYTE_HIGH_WATER_MARK: usize = 64 * 1024;
/// Default high-water mark, in chunks, for object-mode endpoints.
pub const DEFAULT_OBJECT_HIGH_WATER_MARK: usize = 16;

/// Single-threaded sharing and one-shot settlement primitives.
pub mod sync;

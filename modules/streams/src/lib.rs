#![deny(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone))]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(clippy::redundant_field_names)]
#![deny(clippy::needless_borrow)]
#![deny(clippy::manual_let_else)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::print_stdout)]
#![deny(clippy::dbg_macro)]
#![deny(clippy::must_use_candidate)]
#![no_std]

//! Push/pull hybrid stream engine.
//!
//! Producers push chunks into a [`ReadableEndpoint`](crate::core::ReadableEndpoint), consumers
//! drain a [`WritableEndpoint`](crate::core::WritableEndpoint), and a
//! [`PipeController`](crate::core::PipeController) moves data between the two while honouring
//! backpressure. Every callback runs on a cooperative [`Scheduler`](crate::core::Scheduler), so the
//! whole engine is single-threaded and deterministic.

extern crate alloc;

/// Core (`no_std`) stream engine.
pub mod core;
/// Host integration helpers that depend on the standard library.
#[cfg(feature = "std")]
pub mod std;

//! # psalm-observability
//!
//! Structured tracing for the retrieval engine: subscriber setup, span
//! definitions, and named lifecycle events.

pub mod tracing_setup;

pub use tracing_setup::{events, init_tracing, init_tracing_with_filter};

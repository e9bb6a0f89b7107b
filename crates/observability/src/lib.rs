//! Tracing and logging setup shared by the binaries.

pub mod subscriber;

pub use subscriber::{LogFormat, init};

//! Debug utilities for tracing allocations.
//!
//! Only compiled when the `debug` feature is enabled.

pub(crate) mod backtrace;

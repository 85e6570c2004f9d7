//! Public API for objtrace.
//!
//! This module contains all user-facing types and functions.
//! Most users only need [`Tracer`](tracer::Tracer) and the host types.

pub mod config;
pub mod event;
pub mod host;
pub mod info;
pub mod query;
pub mod scope;
pub mod stats;
pub mod tracer;

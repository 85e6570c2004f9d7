//! Tracer internals: string pool, allocation table, event handlers and
//! the session stack.

pub(crate) mod handlers;
pub(crate) mod pool;
pub(crate) mod session;
pub(crate) mod table;

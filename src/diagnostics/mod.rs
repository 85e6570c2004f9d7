//! Runtime diagnostics for the tracer.
//!
//! Anomalies in the host's event stream never fail an event handler. They
//! are reported here as coded diagnostics and the handler carries on.
//!
//! ## Diagnostic Codes
//!
//! | Code  | Meaning                        |
//! |-------|--------------------------------|
//! | OT0xx | Session stack issues           |
//! | OT1xx | Event handler issues           |
//! | OT2xx | String pool issues             |
//! | OT9xx | Internal errors                |
//!
//! Set `OBJTRACE_STRICT=1` (and call [`init_from_env`]) to turn errors into
//! panics, which is useful when a test suite runs under tracing.

pub(crate) mod deferred;
pub mod emit;
pub mod kind;
pub mod macros;
pub mod strict;

pub use emit::{
    emit, emit_with_context, set_sink, set_verbose, suppress_diagnostics, CollectingSink,
    DiagnosticSink,
};
pub use kind::{Diagnostic, DiagnosticKind};
pub use strict::{init_from_env, set_strict_mode, strict_mode, StrictMode, StrictModeGuard};

pub use kind::{OT001, OT002, OT101, OT201, OT901};

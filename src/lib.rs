//! # objtrace
//!
//! Allocation provenance tracing for managed-memory runtimes.
//!
//! The host runtime reports every object creation and destruction to a
//! [`Tracer`]. While a tracing session is active, the tracer keeps one record
//! per live object (source file and line, defining class, allocating method
//! and collector generation) and answers point queries about it.
//!
//! ## Features
//!
//! - Nested tracing sessions with guaranteed teardown, including on panic
//! - Reference-counted interning of source and class paths
//! - Point queries for any live traced object
//! - Duplicate-creation detection instead of silently leaking records
//! - Coded runtime diagnostics with an optional strict mode
//! - Optional allocation-site backtraces (`debug` feature)
//!
//! ## Quick Start
//!
//! ```rust
//! use std::borrow::Cow;
//! use objtrace::{ClassRef, NewObjectEvent, ObjectId, Runtime, Tracer};
//!
//! struct Vm;
//!
//! impl Runtime for Vm {
//!     fn gc_count(&self) -> u64 { 0 }
//!     fn class_path(&self, _: ClassRef) -> Option<Cow<'_, str>> { None }
//! }
//!
//! let tracer = Tracer::new(Vm);
//!
//! tracer.start_tracing(|| {
//!     // The host forwards its collector events:
//!     tracer.on_new_object(NewObjectEvent::new(ObjectId(0xA)).at("a.rb", 10));
//!
//!     assert_eq!(tracer.query_source_file(ObjectId(0xA)).as_deref(), Some("a.rb"));
//!     assert_eq!(tracer.query_source_line(ObjectId(0xA)), Some(10));
//!
//!     tracer.on_free_object(ObjectId(0xA));
//!     assert_eq!(tracer.query_source_file(ObjectId(0xA)), None);
//! });
//! ```

pub mod api;
pub mod diagnostics;

mod core;
mod sync;
mod util;

#[cfg(feature = "debug")]
mod debug;

// Re-export public API at crate root for convenience
pub use api::config::{DuplicatePolicy, TraceConfig};
pub use api::event::{FreeObjectOutcome, NewObjectEvent, NewObjectOutcome};
pub use api::host::{ClassRef, MethodId, ObjectId, Runtime};
pub use api::info::AllocationInfo;
pub use api::scope::{TeardownSummary, TraceGuard};
pub use api::stats::TraceStats;
pub use api::tracer::Tracer;

// Diagnostics
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use diagnostics::{set_strict_mode, StrictMode, StrictModeGuard};
pub use diagnostics::{OT001, OT002, OT101, OT201, OT901};

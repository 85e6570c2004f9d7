//! Scope guards for RAII-style session management.

use crate::api::host::Runtime;
use crate::api::stats::TraceStats;
use crate::api::tracer::Tracer;

/// A guard that keeps one tracing session active.
///
/// When dropped, the session is torn down: its handlers are disabled, every
/// remaining record and interned string is freed, and the previously active
/// session (if any) becomes active again. Drop runs during unwinding too, so
/// teardown happens on every exit path from the traced scope.
///
/// # Example
///
/// ```rust
/// use std::borrow::Cow;
/// use objtrace::{ClassRef, NewObjectEvent, ObjectId, Runtime, Tracer};
///
/// struct Vm;
///
/// impl Runtime for Vm {
///     fn gc_count(&self) -> u64 { 0 }
///     fn class_path(&self, _: ClassRef) -> Option<Cow<'_, str>> { None }
/// }
///
/// let tracer = Tracer::new(Vm);
/// {
///     let _scope = tracer.trace_scope();
///     tracer.on_new_object(NewObjectEvent::new(ObjectId(1)).at("a.rb", 10));
///     assert_eq!(tracer.query_source_line(ObjectId(1)), Some(10));
/// }
/// assert_eq!(tracer.query_source_line(ObjectId(1)), None);
/// ```
#[must_use = "the session ends as soon as the guard is dropped"]
pub struct TraceGuard<R: Runtime> {
    tracer: Tracer<R>,
    session_id: u64,
    depth: usize,
}

impl<R: Runtime> TraceGuard<R> {
    pub(crate) fn new(tracer: Tracer<R>, session_id: u64, depth: usize) -> Self {
        Self {
            tracer,
            session_id,
            depth,
        }
    }

    /// Id of the session this guard keeps alive.
    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    /// Stack depth at which the session was started (1 = outermost).
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl<R: Runtime> Drop for TraceGuard<R> {
    fn drop(&mut self) {
        self.tracer.end_session(self.session_id);
    }
}

/// What a session teardown freed, and the state it left behind.
///
/// `table_len_after`, `pool_len_after` and `handlers_enabled_after` are
/// always zero/false after a correct teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeardownSummary {
    /// Session that was torn down.
    pub session_id: u64,
    /// Stack depth the session occupied.
    pub depth: usize,
    /// Records freed because no destruction event arrived in time.
    pub records_drained: usize,
    /// Strings still pooled after the records were drained.
    pub strings_drained: usize,
    /// Allocation table size after teardown.
    pub table_len_after: usize,
    /// String pool size after teardown.
    pub pool_len_after: usize,
    /// Whether handlers were still enabled after teardown.
    pub handlers_enabled_after: bool,
    /// Session counters as they stood just before teardown.
    pub stats: TraceStats,
}

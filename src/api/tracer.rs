//! The tracer context.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::api::config::TraceConfig;
use crate::api::event::{FreeObjectOutcome, NewObjectEvent, NewObjectOutcome};
use crate::api::host::{ObjectId, Runtime};
use crate::api::scope::{TeardownSummary, TraceGuard};
use crate::api::stats::TraceStats;
use crate::core::handlers::{self, ResolvedNewObject};
use crate::core::session::SessionStack;
use crate::diagnostics::deferred;
use crate::ot_emit;
use crate::sync::atomics::{AtomicCounter, DepthGauge};
use crate::sync::mutex::{Mutex, MutexGuard};

/// Allocation tracer bound to one host runtime.
///
/// This is the explicit context every event and query goes through. It owns
/// the session stack; whichever session is on top is the active one and
/// receives creation events and queries. Destruction events reach every
/// session on the stack. It is
/// cheap to clone (internally uses `Arc`) and thread-safe: all session state
/// sits behind a single lock taken once per event or query.
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
///     fn gc_count(&self) -> u64 { 7 }
///     fn class_path(&self, _: ClassRef) -> Option<Cow<'_, str>> { Some("Widget".into()) }
/// }
///
/// let tracer = Tracer::new(Vm);
///
/// let line = tracer.start_tracing(|| {
///     tracer.on_new_object(NewObjectEvent::new(ObjectId(1)).at("a.rb", 10).defined_in(ClassRef(1)));
///     tracer.query_source_line(ObjectId(1))
/// });
///
/// assert_eq!(line, Some(10));
/// assert!(!tracer.is_tracing());
/// ```
pub struct Tracer<R: Runtime> {
    inner: Arc<TracerInner<R>>,
}

struct TracerInner<R> {
    runtime: R,
    config: TraceConfig,
    stack: Mutex<SessionStack>,
    depth: DepthGauge,
    hooks_enabled: AtomicBool,
    sessions_started: AtomicCounter,
    ignored_events: AtomicCounter,
}

impl<R: Runtime> Clone for Tracer<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Runtime> Tracer<R> {
    /// Create a tracer with the default configuration.
    pub fn new(runtime: R) -> Self {
        Self::with_config(runtime, TraceConfig::default())
    }

    /// Create a tracer with the given configuration.
    pub fn with_config(runtime: R, config: TraceConfig) -> Self {
        Self {
            inner: Arc::new(TracerInner {
                runtime,
                config,
                stack: Mutex::new(SessionStack::default()),
                depth: DepthGauge::new(),
                hooks_enabled: AtomicBool::new(false),
                sessions_started: AtomicCounter::default(),
                ignored_events: AtomicCounter::default(),
            }),
        }
    }

    /// The host runtime.
    pub fn runtime(&self) -> &R {
        &self.inner.runtime
    }

    /// The configuration.
    pub fn config(&self) -> &TraceConfig {
        &self.inner.config
    }

    pub(crate) fn lock_stack(&self) -> MutexGuard<'_, SessionStack> {
        self.inner.stack.lock()
    }

    // =========================================================================
    // Session stack
    // =========================================================================

    /// Run `body` with a fresh tracing session active.
    ///
    /// Returns whatever `body` returns, so a `Result` from the body comes
    /// back unchanged. The session is torn down exactly once before this
    /// returns, and also when `body` panics.
    pub fn start_tracing<F, T>(&self, body: F) -> T
    where
        F: FnOnce() -> T,
    {
        let _guard = self.trace_scope();
        body()
    }

    /// Start a session and return the guard that ends it.
    ///
    /// Events and queries go to this session until it is dropped or a
    /// nested session starts.
    pub fn trace_scope(&self) -> TraceGuard<R> {
        let (session_id, depth) = {
            let mut stack = self.lock_stack();
            let session_id = stack.push(&self.inner.config);
            let depth = stack.depth();
            self.inner.depth.set(depth);

            // Under the lock so a concurrent teardown can't disable hooks
            // after this session enabled them.
            if depth == 1 {
                self.inner.runtime.set_event_hooks(true);
                self.inner.hooks_enabled.store(true, Ordering::Relaxed);
            }
            (session_id, depth)
        };

        self.inner.sessions_started.increment();

        #[cfg(feature = "log")]
        log::debug!("objtrace: session {} started at depth {}", session_id, depth);

        TraceGuard::new(self.clone(), session_id, depth)
    }

    /// Tear down `session_id` and anything nested inside it.
    pub(crate) fn end_session(&self, session_id: u64) {
        let (summaries, pending) = {
            let mut stack = self.lock_stack();
            if !stack.contains(session_id) {
                return;
            }

            let summaries = stack.end(session_id);
            self.inner.depth.set(stack.depth());

            if !stack.hooks_enabled() {
                self.inner.runtime.set_event_hooks(false);
                self.inner.hooks_enabled.store(false, Ordering::Relaxed);
            }
            (summaries, stack.take_deferred())
        };

        deferred::flush(pending);

        for summary in &summaries {
            if summary.strings_drained > 0 {
                ot_emit!(
                    OT002,
                    "session {} kept {} strings",
                    summary.session_id,
                    summary.strings_drained
                );
            }
        }

        if summaries.len() > 1 {
            ot_emit!(
                OT001,
                "session {} ended with {} nested sessions still active",
                session_id,
                summaries.len() - 1
            );
        }

        #[cfg(feature = "log")]
        for summary in &summaries {
            log::debug!(
                "objtrace: session {} ended at depth {}, drained {} records",
                summary.session_id,
                summary.depth,
                summary.records_drained
            );
        }
    }

    // =========================================================================
    // Event handlers
    // =========================================================================

    /// Deliver an object-creation event.
    ///
    /// Host lookups (class path, generation counter) run before the session
    /// lock is taken, so a host that allocates while resolving a class path
    /// re-enters safely.
    pub fn on_new_object(&self, event: NewObjectEvent<'_>) -> NewObjectOutcome {
        if self.inner.depth.get() == 0 {
            self.inner.ignored_events.increment();
            return NewObjectOutcome::Inactive;
        }

        let runtime = &self.inner.runtime;
        let class_path = if self.inner.config.capture_class_paths {
            event.defined_class.and_then(|class| runtime.class_path(class))
        } else {
            None
        };

        let resolved = ResolvedNewObject {
            object: event.object,
            path: event.path,
            line: event.line,
            method_id: event.method_id,
            class_path: class_path.as_deref(),
            generation: runtime.gc_count(),
            #[cfg(feature = "debug")]
            backtrace: self
                .inner
                .config
                .capture_backtraces
                .then(crate::debug::backtrace::capture),
        };

        let (outcome, pending) = {
            let mut stack = self.lock_stack();
            let outcome = match stack.active_mut() {
                Some(session) => handlers::on_new_object(session, resolved, self.inner.config.duplicate_policy),
                None => {
                    self.inner.ignored_events.increment();
                    NewObjectOutcome::Inactive
                }
            };
            (outcome, stack.take_deferred())
        };

        deferred::flush(pending);
        outcome
    }

    /// Deliver an object-destruction event.
    ///
    /// Unlike creation events this reaches every session on the stack: an
    /// outer session must not keep a record for an identity the collector
    /// may hand out again. Returns `Released` if any session held the object.
    pub fn on_free_object(&self, object: ObjectId) -> FreeObjectOutcome {
        if self.inner.depth.get() == 0 {
            self.inner.ignored_events.increment();
            return FreeObjectOutcome::Inactive;
        }

        let (outcome, pending) = {
            let mut stack = self.lock_stack();
            if stack.depth() == 0 {
                self.inner.ignored_events.increment();
                return FreeObjectOutcome::Inactive;
            }

            let mut outcome = FreeObjectOutcome::Untracked;
            for session in stack.sessions_mut() {
                if handlers::on_free_object(session, object) == FreeObjectOutcome::Released {
                    outcome = FreeObjectOutcome::Released;
                }
            }
            (outcome, stack.take_deferred())
        };

        deferred::flush(pending);
        outcome
    }

    // =========================================================================
    // Probes
    // =========================================================================

    /// Check whether any session is active.
    pub fn is_tracing(&self) -> bool {
        self.depth() > 0
    }

    /// Number of nested sessions currently active.
    pub fn depth(&self) -> usize {
        self.lock_stack().depth()
    }

    /// Deepest nesting reached over the tracer's lifetime.
    pub fn peak_depth(&self) -> usize {
        self.inner.depth.peak()
    }

    /// Check whether the runtime's event hooks are currently installed.
    pub fn handlers_enabled(&self) -> bool {
        self.inner.hooks_enabled.load(Ordering::Relaxed)
    }

    /// Statistics for the active session.
    pub fn stats(&self) -> Option<TraceStats> {
        self.lock_stack().active().map(|session| session.stats())
    }

    /// Records in the active session's allocation table.
    pub fn live_records(&self) -> usize {
        self.lock_stack()
            .active()
            .map(|session| session.table.len())
            .unwrap_or(0)
    }

    /// Distinct strings in the active session's pool.
    pub fn interned_strings(&self) -> usize {
        self.lock_stack()
            .active()
            .map(|session| session.pool.len())
            .unwrap_or(0)
    }

    /// Reference count of `content` in the active session's pool.
    pub fn interned_refcount(&self, content: &str) -> usize {
        self.lock_stack()
            .active()
            .map(|session| session.pool.refcount(content))
            .unwrap_or(0)
    }

    /// Summary of the most recent teardown.
    pub fn last_teardown(&self) -> Option<TeardownSummary> {
        self.lock_stack().last_teardown().cloned()
    }

    /// Total sessions started over the tracer's lifetime.
    pub fn sessions_started(&self) -> u64 {
        self.inner.sessions_started.get()
    }

    /// Events delivered while no session was active.
    pub fn ignored_events(&self) -> u64 {
        self.inner.ignored_events.get()
    }
}

impl<R: Runtime> std::fmt::Debug for Tracer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracer")
            .field("depth", &self.inner.depth.get())
            .field("sessions_started", &self.sessions_started())
            .field("config", &self.inner.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::host::ClassRef;
    use std::borrow::Cow;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeVm {
        gc: AtomicU64,
        hooks_on: AtomicUsize,
        hooks_off: AtomicUsize,
    }

    impl Runtime for FakeVm {
        fn gc_count(&self) -> u64 {
            self.gc.load(Ordering::Relaxed)
        }

        fn class_path(&self, class: ClassRef) -> Option<Cow<'_, str>> {
            (class.0 != 0).then(|| Cow::Owned(format!("Class{}", class.0)))
        }

        fn set_event_hooks(&self, enabled: bool) {
            let counter = if enabled { &self.hooks_on } else { &self.hooks_off };
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_hooks_toggle_only_at_outermost() {
        let tracer = Tracer::with_config(FakeVm::default(), TraceConfig::minimal());

        tracer.start_tracing(|| {
            tracer.start_tracing(|| {
                assert_eq!(tracer.depth(), 2);
            });
            assert_eq!(tracer.runtime().hooks_off.load(Ordering::Relaxed), 0);
        });

        assert_eq!(tracer.runtime().hooks_on.load(Ordering::Relaxed), 1);
        assert_eq!(tracer.runtime().hooks_off.load(Ordering::Relaxed), 1);
        assert_eq!(tracer.peak_depth(), 2);
        assert_eq!(tracer.sessions_started(), 2);
    }

    #[test]
    fn test_events_outside_session_are_ignored() {
        let tracer = Tracer::new(FakeVm::default());

        assert_eq!(tracer.on_new_object(NewObjectEvent::new(ObjectId(1))), NewObjectOutcome::Inactive);
        assert_eq!(tracer.on_free_object(ObjectId(1)), FreeObjectOutcome::Inactive);
        assert_eq!(tracer.ignored_events(), 2);
    }

    #[test]
    fn test_generation_snapshot() {
        let tracer = Tracer::with_config(FakeVm::default(), TraceConfig::minimal());

        tracer.start_tracing(|| {
            tracer.on_new_object(NewObjectEvent::new(ObjectId(1)));
            tracer.runtime().gc.store(5, Ordering::Relaxed);
            tracer.on_new_object(NewObjectEvent::new(ObjectId(2)));

            assert_eq!(tracer.query_generation(ObjectId(1)), Some(0));
            assert_eq!(tracer.query_generation(ObjectId(2)), Some(5));
        });
    }

    #[test]
    fn test_interned_refcount_probe() {
        let tracer = Tracer::with_config(FakeVm::default(), TraceConfig::minimal());

        tracer.start_tracing(|| {
            tracer.on_new_object(NewObjectEvent::new(ObjectId(1)).at("shared.rb", 1));
            tracer.on_new_object(NewObjectEvent::new(ObjectId(2)).at("shared.rb", 2));
            assert_eq!(tracer.interned_refcount("shared.rb"), 2);

            tracer.on_free_object(ObjectId(1));
            assert_eq!(tracer.interned_refcount("shared.rb"), 1);
        });

        assert_eq!(tracer.interned_refcount("shared.rb"), 0);
    }

    #[test]
    fn test_class_paths_can_be_skipped() {
        let config = TraceConfig::minimal().with_class_paths(false);
        let tracer = Tracer::with_config(FakeVm::default(), config);

        tracer.start_tracing(|| {
            tracer.on_new_object(NewObjectEvent::new(ObjectId(1)).defined_in(ClassRef(3)));
            assert_eq!(tracer.query_class_path(ObjectId(1)), None);
            assert_eq!(tracer.interned_strings(), 0);
        });
    }
}

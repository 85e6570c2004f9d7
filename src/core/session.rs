//! Tracing sessions and the stack that nests them.
//!
//! The session on top of the stack is the active one: creation events and
//! queries go to it and nowhere else. Destruction events reach every session
//! on the stack, since an identity freed while a nested session runs may be
//! recycled once the outer session is active again.

use crate::api::config::TraceConfig;
use crate::api::scope::TeardownSummary;
use crate::api::stats::{SessionCounters, TraceStats};
use crate::core::pool::StringPool;
use crate::core::table::AllocationTable;
use crate::diagnostics::deferred::DeferredDiagnostic;
use crate::diagnostics::Diagnostic;

/// One activation of the tracer.
pub(crate) struct Session {
    id: u64,
    pub table: AllocationTable,
    pub pool: StringPool,
    pub counters: SessionCounters,
    deferred: Vec<DeferredDiagnostic>,
}

impl Session {
    fn new(id: u64, config: &TraceConfig) -> Self {
        Self {
            id,
            table: AllocationTable::with_capacity(config.initial_table_capacity),
            pool: StringPool::with_capacity(config.initial_pool_capacity),
            counters: SessionCounters::default(),
            deferred: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Queue a diagnostic to be emitted once the session lock is released.
    pub fn defer(&mut self, diagnostic: Diagnostic, context: String) {
        self.deferred.push(DeferredDiagnostic::new(diagnostic, context));
    }

    pub fn stats(&self) -> TraceStats {
        TraceStats {
            objects_tracked: self.counters.objects_tracked,
            objects_released: self.counters.objects_released,
            untracked_frees: self.counters.untracked_frees,
            duplicates_rejected: self.counters.duplicates_rejected,
            records_replaced: self.counters.records_replaced,
            live_records: self.table.len(),
            peak_live_records: self.counters.peak_live_records,
            interned_strings: self.pool.len(),
            interned_bytes: self.pool.bytes(),
        }
    }

    /// Free both tables completely.
    ///
    /// `hooks_enabled_after` is whether an enclosing session still keeps the
    /// runtime's event hooks installed once this one is gone.
    fn teardown(mut self, depth: usize, hooks_enabled_after: bool) -> TeardownSummary {
        let stats = self.stats();

        let records_drained = self.table.drain(&mut self.pool);
        let strings_drained = self.pool.drain();

        TeardownSummary {
            session_id: self.id,
            depth,
            records_drained,
            strings_drained,
            table_len_after: self.table.len(),
            pool_len_after: self.pool.len(),
            handlers_enabled_after: hooks_enabled_after,
            stats,
        }
    }
}

/// Strict LIFO stack of sessions.
#[derive(Default)]
pub(crate) struct SessionStack {
    sessions: Vec<Session>,
    next_id: u64,
    last_teardown: Option<TeardownSummary>,
    deferred: Vec<DeferredDiagnostic>,
}

impl SessionStack {
    /// Start a session on top of the stack. Returns its id.
    pub fn push(&mut self, config: &TraceConfig) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.sessions.push(Session::new(id, config));
        id
    }

    pub fn depth(&self) -> usize {
        self.sessions.len()
    }

    /// Whether any session needs the runtime's event hooks.
    pub fn hooks_enabled(&self) -> bool {
        !self.sessions.is_empty()
    }

    pub fn active(&self) -> Option<&Session> {
        self.sessions.last()
    }

    pub fn active_mut(&mut self) -> Option<&mut Session> {
        self.sessions.last_mut()
    }

    /// Every session on the stack, innermost first.
    pub fn sessions_mut(&mut self) -> impl Iterator<Item = &mut Session> {
        self.sessions.iter_mut().rev()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.sessions.iter().any(|s| s.id == id)
    }

    /// Tear down session `id` and everything started after it, innermost first.
    ///
    /// Returns one summary per session torn down; empty if `id` already ended.
    pub fn end(&mut self, id: u64) -> Vec<TeardownSummary> {
        let Some(position) = self.sessions.iter().position(|s| s.id == id) else {
            return Vec::new();
        };

        let mut ended: Vec<Session> = self.sessions.drain(position..).collect();
        let mut summaries = Vec::with_capacity(ended.len());
        while let Some(mut session) = ended.pop() {
            self.deferred.append(&mut session.deferred);

            // Sessions still below this one once it is gone.
            let remaining = position + ended.len();
            summaries.push(session.teardown(remaining + 1, remaining > 0));
        }

        self.last_teardown = summaries.last().cloned();
        summaries
    }

    pub fn last_teardown(&self) -> Option<&TeardownSummary> {
        self.last_teardown.as_ref()
    }

    /// Take every diagnostic queued since the last call.
    pub fn take_deferred(&mut self) -> Vec<DeferredDiagnostic> {
        let mut deferred = std::mem::take(&mut self.deferred);
        for session in &mut self.sessions {
            deferred.append(&mut session.deferred);
        }
        deferred
    }
}

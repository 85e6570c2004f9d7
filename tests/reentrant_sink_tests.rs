//! A diagnostic sink that reads tracer state while handling a diagnostic.
//!
//! Kept in its own test binary because the diagnostic sink is process-wide.

mod common;

use std::sync::{Arc, Mutex};

use common::MockRuntime;
use objtrace::diagnostics::{set_sink, DiagnosticSink};
use objtrace::{Diagnostic, NewObjectEvent, NewObjectOutcome, ObjectId, TraceConfig, Tracer};

struct StatsSink {
    tracer: Tracer<MockRuntime>,
    seen: Mutex<Vec<(&'static str, usize)>>,
}

impl DiagnosticSink for StatsSink {
    fn emit(&self, diag: &Diagnostic) {
        let live = self.tracer.stats().map(|s| s.live_records).unwrap_or(0);
        self.seen.lock().unwrap().push((diag.code, live));
    }
}

#[test]
fn test_sink_can_query_tracer() {
    let tracer = Tracer::with_config(MockRuntime::new(), TraceConfig::minimal());
    let sink = Arc::new(StatsSink {
        tracer: tracer.clone(),
        seen: Mutex::new(Vec::new()),
    });
    set_sink(Some(sink.clone()));

    tracer.start_tracing(|| {
        tracer.on_new_object(NewObjectEvent::new(ObjectId(1)).at("a.rb", 1));
        let outcome = tracer.on_new_object(NewObjectEvent::new(ObjectId(1)).at("a.rb", 2));
        assert_eq!(outcome, NewObjectOutcome::DuplicateRejected);
        assert_eq!(tracer.query_source_line(ObjectId(1)), Some(1));
    });

    let outer = tracer.trace_scope();
    let inner = tracer.trace_scope();
    drop(outer);
    drop(inner);

    set_sink(None);
    assert_eq!(*sink.seen.lock().unwrap(), vec![("OT101", 1), ("OT001", 0)]);
}

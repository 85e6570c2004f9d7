//! Integration tests for objtrace.

mod common;

use std::panic::{catch_unwind, AssertUnwindSafe};

use common::MockRuntime;
use objtrace::{
    ClassRef, DuplicatePolicy, FreeObjectOutcome, MethodId, NewObjectEvent, NewObjectOutcome,
    ObjectId, TraceConfig, Tracer,
};

fn tracer() -> Tracer<MockRuntime> {
    let runtime = MockRuntime::new()
        .with_class(1, "Acme::Order")
        .with_class(2, "Acme::LineItem");
    Tracer::with_config(runtime, TraceConfig::minimal())
}

#[test]
fn test_create_query_destroy() {
    let tracer = tracer();
    let a = ObjectId(0xA0);

    tracer.start_tracing(|| {
        tracer.on_new_object(NewObjectEvent::new(a).at("a.rb", 10));

        assert_eq!(tracer.query_source_file(a).as_deref(), Some("a.rb"));
        assert_eq!(tracer.query_source_line(a), Some(10));

        tracer.on_free_object(a);

        assert_eq!(tracer.query_source_file(a), None);
        assert_eq!(tracer.query_source_line(a), None);
    });
}

#[test]
fn test_every_field_cleared_after_destroy() {
    let tracer = tracer();

    tracer.start_tracing(|| {
        for i in 0..50usize {
            let event = NewObjectEvent::new(ObjectId(i))
                .at(if i % 2 == 0 { "even.rb" } else { "odd.rb" }, i as u64)
                .in_method(MethodId(i as u64))
                .defined_in(ClassRef(1 + (i as u64 % 2)));
            assert_eq!(tracer.on_new_object(event), NewObjectOutcome::Tracked);
        }

        for i in 0..50usize {
            let id = ObjectId(i);
            assert!(tracer.allocation_info(id).is_some());
            assert_eq!(tracer.on_free_object(id), FreeObjectOutcome::Released);

            assert_eq!(tracer.query_source_file(id), None);
            assert_eq!(tracer.query_source_line(id), None);
            assert_eq!(tracer.query_class_path(id), None);
            assert_eq!(tracer.query_method_id(id), None);
            assert_eq!(tracer.query_generation(id), None);
        }

        assert_eq!(tracer.live_records(), 0);
        assert_eq!(tracer.interned_strings(), 0);
    });
}

#[test]
fn test_interning_shares_strings() {
    let tracer = tracer();

    tracer.start_tracing(|| {
        for i in 0..1000usize {
            tracer.on_new_object(
                NewObjectEvent::new(ObjectId(i))
                    .at("app/models/order.rb", 7)
                    .defined_in(ClassRef(1)),
            );
        }

        let stats = tracer.stats().expect("session active");
        assert_eq!(stats.live_records, 1000);
        assert_eq!(stats.interned_strings, 2);
        assert_eq!(stats.interned_bytes, "app/models/order.rb".len() + "Acme::Order".len());
    });
}

#[test]
fn test_anonymous_class_has_no_path() {
    let tracer = tracer();

    tracer.start_tracing(|| {
        tracer.on_new_object(NewObjectEvent::new(ObjectId(1)).at("x.rb", 1).defined_in(ClassRef(99)));
        tracer.on_new_object(NewObjectEvent::new(ObjectId(2)));

        assert_eq!(tracer.query_class_path(ObjectId(1)), None);
        assert_eq!(tracer.query_source_file(ObjectId(1)).as_deref(), Some("x.rb"));

        assert_eq!(tracer.query_source_file(ObjectId(2)), None);
        assert_eq!(tracer.query_source_line(ObjectId(2)), None);
        assert_eq!(tracer.query_method_id(ObjectId(2)), None);
        assert_eq!(tracer.query_generation(ObjectId(2)), Some(0));
    });
}

#[test]
fn test_generation_follows_collector() {
    let tracer = tracer();

    tracer.start_tracing(|| {
        tracer.on_new_object(NewObjectEvent::new(ObjectId(1)));
        tracer.runtime().run_gc();
        tracer.runtime().run_gc();
        tracer.on_new_object(NewObjectEvent::new(ObjectId(2)));

        assert_eq!(tracer.query_generation(ObjectId(1)), Some(0));
        assert_eq!(tracer.query_generation(ObjectId(2)), Some(2));
    });
}

#[test]
fn test_object_created_before_tracing_is_untracked() {
    let tracer = tracer();

    assert_eq!(tracer.on_new_object(NewObjectEvent::new(ObjectId(5)).at("early.rb", 1)), NewObjectOutcome::Inactive);

    tracer.start_tracing(|| {
        assert_eq!(tracer.query_source_file(ObjectId(5)), None);
        assert_eq!(tracer.on_free_object(ObjectId(5)), FreeObjectOutcome::Untracked);
        assert_eq!(tracer.stats().map(|s| s.untracked_frees), Some(1));
    });
}

#[test]
fn test_queries_without_session() {
    let tracer = tracer();

    assert!(!tracer.is_tracing());
    assert_eq!(tracer.query_source_file(ObjectId(1)), None);
    assert_eq!(tracer.query_source_line(ObjectId(1)), None);
    assert_eq!(tracer.query_class_path(ObjectId(1)), None);
    assert_eq!(tracer.query_method_id(ObjectId(1)), None);
    assert_eq!(tracer.query_generation(ObjectId(1)), None);
    assert_eq!(tracer.stats(), None);
}

#[test]
fn test_body_result_is_returned() {
    let tracer = tracer();

    let ok: Result<u32, String> = tracer.start_tracing(|| Ok(42));
    assert_eq!(ok, Ok(42));

    let err: Result<u32, String> = tracer.start_tracing(|| {
        tracer.on_new_object(NewObjectEvent::new(ObjectId(1)).at("fail.rb", 3));
        Err("boom".to_string())
    });
    assert_eq!(err, Err("boom".to_string()));

    let summary = tracer.last_teardown().expect("teardown recorded");
    assert_eq!(summary.records_drained, 1);
    assert_eq!(summary.table_len_after, 0);
    assert_eq!(summary.pool_len_after, 0);
    assert!(!tracer.is_tracing());
}

#[test]
fn test_teardown_runs_on_panic() {
    let tracer = tracer();

    let result = catch_unwind(AssertUnwindSafe(|| {
        tracer.start_tracing(|| {
            tracer.on_new_object(NewObjectEvent::new(ObjectId(1)).at("panic.rb", 1).defined_in(ClassRef(1)));
            tracer.on_new_object(NewObjectEvent::new(ObjectId(2)).at("panic.rb", 2));
            panic!("traced body failed");
        })
    }));
    assert!(result.is_err());

    assert!(!tracer.is_tracing());
    assert!(!tracer.runtime().hooks_enabled());
    assert_eq!(tracer.live_records(), 0);
    assert_eq!(tracer.interned_strings(), 0);

    let summary = tracer.last_teardown().expect("teardown recorded");
    assert_eq!(summary.records_drained, 2);
    assert_eq!(summary.stats.interned_strings, 2);
    assert_eq!(summary.table_len_after, 0);
    assert_eq!(summary.pool_len_after, 0);
    assert!(!summary.handlers_enabled_after);

    // Tracing still works afterwards.
    tracer.start_tracing(|| {
        tracer.on_new_object(NewObjectEvent::new(ObjectId(3)).at("after.rb", 1));
        assert_eq!(tracer.query_source_line(ObjectId(3)), Some(1));
    });
}

#[test]
fn test_handlers_disabled_after_teardown() {
    let tracer = tracer();

    tracer.start_tracing(|| {
        assert!(tracer.handlers_enabled());
        assert!(tracer.runtime().hooks_enabled());
    });

    assert!(!tracer.handlers_enabled());
    assert!(!tracer.runtime().hooks_enabled());
    assert_eq!(tracer.runtime().hook_toggles(), 2);
    assert_eq!(tracer.on_new_object(NewObjectEvent::new(ObjectId(1))), NewObjectOutcome::Inactive);
}

#[test]
fn test_duplicate_creation_rejected_by_default() {
    let tracer = tracer();

    tracer.start_tracing(|| {
        tracer.on_new_object(NewObjectEvent::new(ObjectId(1)).at("first.rb", 1));
        let outcome = tracer.on_new_object(NewObjectEvent::new(ObjectId(1)).at("second.rb", 2));

        assert_eq!(outcome, NewObjectOutcome::DuplicateRejected);
        assert_eq!(tracer.query_source_file(ObjectId(1)).as_deref(), Some("first.rb"));
        assert_eq!(tracer.interned_strings(), 1);
        assert_eq!(tracer.stats().map(|s| s.duplicates_rejected), Some(1));
    });
}

#[test]
fn test_duplicate_creation_replaced() {
    let config = TraceConfig::minimal().with_duplicate_policy(DuplicatePolicy::Replace);
    let tracer = Tracer::with_config(MockRuntime::new(), config);

    tracer.start_tracing(|| {
        tracer.on_new_object(NewObjectEvent::new(ObjectId(1)).at("first.rb", 1));
        let outcome = tracer.on_new_object(NewObjectEvent::new(ObjectId(1)).at("second.rb", 2));

        assert_eq!(outcome, NewObjectOutcome::Replaced);
        assert_eq!(tracer.query_source_file(ObjectId(1)).as_deref(), Some("second.rb"));
        assert_eq!(tracer.interned_strings(), 1);

        tracer.on_free_object(ObjectId(1));
        assert_eq!(tracer.interned_strings(), 0);
    });
}

#[test]
fn test_query_returns_copy() {
    let tracer = tracer();

    tracer.start_tracing(|| {
        tracer.on_new_object(NewObjectEvent::new(ObjectId(1)).at("owned.rb", 1));

        let mut copy = tracer.query_source_file(ObjectId(1)).expect("tracked");
        copy.push_str("-mutated");

        assert_eq!(tracer.query_source_file(ObjectId(1)).as_deref(), Some("owned.rb"));
    });
}

#[test]
fn test_leak_report_lists_survivors() {
    let tracer = tracer();

    tracer.start_tracing(|| {
        tracer.on_new_object(NewObjectEvent::new(ObjectId(0x10)).at("kept.rb", 4).defined_in(ClassRef(2)));
        tracer.on_new_object(NewObjectEvent::new(ObjectId(0x20)).at("freed.rb", 5));
        tracer.on_free_object(ObjectId(0x20));

        let report = tracer.leak_report();
        assert!(report.contains("1 live traced objects"));
        assert!(report.contains("0x10: kept.rb:4 in Acme::LineItem"));
        assert!(!report.contains("freed.rb"));
    });
}

//! Creation and destruction handlers.
//!
//! These are the only places allocation records are created or destroyed
//! outside of session teardown. Both run to completion under the session
//! lock and never fail: a miss is an ordinary outcome. Anomalies are queued
//! on the session rather than emitted, since a diagnostic sink may call back
//! into the tracer.

use crate::api::config::DuplicatePolicy;
use crate::api::event::{FreeObjectOutcome, NewObjectOutcome};
use crate::api::host::{MethodId, ObjectId};
use crate::core::session::Session;
use crate::core::table::AllocationRecord;
use crate::diagnostics::{OT101, OT201};

/// A creation event with everything host-dependent already resolved.
pub(crate) struct ResolvedNewObject<'a> {
    pub object: ObjectId,
    pub path: Option<&'a str>,
    pub line: u64,
    pub method_id: Option<MethodId>,
    pub class_path: Option<&'a str>,
    pub generation: u64,
    #[cfg(feature = "debug")]
    pub backtrace: Option<String>,
}

/// Untracked -> tracked.
pub(crate) fn on_new_object(
    session: &mut Session,
    event: ResolvedNewObject<'_>,
    policy: DuplicatePolicy,
) -> NewObjectOutcome {
    let duplicate = session.table.contains(event.object);
    if duplicate && policy == DuplicatePolicy::Reject {
        session.counters.duplicates_rejected += 1;
        let context = format!("object {} in session {}", event.object, session.id());
        session.defer(OT101, context);
        return NewObjectOutcome::DuplicateRejected;
    }

    let record = AllocationRecord {
        source_path: event.path.map(|path| session.pool.intern(path)),
        source_line: event.line,
        class_path: event.class_path.map(|class_path| session.pool.intern(class_path)),
        method_id: event.method_id,
        generation: event.generation,
        #[cfg(feature = "debug")]
        backtrace: event.backtrace,
    };

    // Interning above happens before the old record is released, so a
    // replaced record sharing strings with the new one never frees them.
    if let Some(displaced) = session.table.insert(event.object, record) {
        release_record(session, event.object, displaced);
        session.counters.records_replaced += 1;

        #[cfg(feature = "log")]
        log::warn!("objtrace: replaced record for object {}", event.object);

        return NewObjectOutcome::Replaced;
    }

    let live = session.table.len();
    session.counters.record_tracked(live);
    NewObjectOutcome::Tracked
}

/// Tracked -> untracked.
pub(crate) fn on_free_object(session: &mut Session, object: ObjectId) -> FreeObjectOutcome {
    match session.table.remove(object) {
        Some(record) => {
            release_record(session, object, record);
            session.counters.objects_released += 1;
            FreeObjectOutcome::Released
        }
        None => {
            session.counters.untracked_frees += 1;
            FreeObjectOutcome::Untracked
        }
    }
}

fn release_record(session: &mut Session, object: ObjectId, record: AllocationRecord) {
    let refused = record.release_into(&mut session.pool);
    if refused > 0 {
        let context = format!("{} handle(s) of object {} in session {}", refused, object, session.id());
        session.defer(OT201, context);
    }
}

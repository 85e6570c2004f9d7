//! Read-only queries against the active session.
//!
//! Every accessor answers from whichever session is active when it is
//! called. An untracked object, a freed object and "no session at all" all
//! read as `None`.

use crate::api::host::{MethodId, ObjectId, Runtime};
use crate::api::info::{format_leak_report, AllocationInfo};
use crate::api::tracer::Tracer;
use crate::core::pool::StringPool;
use crate::core::table::AllocationRecord;

impl<R: Runtime> Tracer<R> {
    fn with_record<T, F>(&self, object: ObjectId, f: F) -> Option<T>
    where
        F: FnOnce(&StringPool, &AllocationRecord) -> Option<T>,
    {
        let stack = self.lock_stack();
        let session = stack.active()?;
        let record = session.table.get(object)?;
        f(&session.pool, record)
    }

    /// Source file where `object` was allocated.
    pub fn query_source_file(&self, object: ObjectId) -> Option<String> {
        self.with_record(object, |pool, record| {
            record
                .source_path
                .as_ref()
                .and_then(|path| pool.get(path))
                .map(str::to_owned)
        })
    }

    /// Source line where `object` was allocated.
    ///
    /// `None` when the allocation had no source file.
    pub fn query_source_line(&self, object: ObjectId) -> Option<u64> {
        self.with_record(object, |_, record| {
            record.source_path.as_ref().map(|_| record.source_line)
        })
    }

    /// Path of the type whose method allocated `object`.
    pub fn query_class_path(&self, object: ObjectId) -> Option<String> {
        self.with_record(object, |pool, record| {
            record
                .class_path
                .as_ref()
                .and_then(|class_path| pool.get(class_path))
                .map(str::to_owned)
        })
    }

    /// Method that allocated `object`.
    pub fn query_method_id(&self, object: ObjectId) -> Option<MethodId> {
        self.with_record(object, |_, record| record.method_id)
    }

    /// Collector generation at the time `object` was allocated.
    pub fn query_generation(&self, object: ObjectId) -> Option<u64> {
        self.with_record(object, |_, record| Some(record.generation))
    }

    /// All recorded fields for `object` in one lookup.
    pub fn allocation_info(&self, object: ObjectId) -> Option<AllocationInfo> {
        self.with_record(object, |pool, record| {
            Some(AllocationInfo::from_record(pool, record))
        })
    }

    /// Every object the active session still tracks, oldest generation first.
    pub fn live_allocations(&self) -> Vec<(ObjectId, AllocationInfo)> {
        let stack = self.lock_stack();
        let Some(session) = stack.active() else {
            return Vec::new();
        };

        let mut allocations: Vec<_> = session
            .table
            .iter()
            .map(|(&object, record)| (object, AllocationInfo::from_record(&session.pool, record)))
            .collect();
        allocations.sort_by_key(|(object, info)| (info.generation, *object));
        allocations
    }

    /// Human-readable list of objects the active session still tracks.
    pub fn leak_report(&self) -> String {
        format_leak_report(&self.live_allocations())
    }
}

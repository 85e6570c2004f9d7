//! Allocation records keyed by object identity.

use std::collections::HashMap;

use crate::api::host::{MethodId, ObjectId};
use crate::core::pool::{InternedStr, StringPool};

/// Provenance of one live traced object.
///
/// The two string fields are handles into the owning session's pool and
/// must be given back through [`AllocationRecord::release_into`].
#[derive(Debug)]
pub(crate) struct AllocationRecord {
    pub source_path: Option<InternedStr>,
    pub source_line: u64,
    pub class_path: Option<InternedStr>,
    pub method_id: Option<MethodId>,
    pub generation: u64,
    #[cfg(feature = "debug")]
    pub backtrace: Option<String>,
}

impl AllocationRecord {
    /// Return both interned strings to `pool`, consuming the record.
    ///
    /// Returns how many handles the pool refused.
    pub fn release_into(self, pool: &mut StringPool) -> usize {
        [self.source_path, self.class_path]
            .into_iter()
            .flatten()
            .map(|handle| pool.release(handle))
            .filter(|released| !released)
            .count()
    }
}

/// Mapping from live object identity to its allocation record.
#[derive(Debug, Default)]
pub(crate) struct AllocationTable {
    records: HashMap<ObjectId, AllocationRecord>,
}

impl AllocationTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: HashMap::with_capacity(capacity),
        }
    }

    /// Insert a record, handing back whatever it displaced.
    ///
    /// The caller owns the displaced record and must release its strings.
    pub fn insert(&mut self, object: ObjectId, record: AllocationRecord) -> Option<AllocationRecord> {
        self.records.insert(object, record)
    }

    /// Remove the record for `object`. `None` is an ordinary miss.
    pub fn remove(&mut self, object: ObjectId) -> Option<AllocationRecord> {
        self.records.remove(&object)
    }

    pub fn get(&self, object: ObjectId) -> Option<&AllocationRecord> {
        self.records.get(&object)
    }

    pub fn contains(&self, object: ObjectId) -> bool {
        self.records.contains_key(&object)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ObjectId, &AllocationRecord)> {
        self.records.iter()
    }

    /// Drop every record, releasing its strings into `pool`.
    ///
    /// Returns the number of records drained.
    pub fn drain(&mut self, pool: &mut StringPool) -> usize {
        let drained = self.records.len();
        for (_, record) in self.records.drain() {
            record.release_into(pool);
        }
        self.records.shrink_to_fit();
        drained
    }
}

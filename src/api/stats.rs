//! Tracing statistics.

use crate::util::size::format_bytes;

/// Counters for one tracing session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceStats {
    /// Creation events that produced a record.
    pub objects_tracked: u64,

    /// Destruction events that removed a record.
    pub objects_released: u64,

    /// Destruction events for objects this session never tracked.
    pub untracked_frees: u64,

    /// Creation events dropped under [`DuplicatePolicy::Reject`](crate::DuplicatePolicy::Reject).
    pub duplicates_rejected: u64,

    /// Records replaced under [`DuplicatePolicy::Replace`](crate::DuplicatePolicy::Replace).
    pub records_replaced: u64,

    /// Records currently in the allocation table.
    pub live_records: usize,

    /// Highest number of simultaneously live records.
    pub peak_live_records: usize,

    /// Distinct strings currently interned.
    pub interned_strings: usize,

    /// Bytes of interned string content.
    pub interned_bytes: usize,
}

impl TraceStats {
    /// Create empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracked records per distinct interned string.
    ///
    /// Higher is better: it is how much interning saves.
    pub fn sharing_ratio(&self) -> f64 {
        if self.interned_strings == 0 {
            return 0.0;
        }
        self.live_records as f64 / self.interned_strings as f64
    }
}

impl std::fmt::Display for TraceStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tracing Statistics:")?;
        writeln!(f, "  Tracked:          {}", self.objects_tracked)?;
        writeln!(f, "  Released:         {}", self.objects_released)?;
        writeln!(f, "  Untracked frees:  {}", self.untracked_frees)?;
        writeln!(f, "  Duplicates:       {} rejected, {} replaced", self.duplicates_rejected, self.records_replaced)?;
        writeln!(f, "  Live records:     {} (peak {})", self.live_records, self.peak_live_records)?;
        writeln!(f, "  Interned strings: {} ({})", self.interned_strings, format_bytes(self.interned_bytes))?;
        Ok(())
    }
}

/// Event counters kept by a session while it runs.
#[derive(Debug, Default)]
pub(crate) struct SessionCounters {
    pub objects_tracked: u64,
    pub objects_released: u64,
    pub untracked_frees: u64,
    pub duplicates_rejected: u64,
    pub records_replaced: u64,
    pub peak_live_records: usize,
}

impl SessionCounters {
    pub fn record_tracked(&mut self, live: usize) {
        self.objects_tracked += 1;
        self.peak_live_records = self.peak_live_records.max(live);
    }
}

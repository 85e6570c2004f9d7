//! Owned snapshots of allocation records.

use crate::api::host::{MethodId, ObjectId};
use crate::core::pool::StringPool;
use crate::core::table::AllocationRecord;

/// Everything recorded about one traced object.
///
/// Strings are fresh copies; nothing here points into the session's pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationInfo {
    /// Source file of the allocation site.
    pub source_file: Option<String>,
    /// Line of the allocation site; `None` whenever `source_file` is.
    pub source_line: Option<u64>,
    /// Path of the type defining the allocating method.
    pub class_path: Option<String>,
    /// The allocating method.
    pub method_id: Option<MethodId>,
    /// Collector generation at allocation time.
    pub generation: u64,
    /// Rendered allocation-site backtrace.
    #[cfg(feature = "debug")]
    pub backtrace: Option<String>,
}

impl AllocationInfo {
    pub(crate) fn from_record(pool: &StringPool, record: &AllocationRecord) -> Self {
        let source_file = record
            .source_path
            .as_ref()
            .and_then(|path| pool.get(path))
            .map(str::to_owned);

        Self {
            source_line: source_file.as_ref().map(|_| record.source_line),
            source_file,
            class_path: record
                .class_path
                .as_ref()
                .and_then(|class_path| pool.get(class_path))
                .map(str::to_owned),
            method_id: record.method_id,
            generation: record.generation,
            #[cfg(feature = "debug")]
            backtrace: record.backtrace.clone(),
        }
    }
}

impl std::fmt::Display for AllocationInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.source_file, self.source_line) {
            (Some(file), Some(line)) => write!(f, "{}:{}", file, line)?,
            _ => write!(f, "<unknown>")?,
        }
        if let Some(class_path) = &self.class_path {
            write!(f, " in {}", class_path)?;
        }
        if let Some(method) = self.method_id {
            write!(f, " (method {})", method.0)?;
        }
        write!(f, " [generation {}]", self.generation)
    }
}

/// Render a leak report for the given live allocations.
pub(crate) fn format_leak_report(allocations: &[(ObjectId, AllocationInfo)]) -> String {
    if allocations.is_empty() {
        return "[objtrace] No live traced objects".to_string();
    }

    let mut report = format!("[objtrace] {} live traced objects\n", allocations.len());
    for (object, info) in allocations {
        report.push_str(&format!("  {}: {}\n", object, info));
    }
    report
}

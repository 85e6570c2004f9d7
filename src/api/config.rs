//! Tracer configuration.

/// What to do with a creation event for an identity that is already tracked.
///
/// A well-behaved host never produces one: it delivers the destruction event
/// before recycling an identity. When it happens anyway the old record's
/// strings must not leak, whichever record survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Keep the existing record, drop the event and emit `OT101`.
    #[default]
    Reject,
    /// Release the existing record and store the new one.
    Replace,
}

/// Configuration for a [`Tracer`](crate::Tracer).
#[derive(Debug, Clone)]
pub struct TraceConfig {
    /// Allocation table capacity reserved when a session starts (default: 4096)
    pub initial_table_capacity: usize,

    /// String pool capacity reserved when a session starts (default: 256)
    pub initial_pool_capacity: usize,

    /// Handling of duplicate creation events
    pub duplicate_policy: DuplicatePolicy,

    /// Resolve and store the defining class path of each allocation
    pub capture_class_paths: bool,

    /// Capture a backtrace per allocation (requires the `debug` feature)
    pub capture_backtraces: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            initial_table_capacity: 4096,
            initial_pool_capacity: 256,
            duplicate_policy: DuplicatePolicy::Reject,
            capture_class_paths: true,
            capture_backtraces: cfg!(feature = "debug"),
        }
    }
}

impl TraceConfig {
    /// Create a minimal config for tests or short traced scopes.
    pub fn minimal() -> Self {
        Self {
            initial_table_capacity: 0,
            initial_pool_capacity: 0,
            duplicate_policy: DuplicatePolicy::Reject,
            capture_class_paths: true,
            capture_backtraces: false,
        }
    }

    /// Create a config for tracing whole-process workloads.
    ///
    /// Skips class path resolution, which is the most expensive part of a
    /// creation event on most hosts.
    pub fn high_volume() -> Self {
        Self {
            initial_table_capacity: 1 << 20,
            initial_pool_capacity: 4096,
            duplicate_policy: DuplicatePolicy::Replace,
            capture_class_paths: false,
            capture_backtraces: false,
        }
    }

    /// Builder pattern: set initial table capacity.
    pub fn with_table_capacity(mut self, capacity: usize) -> Self {
        self.initial_table_capacity = capacity;
        self
    }

    /// Builder pattern: set initial pool capacity.
    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.initial_pool_capacity = capacity;
        self
    }

    /// Builder pattern: set duplicate policy.
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Builder pattern: enable class path capture.
    pub fn with_class_paths(mut self, enable: bool) -> Self {
        self.capture_class_paths = enable;
        self
    }

    /// Builder pattern: enable backtrace capture.
    pub fn with_backtraces(mut self, enable: bool) -> Self {
        self.capture_backtraces = enable;
        self
    }
}

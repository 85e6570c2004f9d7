//! The host runtime as seen by the tracer.
//!
//! The tracer never inspects objects itself. Identities, method ids and type
//! references are opaque tokens minted by the host, and everything the tracer
//! needs to know beyond the event payload comes through [`Runtime`].

use std::borrow::Cow;

/// Opaque identity of a live object, assigned by the collector.
///
/// Stable only while the object is live. The host may recycle an identity
/// once the object's destruction event has been delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub usize);

/// Opaque identifier of the method that performed an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MethodId(pub u64);

/// Opaque reference to the type that defines the allocating method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassRef(pub u64);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Services the managed runtime provides to the tracer.
///
/// # Example
///
/// ```rust
/// use std::borrow::Cow;
/// use std::sync::atomic::{AtomicU64, Ordering};
/// use objtrace::{ClassRef, Runtime};
///
/// struct Vm {
///     gc_runs: AtomicU64,
/// }
///
/// impl Runtime for Vm {
///     fn gc_count(&self) -> u64 {
///         self.gc_runs.load(Ordering::Relaxed)
///     }
///
///     fn class_path(&self, class: ClassRef) -> Option<Cow<'_, str>> {
///         (class.0 != 0).then(|| Cow::Owned(format!("Class{}", class.0)))
///     }
/// }
/// ```
pub trait Runtime: Send + Sync {
    /// Current value of the collector's generation counter.
    ///
    /// Must never decrease.
    fn gc_count(&self) -> u64;

    /// Resolve a type to its displayable path, or `None` for anonymous types.
    fn class_path(&self, class: ClassRef) -> Option<Cow<'_, str>>;

    /// Turn delivery of creation/destruction events on or off.
    ///
    /// Called with `true` when the outermost session starts and with `false`
    /// when it ends. Hosts that always deliver events can ignore it.
    ///
    /// Runs with the session lock held: it must not deliver events or
    /// query the tracer.
    fn set_event_hooks(&self, enabled: bool) {
        let _ = enabled;
    }
}

impl<R: Runtime + ?Sized> Runtime for std::sync::Arc<R> {
    fn gc_count(&self) -> u64 {
        (**self).gc_count()
    }

    fn class_path(&self, class: ClassRef) -> Option<Cow<'_, str>> {
        (**self).class_path(class)
    }

    fn set_event_hooks(&self, enabled: bool) {
        (**self).set_event_hooks(enabled)
    }
}

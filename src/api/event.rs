//! Collector events and the outcome of handling them.

use crate::api::host::{ClassRef, MethodId, ObjectId};

/// Payload of an object-creation event.
///
/// # Example
///
/// ```rust
/// use objtrace::{ClassRef, MethodId, NewObjectEvent, ObjectId};
///
/// let event = NewObjectEvent::new(ObjectId(0x10))
///     .at("app/models/user.rb", 42)
///     .in_method(MethodId(7))
///     .defined_in(ClassRef(3));
/// assert_eq!(event.line, 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewObjectEvent<'a> {
    /// Identity of the new object.
    pub object: ObjectId,
    /// Source file of the allocation site, if known.
    pub path: Option<&'a str>,
    /// Line of the allocation site. Meaningless without `path`.
    pub line: u64,
    /// Method that performed the allocation, if any.
    pub method_id: Option<MethodId>,
    /// Type defining that method, if any.
    pub defined_class: Option<ClassRef>,
}

impl<'a> NewObjectEvent<'a> {
    /// An event carrying only the object identity.
    pub fn new(object: ObjectId) -> Self {
        Self {
            object,
            path: None,
            line: 0,
            method_id: None,
            defined_class: None,
        }
    }

    /// Set the allocation site.
    pub fn at(mut self, path: &'a str, line: u64) -> Self {
        self.path = Some(path);
        self.line = line;
        self
    }

    /// Set the allocating method.
    pub fn in_method(mut self, method_id: MethodId) -> Self {
        self.method_id = Some(method_id);
        self
    }

    /// Set the type defining the allocating method.
    pub fn defined_in(mut self, class: ClassRef) -> Self {
        self.defined_class = Some(class);
        self
    }
}

/// Result of delivering a creation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewObjectOutcome {
    /// A record was created in the active session.
    Tracked,
    /// The identity was already tracked and its old record was replaced.
    Replaced,
    /// The identity was already tracked and the event was dropped.
    DuplicateRejected,
    /// No session is active; nothing was recorded.
    Inactive,
}

/// Result of delivering a destruction event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreeObjectOutcome {
    /// The record was removed and its strings returned to the pool.
    Released,
    /// The active session never saw this object.
    Untracked,
    /// No session is active.
    Inactive,
}

impl NewObjectOutcome {
    /// Whether the event's metadata was stored.
    pub fn stored(&self) -> bool {
        matches!(self, Self::Tracked | Self::Replaced)
    }
}

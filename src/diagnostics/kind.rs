//! Diagnostic kinds and core types.
//!
//! Mirrors rustc's diagnostic levels for familiar UX.

/// The severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A hard error - tracer bookkeeping was violated.
    Error,
    /// A warning - the event stream looks wrong but was handled.
    Warning,
    /// Additional context about another diagnostic.
    Note,
    /// Actionable suggestion to fix the issue.
    Help,
}

impl DiagnosticKind {
    /// Get the display prefix for this kind.
    pub fn prefix(&self) -> &'static str {
        match self {
            DiagnosticKind::Error => "error",
            DiagnosticKind::Warning => "warning",
            DiagnosticKind::Note => "note",
            DiagnosticKind::Help => "help",
        }
    }
}

/// A diagnostic message with code, message, and optional context.
///
/// Diagnostic codes follow the pattern:
/// - `OT0xx` - Session stack issues
/// - `OT1xx` - Event handler issues
/// - `OT2xx` - String pool issues
/// - `OT9xx` - Internal errors
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level.
    pub kind: DiagnosticKind,
    /// Diagnostic code (e.g., "OT101").
    pub code: &'static str,
    /// Primary message.
    pub message: &'static str,
    /// Optional additional context.
    pub note: Option<&'static str>,
    /// Optional fix suggestion.
    pub help: Option<&'static str>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub const fn error(code: &'static str, message: &'static str) -> Self {
        Self {
            kind: DiagnosticKind::Error,
            code,
            message,
            note: None,
            help: None,
        }
    }

    /// Create a new warning diagnostic.
    pub const fn warning(code: &'static str, message: &'static str) -> Self {
        Self {
            kind: DiagnosticKind::Warning,
            code,
            message,
            note: None,
            help: None,
        }
    }

    /// Add a note to this diagnostic.
    pub const fn with_note(mut self, note: &'static str) -> Self {
        self.note = Some(note);
        self
    }

    /// Add a help message to this diagnostic.
    pub const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

// =============================================================================
// Predefined diagnostics (OT0xx - Session stack)
// =============================================================================

/// OT001: A trace guard was dropped while newer sessions were still active.
pub const OT001: Diagnostic = Diagnostic::warning(
    "OT001",
    "trace guard dropped out of order"
).with_note("sessions started after this guard were torn down first")
 .with_help("drop trace guards in reverse order of creation, or use start_tracing()");

/// OT002: Records or strings survived until session teardown.
pub const OT002: Diagnostic = Diagnostic::warning(
    "OT002",
    "string pool still referenced after the allocation table was drained"
).with_note("every remaining buffer was freed unconditionally")
 .with_help("this points at a release missing from an event handler");

// =============================================================================
// Predefined diagnostics (OT1xx - Event handlers)
// =============================================================================

/// OT101: Creation event for an identity that is already tracked.
pub const OT101: Diagnostic = Diagnostic::warning(
    "OT101",
    "creation event for an object that is already tracked"
).with_note("the host reused an object identity before delivering its destruction event")
 .with_help("deliver destruction events before recycling identities, or use DuplicatePolicy::Replace");

// =============================================================================
// Predefined diagnostics (OT2xx - String pool)
// =============================================================================

/// OT201: Release of a handle the pool does not own.
pub const OT201: Diagnostic = Diagnostic::error(
    "OT201",
    "released an interned string the pool does not own"
).with_note("the handle's generation doesn't match, indicating it came from another pool or was already released")
 .with_help("release handles only into the pool that interned them");

// =============================================================================
// Predefined diagnostics (OT9xx - Internal)
// =============================================================================

/// OT901: Internal tracer error.
pub const OT901: Diagnostic = Diagnostic::error(
    "OT901",
    "internal tracer error"
).with_note("this indicates a bug in objtrace")
 .with_help("please report this issue with the diagnostic context");

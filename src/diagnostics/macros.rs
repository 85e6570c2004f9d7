//! Diagnostic macros.
//!
//! Thin wrappers over [`emit`](super::emit::emit) so call sites read like
//! rustc diagnostics.

/// Emit an ad-hoc runtime diagnostic.
///
/// # Example
///
/// ```rust,ignore
/// ot_diagnostic!(
///     Warning,
///     code = "OT101",
///     message = "creation event for an object that is already tracked",
///     help = "deliver destruction events before recycling identities"
/// );
/// ```
#[macro_export]
macro_rules! ot_diagnostic {
    (
        $kind:ident,
        code = $code:expr,
        message = $msg:expr
        $(, note = $note:expr)?
        $(, help = $help:expr)?
    ) => {{
        let diag = $crate::diagnostics::Diagnostic {
            kind: $crate::diagnostics::DiagnosticKind::$kind,
            code: $code,
            message: $msg,
            note: None $(.or(Some($note)))?,
            help: None $(.or(Some($help)))?,
        };
        $crate::diagnostics::emit::emit(&diag);
    }};
}

/// Emit a predefined diagnostic by code, optionally with formatted context.
///
/// # Example
///
/// ```rust,ignore
/// ot_emit!(OT001);
/// ot_emit!(OT101, "object {:?} at depth {}", id, depth);
/// ```
#[macro_export]
macro_rules! ot_emit {
    ($code:ident) => {{
        $crate::diagnostics::emit::emit(&$crate::diagnostics::$code);
    }};
    ($code:ident, $($ctx:tt)+) => {{
        $crate::diagnostics::emit::emit_with_context(
            &$crate::diagnostics::$code,
            &format!($($ctx)+),
        );
    }};
}

/// Emit a predefined diagnostic when a condition does not hold.
///
/// # Example
///
/// ```rust,ignore
/// ot_assert!(pool.is_empty(), OT002);
/// ```
#[macro_export]
macro_rules! ot_assert {
    ($cond:expr, $code:ident) => {{
        if !$cond {
            $crate::ot_emit!($code);
        }
    }};
    ($cond:expr, $code:ident, $($ctx:tt)+) => {{
        if !$cond {
            $crate::ot_emit!($code, $($ctx)+);
        }
    }};
}

pub use crate::{ot_assert, ot_diagnostic, ot_emit};

//! Diagnostics raised while the session lock is held.
//!
//! A sink may call back into the tracer, so nothing is emitted under the
//! lock. Handlers queue diagnostics here and the tracer emits them once the
//! lock is released.

use super::emit::emit_with_context;
use super::kind::Diagnostic;

/// A diagnostic waiting to be emitted.
#[derive(Debug, Clone)]
pub(crate) struct DeferredDiagnostic {
    diagnostic: Diagnostic,
    context: String,
}

impl DeferredDiagnostic {
    pub fn new(diagnostic: Diagnostic, context: String) -> Self {
        Self { diagnostic, context }
    }

    #[cfg(test)]
    pub fn code(&self) -> &'static str {
        self.diagnostic.code
    }

    pub fn emit(self) {
        emit_with_context(&self.diagnostic, &self.context);
    }
}

/// Emit every queued diagnostic in order.
pub(crate) fn flush(deferred: Vec<DeferredDiagnostic>) {
    for diagnostic in deferred {
        diagnostic.emit();
    }
}

//! Diagnostic emission backend.
//!
//! Handles outputting diagnostics to stderr, the `log` crate, or a custom sink.

#[cfg(all(not(feature = "log"), any(debug_assertions, feature = "diagnostics")))]
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::kind::{Diagnostic, DiagnosticKind};
use super::strict::{should_panic, should_panic_on_warning};
use crate::sync::mutex::Mutex;

/// Global flag to suppress diagnostic output (for testing).
static DIAGNOSTICS_SUPPRESSED: AtomicBool = AtomicBool::new(false);

/// Global flag to enable verbose diagnostics.
static VERBOSE_DIAGNOSTICS: AtomicBool = AtomicBool::new(false);

/// Installed custom sink, if any.
static SINK: Mutex<Option<Arc<dyn DiagnosticSink>>> = Mutex::new(None);

/// Suppress all diagnostic output.
pub fn suppress_diagnostics(suppress: bool) {
    DIAGNOSTICS_SUPPRESSED.store(suppress, Ordering::Relaxed);
}

/// Enable verbose diagnostic output.
pub fn set_verbose(verbose: bool) {
    VERBOSE_DIAGNOSTICS.store(verbose, Ordering::Relaxed);
}

/// Check if diagnostics are suppressed.
pub fn is_suppressed() -> bool {
    DIAGNOSTICS_SUPPRESSED.load(Ordering::Relaxed)
}

/// Install a sink that receives every emitted diagnostic, or remove it with `None`.
///
/// The sink sees diagnostics even when stderr output is compiled out.
pub fn set_sink(sink: Option<Arc<dyn DiagnosticSink>>) {
    *SINK.lock() = sink;
}

fn forward_to_sink(diag: &Diagnostic) {
    let sink = SINK.lock().clone();
    if let Some(sink) = sink {
        sink.emit(diag);
    }
}

/// Emit a diagnostic.
///
/// In release builds without the `diagnostics` feature, only the sink and
/// strict-mode handling are active. With the `log` feature, output goes to
/// the logger instead of stderr.
pub fn emit(diag: &Diagnostic) {
    forward_to_sink(diag);

    if is_suppressed() {
        return;
    }

    #[cfg(feature = "log")]
    emit_to_log(diag);

    #[cfg(all(not(feature = "log"), any(debug_assertions, feature = "diagnostics")))]
    emit_to_stderr(diag, None);

    check_strict(diag, None);
}

/// Emit a diagnostic with additional runtime context.
pub fn emit_with_context(diag: &Diagnostic, context: &str) {
    forward_to_sink(diag);

    if is_suppressed() {
        return;
    }

    #[cfg(feature = "log")]
    {
        emit_to_log(diag);
        log::info!("  context: {}", context);
    }

    #[cfg(all(not(feature = "log"), any(debug_assertions, feature = "diagnostics")))]
    emit_to_stderr(diag, Some(context));

    check_strict(diag, Some(context));
}

fn check_strict(diag: &Diagnostic, context: Option<&str>) {
    let fatal = match diag.kind {
        DiagnosticKind::Error => should_panic(),
        DiagnosticKind::Warning => should_panic_on_warning(),
        DiagnosticKind::Note | DiagnosticKind::Help => false,
    };

    // A second panic while unwinding would abort the process.
    if fatal && !std::thread::panicking() {
        panic!(
            "[objtrace][{}] {}\nContext: {}\nStrict mode enabled - diagnostics are fatal.",
            diag.code,
            diag.message,
            context.unwrap_or("none")
        );
    }
}

/// Internal: emit to stderr.
#[cfg(all(not(feature = "log"), any(debug_assertions, feature = "diagnostics")))]
fn emit_to_stderr(diag: &Diagnostic, context: Option<&str>) {
    let mut stderr = std::io::stderr();
    let verbose = VERBOSE_DIAGNOSTICS.load(Ordering::Relaxed);

    let _ = writeln!(
        stderr,
        "[objtrace][{}] {}: {}",
        diag.code,
        diag.kind.prefix(),
        diag.message
    );

    if let Some(context) = context {
        let _ = writeln!(stderr, "  context: {}", context);
    }

    if let Some(note) = diag.note {
        let _ = writeln!(stderr, "  note: {}", note);
    }

    if let Some(help) = diag.help {
        let _ = writeln!(stderr, "  help: {}", help);
    }

    if verbose && diag.kind == DiagnosticKind::Error {
        let _ = writeln!(stderr, "  hint: set RUST_BACKTRACE=1 for a backtrace");
    }

    let _ = writeln!(stderr);
}

/// Emit a diagnostic using the log crate.
#[cfg(feature = "log")]
pub fn emit_to_log(diag: &Diagnostic) {
    match diag.kind {
        DiagnosticKind::Error => {
            log::error!("[{}] {}", diag.code, diag.message);
        }
        DiagnosticKind::Warning => {
            log::warn!("[{}] {}", diag.code, diag.message);
        }
        DiagnosticKind::Note | DiagnosticKind::Help => {
            log::info!("[{}] {}", diag.code, diag.message);
        }
    }

    if let Some(note) = diag.note {
        log::info!("  note: {}", note);
    }
    if let Some(help) = diag.help {
        log::info!("  help: {}", help);
    }

    if VERBOSE_DIAGNOSTICS.load(Ordering::Relaxed) && diag.kind == DiagnosticKind::Error {
        log::info!("  hint: set RUST_BACKTRACE=1 for a backtrace");
    }
}

/// A diagnostic sink trait for custom output.
pub trait DiagnosticSink: Send + Sync {
    /// Handle a diagnostic.
    fn emit(&self, diag: &Diagnostic);
}

/// A simple sink that collects diagnostics.
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Create a new collecting sink.
    pub fn new() -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
        }
    }

    /// Get all collected diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }

    /// Count collected diagnostics with the given code.
    pub fn count(&self, code: &str) -> usize {
        self.diagnostics
            .lock()
            .iter()
            .filter(|d| d.code == code)
            .count()
    }

    /// Clear collected diagnostics.
    pub fn clear(&self) {
        self.diagnostics.lock().clear();
    }

    /// Check if any errors were collected.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .lock()
            .iter()
            .any(|d| d.kind == DiagnosticKind::Error)
    }
}

impl Default for CollectingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diag: &Diagnostic) {
        self.diagnostics.lock().push(diag.clone());
    }
}

//! Allocation-site backtraces.
//!
//! Records the host-side call stack at the moment a creation event is
//! delivered, for hosts whose own source locations are too coarse.

use std::fmt::Write;

/// Frames kept per captured backtrace.
const MAX_FRAMES: usize = 16;

/// Capture and render the current call stack, skipping tracer frames.
pub(crate) fn capture() -> String {
    let bt = backtrace::Backtrace::new();
    let mut rendered = String::new();
    let mut kept = 0;

    for frame in bt.frames() {
        for symbol in frame.symbols() {
            let name = symbol
                .name()
                .map(|name| name.to_string())
                .unwrap_or_else(|| "<unknown>".to_string());

            if is_internal(&name) {
                continue;
            }

            let _ = match (symbol.filename(), symbol.lineno()) {
                (Some(file), Some(line)) => writeln!(rendered, "  {} at {}:{}", name, file.display(), line),
                _ => writeln!(rendered, "  {}", name),
            };

            kept += 1;
            if kept == MAX_FRAMES {
                return rendered;
            }
        }
    }

    rendered
}

fn is_internal(symbol: &str) -> bool {
    symbol.starts_with("objtrace::") || symbol.starts_with("backtrace::")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_frames_filtered() {
        assert!(is_internal("objtrace::api::tracer::Tracer<R>::on_new_object"));
        assert!(is_internal("backtrace::capture::Backtrace::new"));
        assert!(!is_internal("my_vm::interp::run"));
    }

    #[test]
    fn test_capture_is_bounded() {
        let rendered = capture();
        assert!(rendered.lines().count() <= MAX_FRAMES);
    }
}

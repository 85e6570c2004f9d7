//! Build script for objtrace.
//!
//! Warns about feature combinations that are almost always a mistake.

use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_DEBUG");
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_LOG");

    let debug_enabled = env::var("CARGO_FEATURE_DEBUG").is_ok();
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    if debug_enabled && profile == "release" {
        emit_warning("'debug' feature enabled in release build");
        emit_note("Every traced allocation captures a backtrace when capture_backtraces is set.");
        emit_note("Disable it with TraceConfig::with_backtraces(false) or drop the feature.");
    }

    let target = env::var("TARGET").unwrap_or_default();
    if debug_enabled && target.contains("wasm") {
        emit_warning("'debug' feature on a WebAssembly target");
        emit_note("Backtraces are usually unavailable there and render as empty.");
    }
}

fn emit_warning(msg: &str) {
    println!("cargo:warning=[objtrace] {}", msg);
}

fn emit_note(msg: &str) {
    println!("cargo:warning=[objtrace]    {}", msg);
}

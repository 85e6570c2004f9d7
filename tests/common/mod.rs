//! Shared mock host for integration tests.

#![allow(dead_code)]

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use objtrace::{ClassRef, Runtime};

/// A fake managed runtime with a settable generation counter and class table.
#[derive(Default)]
pub struct MockRuntime {
    gc: AtomicU64,
    classes: Mutex<HashMap<u64, String>>,
    hooks_enabled: AtomicBool,
    hook_toggles: AtomicUsize,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named class.
    pub fn with_class(self, class: u64, path: &str) -> Self {
        self.classes.lock().unwrap().insert(class, path.to_string());
        self
    }

    /// Simulate a collection cycle.
    pub fn run_gc(&self) {
        self.gc.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hooks_enabled(&self) -> bool {
        self.hooks_enabled.load(Ordering::Relaxed)
    }

    pub fn hook_toggles(&self) -> usize {
        self.hook_toggles.load(Ordering::Relaxed)
    }
}

impl Runtime for MockRuntime {
    fn gc_count(&self) -> u64 {
        self.gc.load(Ordering::Relaxed)
    }

    fn class_path(&self, class: ClassRef) -> Option<Cow<'_, str>> {
        self.classes
            .lock()
            .unwrap()
            .get(&class.0)
            .map(|path| Cow::Owned(path.clone()))
    }

    fn set_event_hooks(&self, enabled: bool) {
        self.hooks_enabled.store(enabled, Ordering::Relaxed);
        self.hook_toggles.fetch_add(1, Ordering::Relaxed);
    }
}

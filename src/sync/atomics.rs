//! Atomic helpers for tracer-wide counters.
//!
//! These are read on the event hot path without taking the session lock,
//! so everything here uses relaxed ordering. Exact values only matter once
//! the session lock has been acquired.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// A monotonically increasing event counter.
pub struct AtomicCounter(AtomicU64);

impl AtomicCounter {
    /// Create a new counter.
    pub const fn new(initial: u64) -> Self {
        Self(AtomicU64::new(initial))
    }

    /// Increment the counter.
    #[inline]
    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current value.
    #[inline]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for AtomicCounter {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Current session-stack depth with a high-water mark.
pub struct DepthGauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl DepthGauge {
    /// Create a gauge at depth zero.
    pub const fn new() -> Self {
        Self {
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Publish a new depth, updating the peak.
    pub fn set(&self, depth: usize) {
        self.current.store(depth, Ordering::Relaxed);

        let mut peak = self.peak.load(Ordering::Relaxed);
        while depth > peak {
            match self.peak.compare_exchange_weak(
                peak,
                depth,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(p) => peak = p,
            }
        }
    }

    /// Last published depth.
    #[inline]
    pub fn get(&self) -> usize {
        self.current.load(Ordering::Relaxed)
    }

    /// Deepest nesting observed.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Relaxed)
    }
}

impl Default for DepthGauge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter() {
        let counter = AtomicCounter::default();
        counter.increment();
        counter.increment();
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_depth_gauge_tracks_peak() {
        let gauge = DepthGauge::new();
        gauge.set(1);
        gauge.set(3);
        gauge.set(2);
        gauge.set(0);

        assert_eq!(gauge.get(), 0);
        assert_eq!(gauge.peak(), 3);
    }
}

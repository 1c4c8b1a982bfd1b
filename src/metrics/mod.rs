use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Monotonic observational counters shared across all request handlers.
/// Atomics keep read-mostly endpoints like `/health` off the store lock.
#[derive(Debug, Default)]
pub struct CounterSet {
    requests: AtomicU64,
    calculations: AtomicU64,
    queries: AtomicU64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CounterSnapshot {
    pub requests: u64,
    pub calculations: u64,
    pub queries: u64,
}

impl CounterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment and return the post-increment value.
    pub fn bump_requests(&self) -> u64 {
        self.requests.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn bump_calculations(&self) -> u64 {
        self.calculations.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn bump_queries(&self) -> u64 {
        self.queries.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn calculations(&self) -> u64 {
        self.calculations.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            calculations: self.calculations.load(Ordering::Relaxed),
            queries: self.queries.load(Ordering::Relaxed),
        }
    }
}

// ── Timing helpers ────────────────────────────────────────────────────────────

/// Runs `f`, returns its result and the elapsed duration.
pub fn timed<F, R>(f: F) -> (R, Duration)
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

/// Elapsed milliseconds since `start`, rounded to 2 decimals for response
/// bodies.
pub fn elapsed_ms(start: Instant) -> f64 {
    round2(start.elapsed().as_secs_f64() * 1000.0)
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

//! Operation timing.
//!
//! One operation is timed at a time: `start` sets the pending marker and
//! `finish` consumes it. A `finish` with no pending marker is ignored.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

#[derive(Debug, Default)]
struct TimingState {
    pending: Option<Instant>,
    calls: u64,
    total: Duration,
    last: Option<Duration>,
    slow_threshold: Option<Duration>,
}

/// Thread-safe operation timer.
#[derive(Debug, Default)]
pub struct OperationTracker {
    state: Mutex<TimingState>,
}

impl OperationTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the slow-operation threshold.
    pub fn set_slow_threshold(&self, threshold: Option<Duration>) {
        if let Ok(mut state) = self.state.lock() {
            state.slow_threshold = threshold;
        }
    }

    /// The slow-operation threshold, if any.
    pub fn slow_threshold(&self) -> Option<Duration> {
        self.state.lock().ok().and_then(|state| state.slow_threshold)
    }

    /// Mark the start of an operation, replacing any pending marker.
    pub fn start(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.pending = Some(Instant::now());
        }
    }

    /// Stop the pending timer and record the elapsed time.
    ///
    /// Returns `None` if no operation was started.
    pub fn finish(&self) -> Option<Duration> {
        let mut state = self.state.lock().ok()?;
        let started = state.pending.take()?;
        let elapsed = started.elapsed();

        state.calls += 1;
        state.total += elapsed;
        state.last = Some(elapsed);
        Some(elapsed)
    }

    /// Drop the pending marker without recording it.
    pub fn clear_pending(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.pending = None;
        }
    }

    /// Whether an operation is currently being timed.
    pub fn is_pending(&self) -> bool {
        self.state
            .lock()
            .map(|state| state.pending.is_some())
            .unwrap_or(false)
    }

    /// Clear all recorded timings. The threshold is kept.
    pub fn reset(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.pending = None;
            state.calls = 0;
            state.total = Duration::ZERO;
            state.last = None;
        }
    }

    /// Get the current snapshot.
    pub fn snapshot(&self) -> TimingSnapshot {
        let Ok(state) = self.state.lock() else {
            return TimingSnapshot::default();
        };

        let total_ms = as_millis(state.total);
        let average_ms = if state.calls == 0 {
            0.0
        } else {
            total_ms / state.calls as f64
        };

        TimingSnapshot {
            calls: state.calls,
            total_ms,
            average_ms,
            last_ms: state.last.map(as_millis),
        }
    }
}

fn as_millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// A point-in-time snapshot of operation timings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingSnapshot {
    /// Completed operations.
    pub calls: u64,
    /// Cumulative duration in milliseconds.
    pub total_ms: f64,
    /// Average duration in milliseconds.
    pub average_ms: f64,
    /// Duration of the most recent operation in milliseconds.
    pub last_ms: Option<f64>,
}

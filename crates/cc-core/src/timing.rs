//! Lightweight timing accumulators.
//!
//! Used to measure how long tasks hold control locks. Recording is lock-free
//! so it can happen from any task thread without adding contention.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Accumulating timer for tracking total time across multiple calls.
#[derive(Debug)]
pub struct AccumulatingTimer {
    total_ns: AtomicU64,
    max_ns: AtomicU64,
    count: AtomicU64,
}

impl Default for AccumulatingTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl AccumulatingTimer {
    /// Create a new accumulating timer.
    pub const fn new() -> Self {
        Self {
            total_ns: AtomicU64::new(0),
            max_ns: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Record a timing measurement.
    pub fn record(&self, elapsed: Duration) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.total_ns.fetch_add(nanos, Ordering::Relaxed);
        self.max_ns.fetch_max(nanos, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total time spent.
    pub fn total(&self) -> Duration {
        Duration::from_nanos(self.total_ns.load(Ordering::Relaxed))
    }

    /// Longest single measurement.
    pub fn max(&self) -> Duration {
        Duration::from_nanos(self.max_ns.load(Ordering::Relaxed))
    }

    /// Get number of calls.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Get average time per call.
    pub fn average(&self) -> Duration {
        let count = self.count();
        if count > 0 {
            Duration::from_nanos(self.total_ns.load(Ordering::Relaxed) / count)
        } else {
            Duration::ZERO
        }
    }

    /// Copy the current counters out.
    pub fn summary(&self) -> TimingSummary {
        TimingSummary {
            count: self.count(),
            total: self.total(),
            average: self.average(),
            max: self.max(),
        }
    }
}

/// Point-in-time copy of an [`AccumulatingTimer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimingSummary {
    pub count: u64,
    pub total: Duration,
    pub average: Duration,
    pub max: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_and_averages() {
        let timer = AccumulatingTimer::new();
        timer.record(Duration::from_micros(100));
        timer.record(Duration::from_micros(300));

        let summary = timer.summary();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total, Duration::from_micros(400));
        assert_eq!(summary.average, Duration::from_micros(200));
        assert_eq!(summary.max, Duration::from_micros(300));
    }

    #[test]
    fn empty_timer_has_zero_average() {
        let timer = AccumulatingTimer::default();
        assert_eq!(timer.average(), Duration::ZERO);

        assert_eq!(timer.summary(), TimingSummary::default());
    }
}

//! Periodic cadence primitives for scheduled tasks.
//!
//! Tasks tick at a configured period. The clock schedules deadlines from the
//! previous deadline rather than from "now", so slow ticks do not accumulate
//! drift; if a task falls more than a whole period behind, missed ticks are
//! skipped instead of bursting.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};

/// Tick period of a task or renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickPeriod {
    period: Duration,
}

impl TickPeriod {
    /// Create a new period. Zero is rejected.
    pub fn new(period: Duration) -> ControlResult<Self> {
        if period.is_zero() {
            return Err(ControlError::InvalidArg {
                what: "period must be positive",
            });
        }
        Ok(Self { period })
    }

    pub fn from_millis(ms: u64) -> ControlResult<Self> {
        Self::new(Duration::from_millis(ms))
    }

    /// Create a period from a frequency in Hz.
    pub fn from_frequency(freq_hz: f64) -> ControlResult<Self> {
        if !(freq_hz.is_finite() && freq_hz > 0.0) {
            return Err(ControlError::InvalidArg {
                what: "frequency must be positive",
            });
        }
        Self::new(Duration::from_secs_f64(1.0 / freq_hz))
    }

    pub fn duration(&self) -> Duration {
        self.period
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.period.as_secs_f64()
    }

    /// Get the frequency in Hz.
    pub fn frequency(&self) -> f64 {
        1.0 / self.period.as_secs_f64()
    }
}

/// Tracks when a task should next run.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleClock {
    period: TickPeriod,
    next_sample: Instant,
}

impl SampleClock {
    /// First sample is one period after `start`.
    pub fn new(period: TickPeriod, start: Instant) -> Self {
        Self {
            period,
            next_sample: start + period.duration(),
        }
    }

    pub fn period(&self) -> TickPeriod {
        self.period
    }

    pub fn next_sample(&self) -> Instant {
        self.next_sample
    }

    pub fn should_sample(&self, now: Instant) -> bool {
        now >= self.next_sample
    }

    /// Advance to the next deadline after a sample has run at `now`.
    pub fn advance(&mut self, now: Instant) {
        self.next_sample += self.period.duration();
        if self.next_sample <= now {
            self.next_sample = now + self.period.duration();
        }
    }

    pub fn time_until_sample(&self, now: Instant) -> Duration {
        self.next_sample.saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_creation() {
        let p = TickPeriod::from_millis(100).unwrap();
        assert_eq!(p.duration(), Duration::from_millis(100));
        assert!((p.frequency() - 10.0).abs() < 1e-9);
        assert!(TickPeriod::from_millis(0).is_err());
        assert!(TickPeriod::from_frequency(0.0).is_err());
    }

    #[test]
    fn period_from_frequency() {
        let p = TickPeriod::from_frequency(4.0).unwrap();
        assert_eq!(p.duration(), Duration::from_millis(250));
    }

    #[test]
    fn sample_clock_basic() {
        let start = Instant::now();
        let period = TickPeriod::from_millis(100).unwrap();
        let mut clock = SampleClock::new(period, start);

        assert!(!clock.should_sample(start));
        assert!(clock.should_sample(start + Duration::from_millis(100)));

        clock.advance(start + Duration::from_millis(100));
        assert!(!clock.should_sample(start + Duration::from_millis(150)));
        assert!(clock.should_sample(start + Duration::from_millis(200)));
    }

    #[test]
    fn sample_clock_skips_missed_ticks() {
        let start = Instant::now();
        let period = TickPeriod::from_millis(100).unwrap();
        let mut clock = SampleClock::new(period, start);

        let late = start + Duration::from_millis(450);
        clock.advance(late);
        assert_eq!(clock.next_sample(), late + Duration::from_millis(100));
    }

    #[test]
    fn sample_clock_time_until_sample() {
        let start = Instant::now();
        let clock = SampleClock::new(TickPeriod::from_millis(100).unwrap(), start);

        assert_eq!(clock.time_until_sample(start), Duration::from_millis(100));
        assert_eq!(
            clock.time_until_sample(start + Duration::from_millis(40)),
            Duration::from_millis(60)
        );
        assert_eq!(
            clock.time_until_sample(start + Duration::from_millis(150)),
            Duration::ZERO
        );
    }
}

//! Wall-clock timing helpers. All timestamps are milliseconds supplied by
//! the host; the core never reads a clock itself.

use serde::{Deserialize, Serialize};

/// Milliseconds, either a timestamp or a duration.
pub type Millis = u64;

/// Percentage of `duration` elapsed since `start`, clamped to `0.0..=100.0`.
///
/// A zero duration is complete immediately. A `now` earlier than `start`
/// counts as no progress.
pub fn progress_percent(now: Millis, start: Millis, duration: Millis) -> f64 {
    if duration == 0 {
        return 100.0;
    }
    let elapsed = now.saturating_sub(start) as f64;
    (elapsed / duration as f64 * 100.0).min(100.0)
}

/// A running countdown anchored at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub start: Millis,
    pub duration: Millis,
}

impl Timer {
    pub fn new(start: Millis, duration: Millis) -> Self {
        Self { start, duration }
    }

    pub fn progress(&self, now: Millis) -> f64 {
        progress_percent(now, self.start, self.duration)
    }

    /// Integer comparison, so completion never depends on float rounding.
    pub fn is_finished(&self, now: Millis) -> bool {
        now.saturating_sub(self.start) >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_linear_and_clamped() {
        assert_eq!(progress_percent(0, 0, 1000), 0.0);
        assert_eq!(progress_percent(500, 0, 1000), 50.0);
        assert_eq!(progress_percent(1000, 0, 1000), 100.0);
        assert_eq!(progress_percent(5000, 0, 1000), 100.0);
    }

    #[test]
    fn clock_skew_counts_as_no_progress() {
        assert_eq!(progress_percent(10, 500, 1000), 0.0);
    }

    #[test]
    fn zero_duration_is_complete() {
        assert_eq!(progress_percent(0, 0, 0), 100.0);
        assert!(Timer::new(7, 0).is_finished(7));
    }

    #[test]
    fn timer_finishes_exactly_at_duration() {
        let timer = Timer::new(1000, 250);
        assert!(!timer.is_finished(1249));
        assert!(timer.is_finished(1250));
    }
}

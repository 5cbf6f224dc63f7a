//! Progress ticker
//!
//! A cooperative repeating timer. The controller arms it on entering
//! `Playing` and disarms it on leaving; the host polls it and sleeps until
//! `next_deadline()` in between. Nothing runs on another thread.

use std::time::{Duration, Instant};

/// Repeating deadline that only exists while armed
#[derive(Debug, Clone)]
pub struct ProgressTicker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl ProgressTicker {
    /// Create a disarmed ticker
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Tick interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Schedule the first tick one interval after `now`
    ///
    /// Re-arming an armed ticker keeps the existing deadline.
    pub fn arm(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now + self.interval);
        }
    }

    /// Cancel any pending tick
    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    /// Whether a tick is pending
    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// When the next tick is due
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_due
    }

    /// Consume a due tick
    ///
    /// Returns true at most once per deadline and schedules the next one an
    /// interval after `now`, so a stalled host does not get a burst of ticks.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

/// Display ratio 0-100 of `position` against `total`
///
/// A zero total (not yet prepared, or a stream without a length) reads as 0.
pub fn progress_percent(position: Duration, total: Duration) -> f32 {
    if total.is_zero() {
        return 0.0;
    }
    let ratio = position.as_secs_f64() / total.as_secs_f64();
    (ratio * 100.0).clamp(0.0, 100.0) as f32
}

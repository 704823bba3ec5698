//! Elapsed-time bookkeeping for per-tick schedules.

/// A repeating schedule polled once per tick. Firing never blocks: a poll
/// either reports the period has elapsed or returns `false`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    period: f32,
    elapsed: f32,
}

impl Interval {
    /// First firing after one full period.
    pub fn new(period: f32) -> Self {
        Self {
            period: period.max(0.0),
            elapsed: 0.0,
        }
    }

    /// First firing on the first poll.
    pub fn primed(period: f32) -> Self {
        let period = period.max(0.0);
        Self {
            period,
            elapsed: period,
        }
    }

    pub fn period(&self) -> f32 {
        self.period
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Add `dt` seconds and report whether the period has elapsed.
    /// Fires at most once per call. Overshoot past the period carries into
    /// the next one; whole periods skipped by a long frame are dropped.
    pub fn poll(&mut self, dt: f32) -> bool {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        if self.elapsed >= self.period {
            self.elapsed = if self.period > 0.0 {
                (self.elapsed - self.period) % self.period
            } else {
                0.0
            };
            true
        } else {
            false
        }
    }
}

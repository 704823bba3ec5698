//! The struggle meter: a bounded gauge that decays on a schedule and grows
//! with player actions.

use log::debug;

use crate::core::timer::Interval;

/// Result of one `decay` or `gain` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterChange {
    pub previous: f32,
    pub value: f32,
    /// Set only on the call that took the value from positive to zero.
    pub exhausted: bool,
}

impl MeterChange {
    pub fn changed(&self) -> bool {
        self.previous != self.value
    }
}

#[derive(Debug, Clone)]
pub struct ResourceMeter {
    value: f32,
    decay_per_tick: u32,
    gain_per_event: f32,
    schedule: Option<Interval>,
}

impl ResourceMeter {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 100.0;

    pub fn new(initial: f32, decay_per_tick: u32, gain_per_event: f32) -> Self {
        let value = if initial.is_nan() {
            Self::MIN
        } else {
            initial.clamp(Self::MIN, Self::MAX)
        };
        Self {
            value,
            decay_per_tick,
            gain_per_event: gain_per_event.max(0.0),
            schedule: None,
        }
    }

    pub fn snapshot(&self) -> f32 {
        self.value
    }

    pub fn decay_per_tick(&self) -> u32 {
        self.decay_per_tick
    }

    pub fn gain_per_event(&self) -> f32 {
        self.gain_per_event
    }

    /// Negative amounts count as zero.
    pub fn decay(&mut self, amount: f32) -> MeterChange {
        let previous = self.value;
        if amount.is_finite() {
            self.value = (self.value - amount.max(0.0)).clamp(Self::MIN, Self::MAX);
        }
        MeterChange {
            previous,
            value: self.value,
            exhausted: previous > Self::MIN && self.value <= Self::MIN,
        }
    }

    /// Negative amounts count as zero.
    pub fn gain(&mut self, amount: f32) -> MeterChange {
        let previous = self.value;
        if amount.is_finite() {
            self.value = (self.value + amount.max(0.0)).clamp(Self::MIN, Self::MAX);
        }
        MeterChange {
            previous,
            value: self.value,
            exhausted: false,
        }
    }

    /// Apply the configured per-event gain.
    pub fn gain_event(&mut self) -> MeterChange {
        self.gain(self.gain_per_event)
    }

    pub fn is_decaying(&self) -> bool {
        self.schedule.is_some()
    }

    /// Begin decaying once every `period` seconds. The first decay lands on
    /// the next tick. Does nothing if already decaying.
    pub fn start_decay(&mut self, period: f32) {
        if self.schedule.is_none() {
            debug!("meter decay started at {} (every {}s)", self.value, period);
            self.schedule = Some(Interval::primed(period));
        }
    }

    pub fn stop_decay(&mut self) {
        if self.schedule.take().is_some() {
            debug!("meter decay stopped at {}", self.value);
        }
    }

    /// Advance the decay schedule. Returns the change when a decay was due.
    pub fn tick(&mut self, dt: f32) -> Option<MeterChange> {
        let due = self.schedule.as_mut()?.poll(dt);
        if due {
            Some(self.decay(self.decay_per_tick as f32))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_and_gain_stay_in_bounds() {
        let mut meter = ResourceMeter::new(50.0, 7, 8.0);
        for i in 0..200 {
            let change = if i % 3 == 0 {
                meter.gain(33.0)
            } else {
                meter.decay(19.0)
            };
            assert!((0.0..=100.0).contains(&change.value));
        }
    }

    #[test]
    fn initial_value_is_clamped() {
        assert_eq!(ResourceMeter::new(150.0, 1, 1.0).snapshot(), 100.0);
        assert_eq!(ResourceMeter::new(-5.0, 1, 1.0).snapshot(), 0.0);
        assert_eq!(ResourceMeter::new(f32::NAN, 1, 1.0).snapshot(), 0.0);
    }

    #[test]
    fn exhausted_fires_once_per_crossing() {
        let mut meter = ResourceMeter::new(10.0, 0, 5.0);
        assert!(!meter.decay(6.0).exhausted);
        assert!(meter.decay(6.0).exhausted);
        assert!(!meter.decay(6.0).exhausted);
        assert!(!meter.decay(6.0).exhausted);

        meter.gain(5.0);
        assert!(meter.decay(5.0).exhausted);
    }

    #[test]
    fn unchanged_value_is_not_a_change() {
        let mut meter = ResourceMeter::new(100.0, 0, 5.0);
        assert!(!meter.gain(5.0).changed());
        assert!(meter.decay(1.0).changed());
        assert!(!meter.decay(f32::NAN).changed());
    }

    #[test]
    fn negative_amounts_do_not_move_the_meter() {
        let mut meter = ResourceMeter::new(50.0, 0, 0.0);
        let change = meter.gain(-50.0);
        assert_eq!(change.value, 50.0);
        assert!(!change.changed());

        assert_eq!(meter.decay(-20.0).value, 50.0);
        assert_eq!(meter.snapshot(), 50.0);
    }

    #[test]
    fn gain_event_uses_configured_amount() {
        let mut meter = ResourceMeter::new(30.0, 2, 8.0);
        assert_eq!(meter.gain_event().value, 38.0);
    }

    #[test]
    fn schedule_decays_first_tick_then_every_period() {
        let mut meter = ResourceMeter::new(50.0, 25, 0.0);
        assert!(meter.tick(0.1).is_none());

        meter.start_decay(1.0);
        assert_eq!(meter.tick(0.1).map(|c| c.value), Some(25.0));
        assert!(meter.tick(0.5).is_none());
        let change = meter.tick(0.5).unwrap();
        assert_eq!(change.value, 0.0);
        assert!(change.exhausted);
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut meter = ResourceMeter::new(50.0, 10, 0.0);
        meter.start_decay(1.0);
        meter.tick(0.0);
        meter.start_decay(1.0);
        assert!(meter.tick(0.0).is_none(), "restart must not re-prime");

        meter.stop_decay();
        meter.stop_decay();
        assert!(!meter.is_decaying());
        assert!(meter.tick(10.0).is_none());
    }
}

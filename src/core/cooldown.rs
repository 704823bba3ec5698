//! Re-arm timer for an action button.

/// After a successful trigger the action stays locked until strictly more
/// than `duration` seconds have passed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionCooldown {
    duration: f32,
    /// Seconds since the last trigger while cooling down.
    elapsed: Option<f32>,
    disabled: bool,
}

impl ActionCooldown {
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            elapsed: None,
            disabled: false,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn is_ready(&self) -> bool {
        !self.disabled && self.elapsed.is_none()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Fill fraction of the waiting bar, 1.0 when ready.
    pub fn progress(&self) -> f32 {
        match self.elapsed {
            _ if self.disabled => 0.0,
            None => 1.0,
            Some(_) if self.duration <= 0.0 => 1.0,
            Some(elapsed) => (elapsed / self.duration).min(1.0),
        }
    }

    /// Consume the action if it is ready.
    pub fn try_trigger(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        if self.duration > 0.0 {
            self.elapsed = Some(0.0);
        }
        true
    }

    /// Returns `true` on the tick the action becomes ready again.
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(elapsed) = self.elapsed.as_mut() else {
            return false;
        };
        if dt.is_finite() && dt > 0.0 {
            *elapsed += dt;
        }
        if *elapsed > self.duration {
            self.elapsed = None;
            !self.disabled
        } else {
            false
        }
    }

    /// Lock the action for good.
    pub fn disable(&mut self) {
        self.disabled = true;
        self.elapsed = None;
    }
}

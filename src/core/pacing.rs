//! Timed auto-advance of the dialogue channel.

use log::debug;

use crate::core::timer::Interval;

#[derive(Debug, Clone, Copy, PartialEq)]
enum PacingState {
    Stopped,
    Running(Interval),
}

/// What a tick asks of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacingStep {
    Idle,
    /// The current node has been shown for a full interval; advance.
    Due,
}

/// Drives the dialogue forward at a fixed cadence.
///
/// Each firing is: the current node is shown, the interval elapses, the
/// cursor advances. `start` covers the first "shown", `tick` reports the
/// rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacingController {
    state: PacingState,
}

impl Default for PacingController {
    fn default() -> Self {
        Self::new()
    }
}

impl PacingController {
    pub fn new() -> Self {
        Self {
            state: PacingState::Stopped,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, PacingState::Running(_))
    }

    /// Returns `true` when this call started the controller, in which case
    /// the caller should render the current node.
    pub fn start(&mut self, interval: f32) -> bool {
        match self.state {
            PacingState::Running(_) => false,
            PacingState::Stopped => {
                debug!("pacing started, interval {}s", interval);
                self.state = PacingState::Running(Interval::new(interval));
                true
            }
        }
    }

    pub fn stop(&mut self) {
        if self.is_running() {
            debug!("pacing stopped");
        }
        self.state = PacingState::Stopped;
    }

    pub fn tick(&mut self, dt: f32) -> PacingStep {
        match &mut self.state {
            PacingState::Running(timer) => {
                if timer.poll(dt) {
                    PacingStep::Due
                } else {
                    PacingStep::Idle
                }
            }
            PacingState::Stopped => PacingStep::Idle,
        }
    }
}

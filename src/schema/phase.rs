use serde::{Deserialize, Serialize};

/// Top-level state of a session. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SessionPhase {
    Intro,
    MainLoop,
    Ended,
}

impl SessionPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::MainLoop => "main_loop",
            Self::Ended => "ended",
        }
    }
}

/// The three terminal branches a session can finish on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ending {
    /// The struggle meter ran dry.
    Losing,
    /// Barely held on.
    Retribution,
    Hero,
}

impl Ending {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Losing => "losing",
            Self::Retribution => "retribution",
            Self::Hero => "hero",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_are_ordered() {
        assert!(SessionPhase::Intro < SessionPhase::MainLoop);
        assert!(SessionPhase::MainLoop < SessionPhase::Ended);
    }

    #[test]
    fn names() {
        assert_eq!(SessionPhase::MainLoop.name(), "main_loop");
        assert_eq!(Ending::Retribution.name(), "retribution");
    }
}

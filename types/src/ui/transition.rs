//! Transition effects for the overlay card and its dimmer.

use std::time::Duration;

use super::animation::{AnimPhase, EffectTimer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Card entrance.
    SlideDown,
    /// Card exit.
    SlideUp,
    /// Dimmer entrance.
    FadeIn,
    /// Dimmer exit.
    FadeOut,
}

impl TransitionKind {
    #[must_use]
    pub const fn is_entrance(self) -> bool {
        matches!(self, Self::SlideDown | Self::FadeIn)
    }
}

#[derive(Debug, Clone)]
pub struct TransitionEffect {
    kind: TransitionKind,
    timer: EffectTimer,
}

impl TransitionEffect {
    #[must_use]
    pub fn slide_down(duration: Duration) -> Self {
        Self::new(TransitionKind::SlideDown, duration)
    }

    #[must_use]
    pub fn slide_up(duration: Duration) -> Self {
        Self::new(TransitionKind::SlideUp, duration)
    }

    #[must_use]
    pub fn fade_in(duration: Duration) -> Self {
        Self::new(TransitionKind::FadeIn, duration)
    }

    #[must_use]
    pub fn fade_out(duration: Duration) -> Self {
        Self::new(TransitionKind::FadeOut, duration)
    }

    fn new(kind: TransitionKind, duration: Duration) -> Self {
        Self {
            kind,
            timer: EffectTimer::new(duration),
        }
    }

    pub fn advance(&mut self, delta: Duration) {
        self.timer.advance(delta);
    }

    #[must_use]
    pub fn phase(&self) -> AnimPhase {
        self.timer.phase()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase(), AnimPhase::Completed)
    }

    #[must_use]
    pub fn kind(&self) -> TransitionKind {
        self.kind
    }
}

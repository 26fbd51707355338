//! Modal overlay presenter.
//!
//! One overlay is live at a time. The presenter walks
//! `Closed → Opening → Open → Closing → Closed`, holds a [`BusyToken`] while
//! visible, and only clears the card once the exit transition has finished.
//! A `show` that arrives while closing waits as the single pending request.

use std::mem;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use labelui_config::OverlayConfig;
use labelui_types::ui::{
    AnimPhase, CardSize, OverlayContent, OverlayPhase, OverlayRequest, TransitionEffect,
    TransitionKind,
};

use crate::gate::{BusyToken, UiBlockGate};

/// Rendering side of the overlay: the dimmer and the card on top of it.
pub trait OverlaySurface: Send {
    fn set_card_size(&mut self, size: CardSize);
    fn set_content(&mut self, content: &OverlayContent);
    fn clear_content(&mut self);
    fn begin_transition(&mut self, kind: TransitionKind);
    /// Called on every tick while a transition runs.
    fn transition_frame(&mut self, _kind: TransitionKind, _progress: f32) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlaySettings {
    pub default_size: CardSize,
    pub large_size: CardSize,
    /// Dimmer fades and card entrance.
    pub fade: Duration,
    /// Card exit.
    pub slide: Duration,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self::from(&OverlayConfig::default())
    }
}

impl From<&OverlayConfig> for OverlaySettings {
    fn from(config: &OverlayConfig) -> Self {
        Self {
            default_size: config.default_size(),
            large_size: config.large_size(),
            fade: config.fade(),
            slide: config.slide(),
        }
    }
}

impl OverlaySettings {
    #[must_use]
    pub fn instant() -> Self {
        Self {
            fade: Duration::ZERO,
            slide: Duration::ZERO,
            ..Self::default()
        }
    }
}

pub struct OverlayPresenter {
    surface: Box<dyn OverlaySurface>,
    gate: UiBlockGate,
    settings: OverlaySettings,
    phase: OverlayPhase,
    current: Option<OverlayRequest>,
    card: Option<TransitionEffect>,
    dimmer: Option<TransitionEffect>,
    pending: Option<OverlayRequest>,
    token: Option<BusyToken>,
    retained: Option<BusyToken>,
}

impl OverlayPresenter {
    pub fn new(surface: Box<dyn OverlaySurface>, gate: UiBlockGate, settings: OverlaySettings) -> Self {
        Self {
            surface,
            gate,
            settings,
            phase: OverlayPhase::Closed,
            current: None,
            card: None,
            dimmer: None,
            pending: None,
            token: None,
            retained: None,
        }
    }

    pub fn show(&mut self, request: OverlayRequest) {
        match self.phase {
            OverlayPhase::Closed => self.open(request),
            OverlayPhase::Opening | OverlayPhase::Open => {
                tracing::debug!(content = request.content.label(), "Replacing overlay content");
                self.surface.set_card_size(self.size_for(&request));
                self.surface.set_content(&request.content);
                self.current = Some(request);
            }
            OverlayPhase::Closing => {
                if let Some(previous) = self.pending.replace(request) {
                    tracing::debug!(
                        dropped = previous.content.label(),
                        "Pending overlay superseded"
                    );
                }
            }
        }
    }

    pub fn hide(&mut self) {
        match self.phase {
            OverlayPhase::Opening | OverlayPhase::Open => {
                tracing::debug!("Closing overlay");
                self.start(
                    TransitionEffect::slide_up(self.settings.slide),
                    TransitionEffect::fade_out(self.settings.fade),
                );
                self.phase = OverlayPhase::Closing;
                self.advance(Duration::ZERO);
            }
            OverlayPhase::Closing => {
                if let Some(dropped) = self.pending.take() {
                    tracing::debug!(dropped = dropped.content.label(), "Pending overlay cancelled");
                }
            }
            OverlayPhase::Closed => {}
        }
    }

    /// Advance running transitions; returns the phase afterwards.
    pub fn tick(&mut self, delta: Duration) -> OverlayPhase {
        self.advance(delta);
        self.phase
    }

    /// Drop the hold kept by a `keep_blocked_after` close.
    pub fn release_retained_block(&mut self) -> bool {
        self.retained.take().is_some()
    }

    #[must_use]
    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    #[must_use]
    pub fn content(&self) -> Option<&OverlayContent> {
        self.current.as_ref().map(|request| &request.content)
    }

    #[must_use]
    pub fn pending(&self) -> Option<&OverlayRequest> {
        self.pending.as_ref()
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.card.is_some() || self.dimmer.is_some()
    }

    #[must_use]
    pub fn holds_block(&self) -> bool {
        self.token.is_some() || self.retained.is_some()
    }

    fn size_for(&self, request: &OverlayRequest) -> CardSize {
        if request.large {
            self.settings.large_size
        } else {
            self.settings.default_size
        }
    }

    fn open(&mut self, request: OverlayRequest) {
        tracing::debug!(
            content = request.content.label(),
            large = request.large,
            "Opening overlay"
        );
        self.token = Some(self.gate.acquire("overlay"));
        self.surface.set_card_size(self.size_for(&request));
        self.surface.set_content(&request.content);
        self.current = Some(request);
        self.start(
            TransitionEffect::slide_down(self.settings.fade),
            TransitionEffect::fade_in(self.settings.fade),
        );
        self.phase = OverlayPhase::Opening;
        self.advance(Duration::ZERO);
    }

    fn start(&mut self, card: TransitionEffect, dimmer: TransitionEffect) {
        self.surface.begin_transition(card.kind());
        self.surface.begin_transition(dimmer.kind());
        self.card = Some(card);
        self.dimmer = Some(dimmer);
    }

    fn advance(&mut self, delta: Duration) {
        for effect in [self.card.as_mut(), self.dimmer.as_mut()].into_iter().flatten() {
            effect.advance(delta);
            let progress = match effect.phase() {
                AnimPhase::Running { progress } => progress,
                AnimPhase::Completed => 1.0,
            };
            self.surface.transition_frame(effect.kind(), progress);
        }

        let settled = [&self.card, &self.dimmer]
            .into_iter()
            .all(|effect| effect.as_ref().is_none_or(TransitionEffect::is_finished));
        if !settled {
            return;
        }

        match self.phase {
            OverlayPhase::Opening => {
                self.card = None;
                self.dimmer = None;
                self.phase = OverlayPhase::Open;
            }
            OverlayPhase::Closing => self.finish_close(),
            OverlayPhase::Closed | OverlayPhase::Open => {}
        }
    }

    fn finish_close(&mut self) {
        self.card = None;
        self.dimmer = None;
        self.surface.clear_content();
        self.surface.set_card_size(self.settings.default_size);
        self.phase = OverlayPhase::Closed;

        let keep_blocked = self
            .current
            .take()
            .is_some_and(|closed| closed.keep_blocked_after);
        let token = self.token.take();
        // Released only after the pending overlay has taken its own hold.
        let released = if keep_blocked {
            tracing::debug!("Overlay closed; interface stays blocked");
            (mem::replace(&mut self.retained, token), None)
        } else {
            tracing::debug!("Overlay closed");
            (self.retained.take(), token)
        };

        if let Some(next) = self.pending.take() {
            self.open(next);
        }
        drop(released);
    }
}

/// Shared handle to the one overlay presenter.
#[derive(Clone)]
pub struct OverlayHandle {
    inner: Arc<Mutex<OverlayPresenter>>,
}

impl OverlayHandle {
    #[must_use]
    pub fn new(presenter: OverlayPresenter) -> Self {
        Self {
            inner: Arc::new(Mutex::new(presenter)),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut OverlayPresenter) -> R) -> R {
        let mut presenter = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut presenter)
    }

    pub fn show(&self, request: OverlayRequest) {
        self.with(|presenter| presenter.show(request));
    }

    pub fn hide(&self) {
        self.with(OverlayPresenter::hide);
    }

    pub fn tick(&self, delta: Duration) -> OverlayPhase {
        self.with(|presenter| presenter.tick(delta))
    }

    pub fn release_retained_block(&self) -> bool {
        self.with(OverlayPresenter::release_retained_block)
    }

    #[must_use]
    pub fn phase(&self) -> OverlayPhase {
        self.with(|presenter| presenter.phase())
    }

    #[must_use]
    pub fn content(&self) -> Option<OverlayContent> {
        self.with(|presenter| presenter.content().cloned())
    }

    /// Drive transitions from a timer until the task is aborted.
    pub fn spawn_ticker(&self, frame: Duration) -> tokio::task::JoinHandle<()> {
        let handle = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(frame);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            let mut last = tokio::time::Instant::now();
            loop {
                let now = interval.tick().await;
                handle.tick(now.saturating_duration_since(last));
                last = now;
            }
        })
    }
}

//! The running annotation interface and its window event handlers.

use std::sync::Arc;

use labelui_types::{Destination, Viewport, ViewportLayout};
use labelui_utils::CookieStore;

use crate::collaborators::{AiWorkerPanel, CommandListener, Gallery, LabelClassLegend, Navigator};
use crate::error::ServiceError;
use crate::gate::UiBlockGate;
use crate::layout::LayoutEngine;
use crate::overlay::OverlayHandle;
use crate::session::SessionGuard;

pub const SKIP_TUTORIAL_COOKIE: &str = "skipTutorial";
const SKIP_TUTORIAL_DAYS: i64 = 365;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEvent {
    Resized(Viewport),
    BeforeUnload,
    Logout,
}

/// Handlers wired once the gallery exists.
pub struct EventHandlers {
    gallery: Arc<dyn Gallery>,
    layout: LayoutEngine,
    navigator: Arc<dyn Navigator>,
}

impl EventHandlers {
    pub fn new(gallery: Arc<dyn Gallery>, layout: LayoutEngine, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            gallery,
            layout,
            navigator,
        }
    }

    pub fn resized(&self, viewport: Viewport) -> Option<ViewportLayout> {
        self.layout.recompute(viewport, self.gallery.as_ref())
    }

    pub async fn before_unload(&self) -> Result<(), ServiceError> {
        self.final_flush().await
    }

    /// Flush pending annotations, then leave for the logout page regardless.
    pub async fn logout(&self) -> Result<(), ServiceError> {
        let flushed = self.final_flush().await;
        if let Err(err) = &flushed {
            tracing::warn!(error = %err, "Final submission failed before logout");
        }
        self.navigator.navigate(Destination::Logout);
        flushed
    }

    /// Every exit path submits; repeated submissions are the gallery's to absorb.
    async fn final_flush(&self) -> Result<(), ServiceError> {
        self.gallery.submit_annotations(true).await
    }
}

/// Subsystems kept alive for the lifetime of the interface.
pub struct Subsystems {
    pub command_listener: Arc<dyn CommandListener>,
    pub legend: Arc<dyn LabelClassLegend>,
    pub gallery: Arc<dyn Gallery>,
    pub ai_worker_panel: Option<Arc<dyn AiWorkerPanel>>,
}

pub struct AnnotationInterface {
    handlers: EventHandlers,
    subsystems: Subsystems,
    session: Arc<SessionGuard>,
    overlay: OverlayHandle,
    gate: UiBlockGate,
    cookies: Box<dyn CookieStore>,
    layout: Option<ViewportLayout>,
}

impl AnnotationInterface {
    pub(crate) fn new(
        handlers: EventHandlers,
        subsystems: Subsystems,
        session: Arc<SessionGuard>,
        overlay: OverlayHandle,
        gate: UiBlockGate,
        cookies: Box<dyn CookieStore>,
        layout: Option<ViewportLayout>,
    ) -> Self {
        Self {
            handlers,
            subsystems,
            session,
            overlay,
            gate,
            cookies,
            layout,
        }
    }

    /// Dispatch a window event; resizes yield the new layout.
    pub async fn handle(&mut self, event: WindowEvent) -> Result<Option<ViewportLayout>, ServiceError> {
        tracing::debug!(?event, "Window event");
        match event {
            WindowEvent::Resized(viewport) => {
                let layout = self.handlers.resized(viewport);
                if layout.is_some() {
                    self.layout = layout;
                }
                Ok(layout)
            }
            WindowEvent::BeforeUnload => self.handlers.before_unload().await.map(|()| None),
            WindowEvent::Logout => self.handlers.logout().await.map(|()| None),
        }
    }

    /// Close the tutorial, optionally remembering not to show it again.
    pub fn dismiss_tutorial(&mut self, remember: bool) {
        self.overlay.hide();
        if remember {
            self.cookies
                .set(SKIP_TUTORIAL_COOKIE, "true", SKIP_TUTORIAL_DAYS);
        }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionGuard> {
        &self.session
    }

    #[must_use]
    pub fn overlay(&self) -> &OverlayHandle {
        &self.overlay
    }

    #[must_use]
    pub fn gate(&self) -> &UiBlockGate {
        &self.gate
    }

    #[must_use]
    pub fn subsystems(&self) -> &Subsystems {
        &self.subsystems
    }

    #[must_use]
    pub fn cookies(&self) -> &dyn CookieStore {
        self.cookies.as_ref()
    }

    /// Layout from the most recent pass that had tiles to place.
    #[must_use]
    pub fn layout(&self) -> Option<ViewportLayout> {
        self.layout
    }
}

//! Overlay requests and card geometry.

/// What the overlay card displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayContent {
    /// Spinner shown while the interface bootstraps.
    Loading,
    /// Credential form shown when the session expired.
    SessionRenewal {
        /// Pre-filled from the visible user menu; the server has already
        /// dropped the session cookie by the time this is shown.
        username: String,
        invalid_credentials: bool,
    },
    /// First-run walkthrough.
    Tutorial,
    /// Arbitrary pre-rendered markup.
    Markup(String),
}

impl OverlayContent {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::SessionRenewal { .. } => "session-renewal",
            Self::Tutorial => "tutorial",
            Self::Markup(_) => "markup",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayRequest {
    pub content: OverlayContent,
    pub large: bool,
    /// Keep the interface blocked once the overlay has closed.
    pub keep_blocked_after: bool,
}

impl OverlayRequest {
    #[must_use]
    pub fn new(content: OverlayContent) -> Self {
        Self {
            content,
            large: false,
            keep_blocked_after: false,
        }
    }

    #[must_use]
    pub fn large(mut self) -> Self {
        self.large = true;
        self
    }

    #[must_use]
    pub fn keep_blocked_after(mut self) -> Self {
        self.keep_blocked_after = true;
        self
    }
}

/// A card dimension, either in pixels or relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extent {
    Pixels(f64),
    Percent(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardSize {
    pub width: Extent,
    pub height: Extent,
}

impl CardSize {
    #[must_use]
    pub const fn pixels(width: f64, height: f64) -> Self {
        Self {
            width: Extent::Pixels(width),
            height: Extent::Pixels(height),
        }
    }

    #[must_use]
    pub const fn percent(width: f64, height: f64) -> Self {
        Self {
            width: Extent::Percent(width),
            height: Extent::Percent(height),
        }
    }
}

impl Default for CardSize {
    fn default() -> Self {
        Self::pixels(720.0, 250.0)
    }
}

/// Lifecycle of the single overlay surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayPhase {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl OverlayPhase {
    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::Closed)
    }
}

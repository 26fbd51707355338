//! Reference-counted interaction gate.
//!
//! Every blocker holds a [`BusyToken`]; controls are disabled while at least
//! one token (or manual hold) is alive. The [`ControlSurface`] only hears about
//! the 0 → 1 and 1 → 0 edges.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Whatever renders the interactive controls.
pub trait ControlSurface: Send + Sync {
    fn set_controls_enabled(&self, enabled: bool);
}

#[derive(Debug, Default)]
struct Holds {
    tokens: usize,
    manual: usize,
}

impl Holds {
    fn total(&self) -> usize {
        self.tokens + self.manual
    }
}

struct GateInner {
    holds: Mutex<Holds>,
    controls: Arc<dyn ControlSurface>,
}

impl GateInner {
    fn update(&self, change: impl FnOnce(&mut Holds) -> bool) {
        let mut holds = self.holds.lock().unwrap_or_else(PoisonError::into_inner);
        let before = holds.total();
        if !change(&mut holds) {
            return;
        }
        let after = holds.total();
        match (before, after) {
            (0, 1..) => {
                tracing::debug!(holds = after, "Interface blocked");
                self.controls.set_controls_enabled(false);
            }
            (1.., 0) => {
                tracing::debug!("Interface unblocked");
                self.controls.set_controls_enabled(true);
            }
            _ => {}
        }
    }
}

#[derive(Clone)]
pub struct UiBlockGate {
    inner: Arc<GateInner>,
}

impl fmt::Debug for UiBlockGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let holds = self.inner.holds.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("UiBlockGate")
            .field("tokens", &holds.tokens)
            .field("manual", &holds.manual)
            .finish()
    }
}

impl UiBlockGate {
    pub fn new(controls: Arc<dyn ControlSurface>) -> Self {
        Self {
            inner: Arc::new(GateInner {
                holds: Mutex::new(Holds::default()),
                controls,
            }),
        }
    }

    /// Block the interface until the returned token is dropped.
    #[must_use = "the interface unblocks as soon as the token is dropped"]
    pub fn acquire(&self, reason: &'static str) -> BusyToken {
        tracing::trace!(reason, "Busy token acquired");
        self.inner.update(|holds| {
            holds.tokens += 1;
            true
        });
        BusyToken {
            inner: Arc::clone(&self.inner),
            reason,
        }
    }

    /// Flat block/unblock for callers without a token to hold.
    ///
    /// Each `true` must be paired with a `false`; an unpaired `true` leaves
    /// the interface blocked.
    pub fn set_blocked(&self, blocked: bool) {
        self.inner.update(|holds| {
            if blocked {
                holds.manual += 1;
                true
            } else if holds.manual == 0 {
                tracing::warn!("Unblock requested without a matching block");
                false
            } else {
                holds.manual -= 1;
                true
            }
        });
    }

    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.hold_count() > 0
    }

    #[must_use]
    pub fn hold_count(&self) -> usize {
        self.inner
            .holds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .total()
    }
}

/// One hold on a [`UiBlockGate`], released on drop.
pub struct BusyToken {
    inner: Arc<GateInner>,
    reason: &'static str,
}

impl BusyToken {
    #[must_use]
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

impl fmt::Debug for BusyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BusyToken").field(&self.reason).finish()
    }
}

impl Drop for BusyToken {
    fn drop(&mut self) {
        tracing::trace!(reason = self.reason, "Busy token released");
        self.inner.update(|holds| {
            holds.tokens = holds.tokens.saturating_sub(1);
            true
        });
    }
}

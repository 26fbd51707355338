//! UI state types for the annotation interface.
//!
//! Pure data types with no IO, no async, and no rendering dependency.
//! Used by the engine (state ownership) and by presentation adapters.

mod animation;
mod overlay;
mod transition;

pub use animation::AnimPhase;
pub use overlay::{CardSize, Extent, OverlayContent, OverlayPhase, OverlayRequest};
pub use transition::{TransitionEffect, TransitionKind};

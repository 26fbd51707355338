//! Core domain types for LabelUI.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

pub mod layout;
pub mod remote;
pub mod session;
pub mod ui;

pub use layout::{LayoutInput, LayoutParams, Viewport, ViewportLayout};
pub use remote::{GlobalConfiguration, ProjectSettings};
pub use session::{Credentials, Destination, SessionState};

//! Shared helpers for LabelUI.
//!
//! Small, stateless utilities used across the interface:
//!
//! - **`color`**: hex/rgb parsing, alpha blending and brightness for label swatches
//! - **`cookie`**: the page's cookie jar (tutorial opt-out and friends)
//! - **`duration`**: `mm:ss` / `hh:mm:ss` formatting
//! - **`shuffle`**: in-place Fisher–Yates

pub mod color;
pub mod cookie;
pub mod duration;
pub mod shuffle;

pub use color::{add_alpha, brightness, hex_to_rgb, rgb_channels};
pub use cookie::{Cookie, CookieJar, CookieStore};
pub use duration::{format_duration, format_millis};
pub use shuffle::{shuffle, shuffle_with};

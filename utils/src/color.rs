//! CSS color string helpers for label-class swatches.

use std::sync::LazyLock;

use regex::Regex;

static SHORTHAND_HEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#?([a-f\d])([a-f\d])([a-f\d])$").expect("shorthand hex pattern is valid")
});

static FULL_HEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#?([a-f\d]{2})([a-f\d]{2})([a-f\d]{2})$").expect("hex pattern is valid")
});

static RGB_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"rgba?\((\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*(,\s*\d+[\.\d+]*)*\)")
        .expect("rgb pattern is valid")
});

/// Convert `#RGB` / `#RRGGBB` (hash optional) to `rgb(r,g,b)`.
///
/// Strings that already start with `rgb` are returned as-is.
#[must_use]
pub fn hex_to_rgb(hex: &str) -> Option<String> {
    if hex.to_ascii_lowercase().starts_with("rgb") {
        return Some(hex.to_string());
    }

    let expanded = match SHORTHAND_HEX.captures(hex) {
        Some(caps) => {
            let mut full = String::with_capacity(6);
            for idx in 1..=3 {
                let digit = &caps[idx];
                full.push_str(digit);
                full.push_str(digit);
            }
            full
        }
        None => hex.to_string(),
    };

    let caps = FULL_HEX.captures(&expanded)?;
    let channel = |idx: usize| u8::from_str_radix(&caps[idx], 16).ok();
    Some(format!("rgb({},{},{})", channel(1)?, channel(2)?, channel(3)?))
}

/// Extract the red, green and blue channels from a hex or `rgb[a](...)` string.
#[must_use]
pub fn rgb_channels(color: &str) -> Option<[u8; 3]> {
    let rgb = hex_to_rgb(color)?;
    let caps = RGB_FUNCTION.captures(&rgb)?;
    Some([
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    ])
}

/// Apply an alpha channel to a color.
///
/// `alpha` may be a fraction (`0.5`) or a percentage (`50`). Returns `None`
/// for a non-positive alpha, the unchanged color for an opaque alpha, and
/// `None` when the color cannot be parsed.
#[must_use]
pub fn add_alpha(color: &str, alpha: f64) -> Option<String> {
    if alpha.is_nan() || alpha <= 0.0 {
        return None;
    }
    let alpha = if alpha > 1.0 { alpha / 100.0 } else { alpha };
    if alpha >= 1.0 {
        return Some(color.to_string());
    }

    let [r, g, b] = rgb_channels(color)?;
    Some(format!("rgba({r},{g},{b},{alpha})"))
}

/// Mean of the red, green and blue channels (0 to 255).
#[must_use]
pub fn brightness(color: &str) -> Option<f64> {
    let [r, g, b] = rgb_channels(color)?;
    Some((f64::from(r) + f64::from(g) + f64::from(b)) / 3.0)
}

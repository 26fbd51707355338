//! Gallery grid geometry.
//!
//! Tiles keep a fixed aspect ratio. The grid uses as many columns as fit at
//! the minimum tile width (capped by `max_columns`), then grows tiles until
//! either the row budget or the column budget is exhausted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Grid parameters delivered by the server configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutParams {
    pub min_tile_width: u32,
    pub max_columns: usize,
    pub tiles_per_batch: usize,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            min_tile_width: 100,
            max_columns: 6,
            tiles_per_batch: 12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutInput {
    pub gallery_width: f64,
    pub gallery_height: f64,
    pub tile_count: usize,
    pub min_tile_width: f64,
    pub max_columns: usize,
    /// Tile width divided by tile height.
    pub aspect_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportLayout {
    pub columns: usize,
    pub rows: usize,
    pub tile_width: f64,
    pub tile_height: f64,
    /// Lower bound applied to every tile's width.
    pub min_tile_width: f64,
}

impl ViewportLayout {
    /// Compute the tile grid, or `None` when there is nothing to lay out.
    ///
    /// A gallery narrower than one minimum tile still gets one column; the
    /// single tile then overflows the gallery at `min_tile_width`.
    #[must_use]
    pub fn compute(input: &LayoutInput) -> Option<Self> {
        let LayoutInput {
            gallery_width,
            gallery_height,
            tile_count,
            min_tile_width,
            max_columns,
            aspect_ratio,
        } = *input;

        if tile_count == 0 {
            return None;
        }
        if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
            return None;
        }
        if !(min_tile_width.is_finite() && min_tile_width > 0.0) {
            return None;
        }

        let fitting = (gallery_width / min_tile_width).floor().max(0.0) as usize;
        let columns = fitting.min(max_columns).max(1);
        let rows = tile_count.div_ceil(columns);

        let mut height = (min_tile_width / aspect_ratio).max(gallery_height / rows as f64);
        let mut width = min_tile_width.max(gallery_width / columns as f64);
        if height > width / aspect_ratio {
            height = width / aspect_ratio;
        } else {
            width = height * aspect_ratio;
        }

        Some(Self {
            columns,
            rows,
            tile_width: width,
            tile_height: height,
            min_tile_width,
        })
    }

    #[must_use]
    pub fn grid_width(&self) -> f64 {
        self.columns as f64 * self.tile_width
    }
}

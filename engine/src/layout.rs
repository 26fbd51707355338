//! Applies the gallery grid to the page on resize.

use std::fmt;
use std::sync::Arc;

use labelui_types::{LayoutInput, LayoutParams, Viewport, ViewportLayout};

use crate::collaborators::Gallery;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelId {
    AiWorkerMiniPanel,
}

impl PanelId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AiWorkerMiniPanel => "ai-worker-minipanel",
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The page the layout is written to.
pub trait PresentationAdapter: Send + Sync {
    /// Combined width of the tool container and viewport controls.
    fn side_panel_width(&self) -> f64;
    fn apply_tile_geometry(&self, layout: &ViewportLayout);
    fn set_gallery_width(&self, width: f64);
    fn set_legend_height(&self, height: f64);
    fn set_panel_visible(&self, panel: PanelId, visible: bool);
}

#[derive(Clone)]
pub struct LayoutEngine {
    adapter: Arc<dyn PresentationAdapter>,
    params: LayoutParams,
    chrome_height: f64,
}

impl LayoutEngine {
    pub fn new(adapter: Arc<dyn PresentationAdapter>, params: LayoutParams, chrome_height: f64) -> Self {
        Self {
            adapter,
            params,
            chrome_height,
        }
    }

    #[must_use]
    pub fn params(&self) -> LayoutParams {
        self.params
    }

    /// Recompute and apply the grid for `viewport`.
    ///
    /// Returns `None` without touching the page while no tile is present.
    pub fn recompute(&self, viewport: Viewport, gallery: &dyn Gallery) -> Option<ViewportLayout> {
        if gallery.tile_count() == 0 {
            tracing::trace!("Layout skipped: no tiles");
            return None;
        }
        let aspect_ratio = gallery.tile_aspect_ratio()?;

        let gallery_width = (viewport.width - self.adapter.side_panel_width()).max(0.0);
        let gallery_height = (viewport.height - self.chrome_height).max(0.0);
        let layout = ViewportLayout::compute(&LayoutInput {
            gallery_width,
            gallery_height,
            tile_count: self.params.tiles_per_batch,
            min_tile_width: f64::from(self.params.min_tile_width),
            max_columns: self.params.max_columns,
            aspect_ratio,
        })?;

        tracing::debug!(
            columns = layout.columns,
            rows = layout.rows,
            tile_width = layout.tile_width,
            tile_height = layout.tile_height,
            "Layout recomputed"
        );
        self.adapter.apply_tile_geometry(&layout);
        self.adapter.set_gallery_width(gallery_width);
        self.adapter.set_legend_height(gallery_height);
        gallery.render_all();
        Some(layout)
    }
}

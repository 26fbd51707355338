//! Documents served by the annotation backend.

use serde::{Deserialize, Serialize};

use crate::layout::LayoutParams;

/// Interface-wide settings loaded before any subsystem is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfiguration {
    #[serde(rename = "minImageWidth", default = "default_min_image_width")]
    pub min_image_width: u32,
    #[serde(rename = "numImageColumns_max", default = "default_max_columns")]
    pub max_image_columns: usize,
    #[serde(rename = "numImagesPerBatch", default = "default_images_per_batch")]
    pub images_per_batch: usize,
    /// Base URI of the AI controller; the worker panel only exists when set.
    #[serde(rename = "aiControllerURI", default)]
    pub ai_controller_uri: Option<String>,
}

fn default_min_image_width() -> u32 {
    LayoutParams::default().min_tile_width
}

fn default_max_columns() -> usize {
    LayoutParams::default().max_columns
}

fn default_images_per_batch() -> usize {
    LayoutParams::default().tiles_per_batch
}

impl GlobalConfiguration {
    #[must_use]
    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            min_tile_width: self.min_image_width,
            max_columns: self.max_image_columns,
            tiles_per_batch: self.images_per_batch,
        }
    }

    /// The configured AI controller, ignoring blank values.
    #[must_use]
    pub fn ai_controller(&self) -> Option<&str> {
        self.ai_controller_uri
            .as_deref()
            .map(str::trim)
            .filter(|uri| !uri.is_empty())
    }
}

impl Default for GlobalConfiguration {
    fn default() -> Self {
        Self {
            min_image_width: default_min_image_width(),
            max_image_columns: default_max_columns(),
            images_per_batch: default_images_per_batch(),
            ai_controller_uri: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSettings {
    #[serde(rename = "projectName", default)]
    pub name: String,
    #[serde(rename = "projectDescription", default)]
    pub description: Option<String>,
    #[serde(rename = "annotationType", default)]
    pub annotation_type: Option<String>,
    #[serde(rename = "predictionType", default)]
    pub prediction_type: Option<String>,
}

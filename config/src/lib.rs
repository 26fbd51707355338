//! Client configuration for LabelUI.
//!
//! Read from `~/.labelui/config.toml` (or `$LABELUI_CONFIG`). Every section is
//! optional; accessors fall back to the defaults the server-side templates use.
//!
//! ```toml
//! [server]
//! base_url = "http://localhost:8080"
//! username = "${LABELUI_USER}"
//!
//! [overlay]
//! slide_ms = 1000
//! reduced_motion = true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;
use thiserror::Error;

use labelui_types::Viewport;
use labelui_types::ui::CardSize;

pub const CONFIG_ENV_VAR: &str = "LABELUI_CONFIG";
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Default, Deserialize)]
pub struct ClientConfig {
    pub server: Option<ServerConfig>,
    pub endpoints: Option<EndpointsConfig>,
    pub layout: Option<LayoutConfig>,
    pub overlay: Option<OverlayConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    /// Account shown in the user menu; supports `${VAR}` expansion.
    pub username: Option<String>,
}

/// Paths on the annotation server, relative to `base_url`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EndpointsConfig {
    pub login_check: String,
    pub login: String,
    pub logout: String,
    pub configuration: String,
    pub project_settings: String,
    pub next_batch: String,
    /// Landing page used when the session cannot be recovered.
    pub entry: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            login_check: "/loginCheck".to_string(),
            login: "/login".to_string(),
            logout: "/logout".to_string(),
            configuration: "/getConfig".to_string(),
            project_settings: "/getProjectSettings".to_string(),
            next_batch: "/getLatestImages".to_string(),
            entry: "/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Vertical space taken by the navbar and footer.
    pub chrome_height: f64,
    /// Tool container plus viewport controls, beside the gallery.
    pub side_panel_width: f64,
    /// Viewport assumed by the headless client.
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            chrome_height: 56.0,
            side_panel_width: 280.0,
            viewport_width: 1280.0,
            viewport_height: 800.0,
        }
    }
}

impl LayoutConfig {
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    pub width: f64,
    pub height: f64,
    pub large_width_percent: f64,
    pub large_height_percent: f64,
    /// Dimmer fades and the card's entrance.
    pub fade_ms: u64,
    /// The card's exit.
    pub slide_ms: u64,
    /// Disable overlay transitions.
    pub reduced_motion: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            width: 720.0,
            height: 250.0,
            large_width_percent: 50.0,
            large_height_percent: 75.0,
            fade_ms: 400,
            slide_ms: 1000,
            reduced_motion: false,
        }
    }
}

impl OverlayConfig {
    #[must_use]
    pub fn default_size(&self) -> CardSize {
        CardSize::pixels(self.width, self.height)
    }

    #[must_use]
    pub fn large_size(&self) -> CardSize {
        CardSize::percent(self.large_width_percent, self.large_height_percent)
    }

    #[must_use]
    pub fn fade(&self) -> Duration {
        self.motion(self.fade_ms)
    }

    #[must_use]
    pub fn slide(&self) -> Duration {
        self.motion(self.slide_ms)
    }

    fn motion(&self, millis: u64) -> Duration {
        if self.reduced_motion {
            Duration::ZERO
        } else {
            Duration::from_millis(millis)
        }
    }
}

/// Replace `${VAR}` references with environment values (missing vars become empty).
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

impl ClientConfig {
    /// Load from the default location. A missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        self.server
            .as_ref()
            .and_then(|server| server.base_url.as_deref())
            .map(expand_env_vars)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    #[must_use]
    pub fn username(&self) -> Option<String> {
        self.server
            .as_ref()
            .and_then(|server| server.username.as_deref())
            .map(expand_env_vars)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    }

    #[must_use]
    pub fn endpoints(&self) -> EndpointsConfig {
        self.endpoints.clone().unwrap_or_default()
    }

    #[must_use]
    pub fn layout(&self) -> LayoutConfig {
        self.layout.unwrap_or_default()
    }

    #[must_use]
    pub fn overlay(&self) -> OverlayConfig {
        self.overlay.unwrap_or_default()
    }
}

/// `$LABELUI_CONFIG`, else `~/.labelui/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_ENV_VAR).filter(|path| !path.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".labelui").join("config.toml"))
}

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tabula::{Color, ContextConfig, RenderDefaults};

use crate::{BackendType, Error};

/// Configuration for a [`Canvas`](crate::Canvas).
///
/// Every field is optional in TOML:
///
/// ```toml
/// backend = "recording"
/// coord-width = 640
/// coord-height = 480
/// background = "#ffffff"
///
/// [defaults]
/// line-width = 2.0
/// fill-color = "rgb(255, 0, 0)"
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CanvasConfig {
    pub backend: BackendType,
    /// Width of the coordinate space
    pub coord_width: u32,
    /// Height of the coordinate space
    pub coord_height: u32,
    /// Display width, in pixels
    pub pixel_width: u32,
    /// Display height, in pixels
    pub pixel_height: u32,
    /// Shown beneath transparent content
    pub background: Color,
    pub defaults: RenderDefaults,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            backend: BackendType::default(),
            coord_width: 300,
            coord_height: 150,
            pixel_width: 300,
            pixel_height: 150,
            background: Color::TRANSPARENT,
            defaults: RenderDefaults::default(),
        }
    }
}

impl CanvasConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        Ok(toml::from_str(s)?)
    }

    /// Loads a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::debug!("loaded canvas config from {}", path.display());
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, Error> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn context_config(&self) -> ContextConfig {
        ContextConfig {
            coord_width: self.coord_width,
            coord_height: self.coord_height,
            defaults: self.defaults,
        }
    }
}

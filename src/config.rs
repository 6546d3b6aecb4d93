//! Layout options and the optional config file.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file name within the braid config directory.
const CONFIG_FILE: &str = "config.yaml";

/// Switches consumed by the layout passes and the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Interleave sibling branches instead of walking them depth-first
    pub mingle: bool,

    /// Process heads in reverse order
    pub flip: bool,

    /// Mirror the graph horizontally
    pub hflip: bool,

    /// Print the graph bottom-up (buffers all output)
    pub vflip: bool,

    /// Colorize lanes
    pub color: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            mingle: false,
            flip: false,
            hflip: false,
            vflip: false,
            color: true,
        }
    }
}

impl LayoutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mingle(mut self, mingle: bool) -> Self {
        self.mingle = mingle;
        self
    }

    pub fn flip(mut self, flip: bool) -> Self {
        self.flip = flip;
        self
    }

    pub fn hflip(mut self, hflip: bool) -> Self {
        self.hflip = hflip;
        self
    }

    pub fn vflip(mut self, vflip: bool) -> Self {
        self.vflip = vflip;
        self
    }

    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

/// Contents of `config.yaml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mingle: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flip: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hflip: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vflip: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

impl ConfigFile {
    /// Default location: `<config_dir>/braid/config.yaml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("braid").join(CONFIG_FILE))
    }

    /// Load from `path`. A missing file yields the empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {}", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Options with this file's values laid over `base`.
    pub fn apply(&self, base: LayoutOptions) -> LayoutOptions {
        LayoutOptions {
            mingle: self.mingle.unwrap_or(base.mingle),
            flip: self.flip.unwrap_or(base.flip),
            hflip: self.hflip.unwrap_or(base.hflip),
            vflip: self.vflip.unwrap_or(base.vflip),
            color: self.color.unwrap_or(base.color),
        }
    }
}

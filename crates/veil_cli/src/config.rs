//! Veil configuration file handling
//!
//! `veil.toml` has two sections:
//! - `[splash]` - splash options (background, animation, auto-hide)
//! - `[device]` - the simulated device the splash runs against

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use veil_core::{Color, EdgeInsets};
use veil_splash::{ChromeVisibility, SplashOptions};

/// Default config file name looked up in the working directory
pub const CONFIG_FILE: &str = "veil.toml";

/// Contents of veil.toml
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VeilConfig {
    #[serde(default)]
    pub splash: SplashOptions,
    #[serde(default)]
    pub device: DeviceConfig,
}

/// Simulated device configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Logical screen width
    pub width: f32,
    /// Logical screen height
    pub height: f32,
    /// Safe-area insets
    pub insets: EdgeInsets,
    /// Navigation bar color before the splash mounts
    pub navigation_color: Color,
    /// Navigation bar visibility before the splash mounts
    pub navigation_visibility: String,
    /// Make every chrome call fail
    pub fail_chrome: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            width: 390.0,
            height: 844.0,
            insets: EdgeInsets::new(47.0, 0.0, 34.0, 0.0),
            navigation_color: Color::BLACK,
            navigation_visibility: ChromeVisibility::Visible.to_string(),
            fail_chrome: false,
        }
    }
}

impl VeilConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Load the given file, or `veil.toml` in the current directory if it
    /// exists, or fall back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(CONFIG_FILE).exists() => Self::load(Path::new(CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: VeilConfig = toml::from_str(content)?;
        if config.device.width <= 0.0 || config.device.height <= 0.0 {
            anyhow::bail!(
                "device size must be positive, got {}x{}",
                config.device.width,
                config.device.height
            );
        }
        Ok(config)
    }

    /// Serialize back to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

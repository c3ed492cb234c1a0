//! Splash configuration
//!
//! [`SplashOptions`] holds everything that can come from a config file;
//! [`SplashConfig`] adds the renderable content and the completion callback,
//! which only exist in code.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use veil_core::{Color, EdgeInsets};

/// Callback invoked once when the splash has been dismissed
pub type EndCallback = Box<dyn FnOnce() + Send + 'static>;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse splash config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown animation type {0:?} (expected fade, scale, slide, bounce, or none)")]
    UnknownAnimation(String),
}

/// Exit animation played when the splash is hidden
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationType {
    Fade,
    Scale,
    Slide,
    Bounce,
    /// Hide immediately
    #[default]
    None,
}

impl AnimationType {
    pub const ALL: [AnimationType; 5] = [
        AnimationType::Fade,
        AnimationType::Scale,
        AnimationType::Slide,
        AnimationType::Bounce,
        AnimationType::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationType::Fade => "fade",
            AnimationType::Scale => "scale",
            AnimationType::Slide => "slide",
            AnimationType::Bounce => "bounce",
            AnimationType::None => "none",
        }
    }
}

impl fmt::Display for AnimationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimationType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnimationType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownAnimation(s.to_string()))
    }
}

/// How long the splash stays up before hiding itself
///
/// Serialized as an optional millisecond count; absent or null means manual.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum SplashDuration {
    /// No timer; only an explicit hide dismisses the splash
    #[default]
    Manual,
    Millis(u64),
}

impl SplashDuration {
    pub fn is_manual(&self) -> bool {
        matches!(self, SplashDuration::Manual)
    }
}

impl From<Option<u64>> for SplashDuration {
    fn from(ms: Option<u64>) -> Self {
        ms.map_or(SplashDuration::Manual, SplashDuration::Millis)
    }
}

impl From<SplashDuration> for Option<u64> {
    fn from(duration: SplashDuration) -> Self {
        match duration {
            SplashDuration::Manual => None,
            SplashDuration::Millis(ms) => Some(ms),
        }
    }
}

/// Overrides applied to the overlay container
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerStyle {
    /// Replaces the configured background color for the overlay surface
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    /// Extra padding around the splash content, inside the safe area
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<EdgeInsets>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
}

/// File-loadable splash options
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplashOptions {
    pub background_color: Color,
    #[serde(
        rename = "splash_duration_ms",
        skip_serializing_if = "SplashDuration::is_manual"
    )]
    pub splash_duration: SplashDuration,
    pub animation_type: AnimationType,
    pub auto_hide: bool,
    pub container_style: ContainerStyle,
}

impl Default for SplashOptions {
    fn default() -> Self {
        Self {
            background_color: Color::WHITE,
            splash_duration: SplashDuration::Manual,
            animation_type: AnimationType::None,
            auto_hide: false,
            container_style: ContainerStyle::default(),
        }
    }
}

impl SplashOptions {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Delay of the auto-hide timer, if one should be armed
    pub fn auto_hide_delay(&self) -> Option<u64> {
        match (self.auto_hide, self.splash_duration) {
            (true, SplashDuration::Millis(ms)) => Some(ms),
            _ => None,
        }
    }
}

/// Full splash configuration: options plus content and callback
pub struct SplashConfig<S, C> {
    pub splash: S,
    pub children: C,
    pub options: SplashOptions,
    pub(crate) on_animation_end: Option<EndCallback>,
}

impl<S, C> SplashConfig<S, C> {
    /// Configuration with default options for the given content
    pub fn new(splash: S, children: C) -> Self {
        Self {
            splash,
            children,
            options: SplashOptions::default(),
            on_animation_end: None,
        }
    }

    pub fn with_options(mut self, options: SplashOptions) -> Self {
        self.options = options;
        self
    }

    pub fn background_color(mut self, color: Color) -> Self {
        self.options.background_color = color;
        self
    }

    pub fn splash_duration(mut self, duration: SplashDuration) -> Self {
        self.options.splash_duration = duration;
        self
    }

    pub fn animation(mut self, animation: AnimationType) -> Self {
        self.options.animation_type = animation;
        self
    }

    pub fn auto_hide(mut self, auto_hide: bool) -> Self {
        self.options.auto_hide = auto_hide;
        self
    }

    pub fn container_style(mut self, style: ContainerStyle) -> Self {
        self.options.container_style = style;
        self
    }

    /// Callback fired once after the splash is dismissed
    pub fn on_animation_end<F>(mut self, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_animation_end = Some(Box::new(callback));
        self
    }
}

//! System chrome control
//!
//! The splash takes over the navigation bar while it is visible: it records
//! the bar's original color and visibility, hides the bar and paints it with
//! the splash background, and puts things back once the app is revealed.
//!
//! Every chrome call is best-effort. Failures are logged and leave the
//! corresponding recorded field unset, which in turn skips restoring it.

use std::fmt;

use thiserror::Error;
use veil_core::{Color, ColorParseError, NativeBridge, NativeBridgeError};

/// Chrome control errors
#[derive(Error, Debug)]
pub enum ChromeError {
    #[error(transparent)]
    Bridge(#[from] NativeBridgeError),

    #[error("platform reported an invalid color: {0}")]
    InvalidColor(#[from] ColorParseError),

    #[error("chrome control unavailable: {0}")]
    Unavailable(String),
}

/// Navigation bar visibility as reported by the platform
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChromeVisibility {
    Visible,
    Hidden,
    /// Any other value the platform reports
    Other(String),
}

impl ChromeVisibility {
    pub fn parse(value: &str) -> Self {
        match value {
            "visible" => ChromeVisibility::Visible,
            "hidden" => ChromeVisibility::Hidden,
            other => ChromeVisibility::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ChromeVisibility::Visible => "visible",
            ChromeVisibility::Hidden => "hidden",
            ChromeVisibility::Other(value) => value,
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, ChromeVisibility::Hidden)
    }
}

impl fmt::Display for ChromeVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform chrome (navigation bar and status bar) control surface
pub trait ChromeControl: Send + Sync {
    fn background_color(&self) -> Result<Color, ChromeError>;

    fn visibility(&self) -> Result<ChromeVisibility, ChromeError>;

    fn set_background_color(&self, color: Color) -> Result<(), ChromeError>;

    fn set_visibility(&self, visibility: ChromeVisibility) -> Result<(), ChromeError>;

    /// Let content draw under a transparent status bar
    fn set_status_bar_translucent(&self, _translucent: bool) -> Result<(), ChromeError> {
        Ok(())
    }

    fn set_status_bar_background_color(&self, _color: Color) -> Result<(), ChromeError> {
        Ok(())
    }
}

/// Chrome appearance recorded before the splash took over
///
/// Each field is `None` when the platform query failed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OriginalChromeState {
    pub background_color: Option<Color>,
    pub visibility: Option<ChromeVisibility>,
}

impl OriginalChromeState {
    /// Query the current chrome appearance
    pub fn capture(chrome: &dyn ChromeControl) -> Self {
        let background_color = match chrome.background_color() {
            Ok(color) => Some(color),
            Err(err) => {
                tracing::error!("Error getting navigation bar color: {}", err);
                None
            }
        };

        let visibility = match chrome.visibility() {
            Ok(visibility) => Some(visibility),
            Err(err) => {
                tracing::error!("Error getting navigation bar visibility: {}", err);
                None
            }
        };

        Self {
            background_color,
            visibility,
        }
    }

    /// Apply the splash appearance
    ///
    /// Hides the bar unless it was already hidden, and paints it with the
    /// splash background. Fields that could not be recorded are left alone,
    /// since they could not be restored either.
    pub fn apply_splash(&self, chrome: &dyn ChromeControl, background: Color) {
        if let Some(visibility) = &self.visibility {
            if !visibility.is_hidden() {
                if let Err(err) = chrome.set_visibility(ChromeVisibility::Hidden) {
                    tracing::error!("Error hiding navigation bar: {}", err);
                }
            }
        }

        if self.background_color.is_some() {
            if let Err(err) = chrome.set_background_color(background) {
                tracing::error!("Error setting navigation bar color: {}", err);
            }
        }
    }

    /// Restore the recorded appearance
    ///
    /// The bar is made visible again unless it was recorded as hidden; an
    /// unrecorded visibility is left untouched.
    pub fn restore(&self, chrome: &dyn ChromeControl) {
        if let Some(color) = self.background_color {
            if let Err(err) = chrome.set_background_color(color) {
                tracing::error!("Error restoring navigation bar color: {}", err);
            }
        }

        if let Some(visibility) = &self.visibility {
            if !visibility.is_hidden() {
                if let Err(err) = chrome.set_visibility(ChromeVisibility::Visible) {
                    tracing::error!("Error restoring navigation bar visibility: {}", err);
                }
            }
        }
    }
}

/// [`ChromeControl`] backed by the native bridge
///
/// Platforms register the following functions (colors travel as
/// `#rrggbb[aa]` strings):
///
/// | Namespace | Function | Args | Returns |
/// |---|---|---|---|
/// | `navigation_bar` | `get_background_color` | () | String |
/// | `navigation_bar` | `get_visibility` | () | String |
/// | `navigation_bar` | `set_background_color` | String | Void |
/// | `navigation_bar` | `set_visibility` | String | Void |
/// | `status_bar` | `set_translucent` | Bool | Void |
/// | `status_bar` | `set_background_color` | String | Void |
#[derive(Clone)]
pub struct NativeChrome {
    bridge: NativeBridge,
}

impl NativeChrome {
    pub const NAVIGATION_BAR: &'static str = "navigation_bar";
    pub const STATUS_BAR: &'static str = "status_bar";

    pub fn new(bridge: NativeBridge) -> Self {
        Self { bridge }
    }

    pub fn bridge(&self) -> &NativeBridge {
        &self.bridge
    }
}

impl ChromeControl for NativeChrome {
    fn background_color(&self) -> Result<Color, ChromeError> {
        let raw: String = self
            .bridge
            .call(Self::NAVIGATION_BAR, "get_background_color", ())?;
        Ok(raw.parse()?)
    }

    fn visibility(&self) -> Result<ChromeVisibility, ChromeError> {
        let raw: String = self
            .bridge
            .call(Self::NAVIGATION_BAR, "get_visibility", ())?;
        Ok(ChromeVisibility::parse(&raw))
    }

    fn set_background_color(&self, color: Color) -> Result<(), ChromeError> {
        self.bridge.call::<(), _>(
            Self::NAVIGATION_BAR,
            "set_background_color",
            (color.to_hex_string(),),
        )?;
        Ok(())
    }

    fn set_visibility(&self, visibility: ChromeVisibility) -> Result<(), ChromeError> {
        self.bridge
            .call::<(), _>(Self::NAVIGATION_BAR, "set_visibility", (visibility.as_str(),))?;
        Ok(())
    }

    fn set_status_bar_translucent(&self, translucent: bool) -> Result<(), ChromeError> {
        self.bridge
            .call::<(), _>(Self::STATUS_BAR, "set_translucent", (translucent,))?;
        Ok(())
    }

    fn set_status_bar_background_color(&self, color: Color) -> Result<(), ChromeError> {
        self.bridge.call::<(), _>(
            Self::STATUS_BAR,
            "set_background_color",
            (color.to_hex_string(),),
        )?;
        Ok(())
    }
}

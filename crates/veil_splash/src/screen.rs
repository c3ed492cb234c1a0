//! Screen metrics

use veil_core::{EdgeInsets, Size};

/// Source of the window size and safe-area insets
pub trait ScreenMetrics: Send + Sync {
    /// Logical size of the window
    fn screen_size(&self) -> Size;

    /// Safe-area insets (notch, status bar, home indicator)
    fn safe_area_insets(&self) -> EdgeInsets {
        EdgeInsets::ZERO
    }
}

/// Screen with fixed metrics
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedScreen {
    pub size: Size,
    pub insets: EdgeInsets,
}

impl FixedScreen {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Size::new(width, height),
            insets: EdgeInsets::ZERO,
        }
    }

    pub fn with_insets(mut self, insets: EdgeInsets) -> Self {
        self.insets = insets;
        self
    }
}

impl ScreenMetrics for FixedScreen {
    fn screen_size(&self) -> Size {
        self.size
    }

    fn safe_area_insets(&self) -> EdgeInsets {
        self.insets
    }
}

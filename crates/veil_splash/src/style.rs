//! Overlay style computation
//!
//! Pure functions from screen metrics and configuration to the rectangles and
//! paint values the host renders.

use veil_core::{Color, EdgeInsets, Rect, Size};

use crate::config::ContainerStyle;

/// Stacking order of the overlay when the container does not override it
pub const DEFAULT_Z_INDEX: i32 = 10;

/// Resolved overlay style
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayStyle {
    /// Full-bleed surface covering the whole screen
    pub frame: Rect,
    /// Area the splash content is laid out in
    pub content_frame: Rect,
    pub background: Color,
    pub z_index: i32,
}

/// Compute the overlay style
///
/// The surface always covers the whole screen, status bar and navigation bar
/// included. Content is kept inside the safe area and then shrunk by the
/// container padding.
pub fn overlay_style(
    screen: Size,
    insets: EdgeInsets,
    background: Color,
    container: &ContainerStyle,
) -> OverlayStyle {
    let frame = screen.to_rect();
    let padding = container.padding.unwrap_or(EdgeInsets::ZERO);

    OverlayStyle {
        frame,
        content_frame: frame.inset(&insets.combine(&padding)),
        background: container.background.unwrap_or(background),
        z_index: container.z_index.unwrap_or(DEFAULT_Z_INDEX),
    }
}

/// Snapshot of the four animated channels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationProgress {
    pub opacity: f32,
    pub scale: f32,
    pub translate_y: f32,
    pub background_opacity: f32,
}

impl AnimationProgress {
    /// Fully visible splash, before any exit animation
    pub const REST: AnimationProgress = AnimationProgress {
        opacity: 1.0,
        scale: 1.0,
        translate_y: 0.0,
        background_opacity: 1.0,
    };
}

impl Default for AnimationProgress {
    fn default() -> Self {
        Self::REST
    }
}

/// Transform applied to the splash content
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContentTransform {
    pub opacity: f32,
    pub scale: f32,
    pub translate_y: f32,
}

impl ContentTransform {
    pub fn from_progress(progress: &AnimationProgress) -> Self {
        Self {
            opacity: progress.opacity.clamp(0.0, 1.0),
            scale: progress.scale.max(0.0),
            translate_y: progress.translate_y,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.opacity == 1.0 && self.scale == 1.0 && self.translate_y == 0.0
    }
}

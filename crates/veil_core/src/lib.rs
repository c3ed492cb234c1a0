//! Veil Core
//!
//! Foundational primitives shared by the Veil splash crates:
//!
//! - **Color**: RGBA color with hex string parsing and serde support
//! - **Geometry**: points, sizes, rectangles, and safe-area edge insets
//! - **Native Bridge**: namespace/name dispatch to platform-native functions
//!   (navigation bar, status bar) with Rust-side handlers for testing
//!
//! # Example
//!
//! ```rust
//! use veil_core::{Color, EdgeInsets, Rect};
//!
//! let background: Color = "#1a2b3c".parse().unwrap();
//! assert_eq!(background.to_hex_string(), "#1a2b3c");
//!
//! let screen = Rect::new(0.0, 0.0, 390.0, 844.0);
//! let safe = screen.inset(&EdgeInsets::new(47.0, 0.0, 34.0, 0.0));
//! assert_eq!(safe.height(), 763.0);
//! ```

pub mod color;
pub mod geometry;
pub mod native_bridge;

pub use color::{Color, ColorParseError};
pub use geometry::{EdgeInsets, Point, Rect, Size};
pub use native_bridge::{
    FromNativeValue, IntoNativeArgs, NativeBridge, NativeBridgeError, NativeHandler,
    NativeResult, NativeValue, PlatformAdapter,
};

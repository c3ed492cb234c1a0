//! Veil Splash
//!
//! A full-screen splash overlay that shows a provided element, optionally
//! animates it away, and then reveals the application underneath for good.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use veil_animation::AnimationScheduler;
//! use veil_core::NativeBridge;
//! use veil_splash::{
//!     AnimationType, FixedScreen, NativeChrome, SplashConfig, SplashController, SplashHost,
//!     SplashPhase,
//! };
//!
//! let scheduler = AnimationScheduler::new();
//! let host = SplashHost::new(
//!     Arc::new(scheduler.handle()),
//!     Arc::new(NativeChrome::new(NativeBridge::new())),
//!     Arc::new(FixedScreen::new(390.0, 844.0)),
//! );
//!
//! let config = SplashConfig::new("logo", "app").animation(AnimationType::Fade);
//! let (controller, handle) = SplashController::mount(config, host);
//!
//! handle.hide();
//! for _ in 0..40 {
//!     scheduler.tick_by(16.0);
//!     controller.update();
//! }
//! assert_eq!(controller.phase(), SplashPhase::AppReady);
//! ```

pub mod chrome;
pub mod config;
pub mod controller;
pub mod exit;
pub mod screen;
pub mod style;

pub use chrome::{ChromeControl, ChromeError, ChromeVisibility, NativeChrome, OriginalChromeState};
pub use config::{
    AnimationType, ConfigError, ContainerStyle, EndCallback, SplashConfig, SplashDuration,
    SplashOptions,
};
pub use controller::{
    HideCallback, HideHandle, SplashController, SplashFrame, SplashHost, SplashPhase, SplashView,
};
pub use exit::{Channel, ExitPlan, ExitStep, ExitTrack};
pub use screen::{FixedScreen, ScreenMetrics};
pub use style::{overlay_style, AnimationProgress, ContentTransform, OverlayStyle, DEFAULT_Z_INDEX};

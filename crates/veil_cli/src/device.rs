//! Simulated device
//!
//! Registers navigation bar and status bar handlers on a [`NativeBridge`] so
//! the splash can run against the real [`NativeChrome`] adapter without a
//! phone attached.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;
use veil_core::{NativeBridge, NativeBridgeError, NativeValue, Size};
use veil_splash::{FixedScreen, NativeChrome};

use crate::config::DeviceConfig;

/// Current appearance of the simulated system bars
#[derive(Clone, Debug, PartialEq)]
pub struct BarState {
    pub navigation_color: String,
    pub navigation_visibility: String,
    pub status_bar_translucent: bool,
    pub status_bar_color: String,
}

pub struct SimulatedDevice {
    bridge: NativeBridge,
    screen: FixedScreen,
    bars: Arc<Mutex<BarState>>,
}

impl SimulatedDevice {
    pub fn new(config: &DeviceConfig) -> Self {
        let bridge = NativeBridge::new();
        let bars = Arc::new(Mutex::new(BarState {
            navigation_color: config.navigation_color.to_hex_string(),
            navigation_visibility: config.navigation_visibility.clone(),
            status_bar_translucent: false,
            status_bar_color: config.navigation_color.to_hex_string(),
        }));

        let device = Self {
            bridge,
            screen: FixedScreen {
                size: Size::new(config.width, config.height),
                insets: config.insets,
            },
            bars,
        };
        device.register_handlers(config.fail_chrome);
        device
    }

    fn register_handlers(&self, fail: bool) {
        let nav = NativeChrome::NAVIGATION_BAR;
        let status = NativeChrome::STATUS_BAR;

        self.register(nav, "get_background_color", fail, |bars, _| {
            Ok(NativeValue::String(bars.navigation_color.clone()))
        });
        self.register(nav, "get_visibility", fail, |bars, _| {
            Ok(NativeValue::String(bars.navigation_visibility.clone()))
        });
        self.register(nav, "set_background_color", fail, |bars, args| {
            let color = string_arg(&args)?;
            info!("navigation bar color: {} -> {}", bars.navigation_color, color);
            bars.navigation_color = color;
            Ok(NativeValue::Void)
        });
        self.register(nav, "set_visibility", fail, |bars, args| {
            let visibility = string_arg(&args)?;
            info!(
                "navigation bar visibility: {} -> {}",
                bars.navigation_visibility, visibility
            );
            bars.navigation_visibility = visibility;
            Ok(NativeValue::Void)
        });
        self.register(status, "set_translucent", fail, |bars, args| {
            let translucent = bool_arg(&args)?;
            info!("status bar translucent: {}", translucent);
            bars.status_bar_translucent = translucent;
            Ok(NativeValue::Void)
        });
        self.register(status, "set_background_color", fail, |bars, args| {
            let color = string_arg(&args)?;
            info!("status bar color: {} -> {}", bars.status_bar_color, color);
            bars.status_bar_color = color;
            Ok(NativeValue::Void)
        });
    }

    fn register<F>(&self, namespace: &str, name: &'static str, fail: bool, handler: F)
    where
        F: Fn(&mut BarState, Vec<NativeValue>) -> Result<NativeValue, NativeBridgeError>
            + Send
            + Sync
            + 'static,
    {
        let bars = self.bars.clone();
        let namespace_owned = namespace.to_string();
        self.bridge.register(namespace, name, move |args| {
            if fail {
                return Err(NativeBridgeError::Platform(format!(
                    "simulated failure in {}.{}",
                    namespace_owned, name
                )));
            }
            let mut bars = bars.lock().unwrap_or_else(PoisonError::into_inner);
            handler(&mut bars, args)
        });
    }

    pub fn bridge(&self) -> NativeBridge {
        self.bridge.clone()
    }

    pub fn screen(&self) -> FixedScreen {
        self.screen
    }

    pub fn bars(&self) -> BarState {
        self.bars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn string_arg(args: &[NativeValue]) -> Result<String, NativeBridgeError> {
    args.first()
        .and_then(NativeValue::as_str)
        .map(str::to_string)
        .ok_or_else(|| mismatch("String", args))
}

fn bool_arg(args: &[NativeValue]) -> Result<bool, NativeBridgeError> {
    args.first()
        .and_then(NativeValue::as_bool)
        .ok_or_else(|| mismatch("Bool", args))
}

fn mismatch(expected: &'static str, args: &[NativeValue]) -> NativeBridgeError {
    NativeBridgeError::TypeMismatch {
        expected,
        actual: args.first().map_or("Void", NativeValue::type_name),
    }
}

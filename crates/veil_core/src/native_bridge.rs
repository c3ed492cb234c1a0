//! Native Bridge for Rust ↔ Platform calls
//!
//! Lets Rust code reach platform-native functions (navigation bar, status bar)
//! through namespace/name pairs with typed argument and return conversion.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │ bridge.call("navigation_bar", "get_visibility")  │
//! └────────────────────────┬─────────────────────────┘
//!                          │
//!                          ▼
//! ┌──────────────────────────────────────────────────┐
//! │                  NativeBridge                    │
//! │  1. Rust handlers (simulation/testing/fallback)  │
//! │  2. Platform adapter (JNI / Swift FFI)           │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use veil_core::native_bridge::{NativeBridge, NativeValue};
//!
//! let bridge = NativeBridge::new();
//! bridge.register("navigation_bar", "get_visibility", |_args| {
//!     Ok(NativeValue::String("visible".to_string()))
//! });
//!
//! let visibility: String = bridge.call("navigation_bar", "get_visibility", ()).unwrap();
//! assert_eq!(visibility, "visible");
//! ```

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;

/// Result type for native bridge operations
pub type NativeResult<T> = Result<T, NativeBridgeError>;

/// Handler function type for native calls
pub type NativeHandler = Arc<dyn Fn(Vec<NativeValue>) -> NativeResult<NativeValue> + Send + Sync>;

/// Error type for native bridge operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NativeBridgeError {
    /// Function not registered with any handler or adapter
    #[error("native function '{namespace}.{name}' not registered")]
    NotRegistered { namespace: String, name: String },

    /// Type mismatch when extracting a return value
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Platform-specific failure (JNI exception, missing API level, ...)
    #[error("platform error: {0}")]
    Platform(String),
}

/// Value type for cross-FFI transport
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    /// No value (void return)
    Void,
    Bool(bool),
    /// UTF-8 string (colors travel as `#rrggbb` strings)
    String(String),
}

impl NativeValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            NativeValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NativeValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// Get type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            NativeValue::Void => "Void",
            NativeValue::Bool(_) => "Bool",
            NativeValue::String(_) => "String",
        }
    }
}

// ============================================================================
// Conversion Traits
// ============================================================================

/// Trait for converting Rust types to native call arguments
pub trait IntoNativeArgs {
    fn into_native_args(self) -> Vec<NativeValue>;
}

impl IntoNativeArgs for () {
    fn into_native_args(self) -> Vec<NativeValue> {
        vec![]
    }
}

impl IntoNativeArgs for (bool,) {
    fn into_native_args(self) -> Vec<NativeValue> {
        vec![NativeValue::Bool(self.0)]
    }
}

impl IntoNativeArgs for (String,) {
    fn into_native_args(self) -> Vec<NativeValue> {
        vec![NativeValue::String(self.0)]
    }
}

impl IntoNativeArgs for (&str,) {
    fn into_native_args(self) -> Vec<NativeValue> {
        vec![NativeValue::String(self.0.to_string())]
    }
}

/// Trait for extracting return values from a [`NativeValue`]
pub trait FromNativeValue: Sized {
    fn from_native_value(value: NativeValue) -> NativeResult<Self>;
}

impl FromNativeValue for () {
    fn from_native_value(_value: NativeValue) -> NativeResult<Self> {
        // Any value is accepted for a void return
        Ok(())
    }
}

impl FromNativeValue for bool {
    fn from_native_value(value: NativeValue) -> NativeResult<Self> {
        value.as_bool().ok_or(NativeBridgeError::TypeMismatch {
            expected: "Bool",
            actual: value.type_name(),
        })
    }
}

impl FromNativeValue for String {
    fn from_native_value(value: NativeValue) -> NativeResult<Self> {
        match value {
            NativeValue::String(v) => Ok(v),
            other => Err(NativeBridgeError::TypeMismatch {
                expected: "String",
                actual: other.type_name(),
            }),
        }
    }
}

// ============================================================================
// Platform Adapter Trait
// ============================================================================

/// Trait for platform-specific native call adapters (JNI, Swift FFI)
pub trait PlatformAdapter: Send + Sync {
    /// Call a native function by namespace and name
    fn call(&self, namespace: &str, name: &str, args: Vec<NativeValue>)
        -> NativeResult<NativeValue>;
}

// ============================================================================
// Native Bridge
// ============================================================================

type HandlerTable = HashMap<String, HashMap<String, NativeHandler>>;

struct BridgeInner {
    /// Rust-registered handlers: namespace -> (name -> handler)
    handlers: RwLock<HandlerTable>,
    platform_adapter: RwLock<Option<Arc<dyn PlatformAdapter>>>,
}

/// Dispatches native calls to Rust handlers or a platform adapter
///
/// Cloning is cheap; clones share the same handler table and adapter.
#[derive(Clone)]
pub struct NativeBridge {
    inner: Arc<BridgeInner>,
}

impl NativeBridge {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BridgeInner {
                handlers: RwLock::new(HashMap::new()),
                platform_adapter: RwLock::new(None),
            }),
        }
    }

    /// Set the platform adapter
    ///
    /// Called during platform initialization to wire up JNI/Swift FFI.
    pub fn set_platform_adapter(&self, adapter: Arc<dyn PlatformAdapter>) {
        *self
            .inner
            .platform_adapter
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(adapter);
    }

    /// Register a Rust-side handler
    ///
    /// Rust handlers are checked before the platform adapter.
    pub fn register<F>(&self, namespace: &str, name: &str, handler: F)
    where
        F: Fn(Vec<NativeValue>) -> NativeResult<NativeValue> + Send + Sync + 'static,
    {
        let mut handlers = self
            .inner
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        handlers
            .entry(namespace.to_string())
            .or_default()
            .insert(name.to_string(), Arc::new(handler));
    }

    /// Call a native function
    ///
    /// Resolution order:
    /// 1. Rust-registered handlers
    /// 2. Platform adapter
    pub fn call<R, A>(&self, namespace: &str, name: &str, args: A) -> NativeResult<R>
    where
        R: FromNativeValue,
        A: IntoNativeArgs,
    {
        let native_args = args.into_native_args();

        // Clone the handler out so it runs without the table lock held
        let handler = self
            .inner
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(namespace)
            .and_then(|ns| ns.get(name))
            .cloned();

        if let Some(handler) = handler {
            return R::from_native_value(handler(native_args)?);
        }

        let adapter = self
            .inner
            .platform_adapter
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        match adapter {
            Some(adapter) => R::from_native_value(adapter.call(namespace, name, native_args)?),
            None => {
                tracing::debug!("native call {}.{} has no handler", namespace, name);
                Err(NativeBridgeError::NotRegistered {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                })
            }
        }
    }

    /// Check if a handler is registered (Rust or platform)
    pub fn has_handler(&self, namespace: &str, name: &str) -> bool {
        let registered = self
            .inner
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(namespace)
            .is_some_and(|ns| ns.contains_key(name));

        // Platform adapter existence (can't check specific functions)
        registered
            || self
                .inner
                .platform_adapter
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .is_some()
    }
}

impl Default for NativeBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct EchoAdapter {
        calls: Mutex<Vec<String>>,
    }

    impl PlatformAdapter for EchoAdapter {
        fn call(
            &self,
            namespace: &str,
            name: &str,
            args: Vec<NativeValue>,
        ) -> NativeResult<NativeValue> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}.{}", namespace, name));
            Ok(args.into_iter().next().unwrap_or(NativeValue::Void))
        }
    }

    #[test]
    fn test_native_value_accessors() {
        assert_eq!(NativeValue::Bool(true).as_bool(), Some(true));
        assert_eq!(
            NativeValue::String("hidden".to_string()).as_str(),
            Some("hidden")
        );
        assert_eq!(NativeValue::Void.as_bool(), None);
        assert_eq!(NativeValue::Bool(false).as_str(), None);
    }

    #[test]
    fn test_from_native_value_mismatch() {
        let err = String::from_native_value(NativeValue::Bool(true)).unwrap_err();
        assert_eq!(
            err,
            NativeBridgeError::TypeMismatch {
                expected: "String",
                actual: "Bool",
            }
        );
        assert!(<()>::from_native_value(NativeValue::Bool(true)).is_ok());
    }

    #[test]
    fn test_rust_handler_takes_precedence() {
        let bridge = NativeBridge::new();
        let adapter = Arc::new(EchoAdapter {
            calls: Mutex::new(Vec::new()),
        });
        bridge.set_platform_adapter(adapter.clone());
        bridge.register("navigation_bar", "get_visibility", |_| {
            Ok(NativeValue::String("hidden".to_string()))
        });

        let visibility: String = bridge
            .call("navigation_bar", "get_visibility", ())
            .unwrap();
        assert_eq!(visibility, "hidden");
        assert!(adapter.calls.lock().unwrap().is_empty());

        let echoed: String = bridge
            .call("navigation_bar", "set_background_color", ("#000000",))
            .unwrap();
        assert_eq!(echoed, "#000000");
        assert_eq!(
            adapter.calls.lock().unwrap().as_slice(),
            ["navigation_bar.set_background_color"]
        );
    }

    #[test]
    fn test_unregistered_call_fails() {
        let bridge = NativeBridge::new();
        let result: NativeResult<()> = bridge.call("status_bar", "set_translucent", (true,));

        assert!(matches!(
            result,
            Err(NativeBridgeError::NotRegistered { .. })
        ));
        assert!(!bridge.has_handler("status_bar", "set_translucent"));
    }

    #[test]
    fn test_handler_errors_propagate() {
        let bridge = NativeBridge::new();
        bridge.register("navigation_bar", "get_background_color", |_| {
            Err(NativeBridgeError::Platform("API level too low".to_string()))
        });

        let result: NativeResult<String> =
            bridge.call("navigation_bar", "get_background_color", ());
        assert_eq!(
            result.unwrap_err().to_string(),
            "platform error: API level too low"
        );
    }

    #[test]
    fn test_clones_share_handlers() {
        let bridge = NativeBridge::new();
        let clone = bridge.clone();
        clone.register("status_bar", "set_translucent", |args| {
            Ok(args.into_iter().next().unwrap_or(NativeValue::Void))
        });

        assert!(bridge.has_handler("status_bar", "set_translucent"));
        let translucent: bool = bridge.call("status_bar", "set_translucent", (true,)).unwrap();
        assert!(translucent);
    }
}

//! Veil Animation System
//!
//! Timed tweens, ordered sequences, and one-shot timers driven by a single
//! scheduler clock.
//!
//! # Features
//!
//! - **Easing**: CSS-style cubic béziers and polynomial curves
//! - **Tweens**: Fixed-duration interpolation with an easing curve
//! - **Sequences**: Ordered steps where each step's completion gates the next
//! - **Timers**: One-shot, cancellable, on the same clock as animations
//! - **Deterministic ticking**: `tick_by(dt_ms)` for tests and simulations
//! - **AnimationEngine**: Trait seam so components never depend on a concrete scheduler

pub mod easing;
pub mod engine;
pub mod scheduler;
pub mod sequence;
pub mod timing;

pub use easing::Easing;
pub use engine::{AnimatedValue, AnimationEngine};
pub use scheduler::{
    AnimationScheduler, SchedulerHandle, TimerCallback, TimerId, ValueId, WakeCallback,
};
pub use sequence::{CompletionCallback, Sequence, TimingStep};
pub use timing::{TimingConfig, Tween};

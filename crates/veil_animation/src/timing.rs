//! Timed tweens
//!
//! A [`Tween`] moves a single value from a start to a target over a fixed
//! duration, shaped by an [`Easing`] curve.

use crate::easing::Easing;

/// Duration and easing for one timed step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimingConfig {
    pub duration_ms: u32,
    pub easing: Easing,
}

impl TimingConfig {
    pub const DEFAULT_DURATION_MS: u32 = 300;

    /// Timing with the default easing curve
    pub fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            easing: Easing::default(),
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DURATION_MS)
    }
}

/// Interpolation from `from` to `to` over a timing config
#[derive(Clone, Copy, Debug)]
pub struct Tween {
    from: f32,
    to: f32,
    config: TimingConfig,
    elapsed_ms: f32,
}

impl Tween {
    pub fn new(from: f32, to: f32, config: TimingConfig) -> Self {
        Self {
            from,
            to,
            config,
            elapsed_ms: 0.0,
        }
    }

    /// Advance by `dt_ms`, returning the time left over past the end
    ///
    /// The leftover is zero while the tween is still running.
    pub fn advance(&mut self, dt_ms: f32) -> f32 {
        self.elapsed_ms += dt_ms.max(0.0);
        let duration = self.config.duration_ms as f32;
        if self.elapsed_ms >= duration {
            let leftover = self.elapsed_ms - duration;
            self.elapsed_ms = duration;
            leftover
        } else {
            0.0
        }
    }

    /// Linear progress (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        if self.config.duration_ms == 0 {
            return 1.0;
        }
        (self.elapsed_ms / self.config.duration_ms as f32).clamp(0.0, 1.0)
    }

    /// Current eased value; exactly `to` once finished
    pub fn value(&self) -> f32 {
        if self.is_finished() {
            return self.to;
        }
        let eased = self.config.easing.apply(self.progress());
        self.from + (self.to - self.from) * eased
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.config.duration_ms as f32
    }
}

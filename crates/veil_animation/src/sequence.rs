//! Ordered multi-step animations
//!
//! A [`Sequence`] runs [`TimingStep`]s one after another on a single value.
//! Each step starts from wherever the previous step left the value, and each
//! step's completion callback fires exactly once, on the frame the step
//! reaches its target. Frame time left over after a step ends carries into
//! the next step, so a sequence's total duration is the sum of its steps
//! regardless of frame size.

use std::collections::VecDeque;
use std::fmt;

use crate::timing::{TimingConfig, Tween};

/// Callback fired when an animation step reaches its target
pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

/// One timed segment of a sequence
pub struct TimingStep {
    pub target: f32,
    pub config: TimingConfig,
    on_complete: Option<CompletionCallback>,
}

impl TimingStep {
    pub fn new(target: f32, config: TimingConfig) -> Self {
        Self {
            target,
            config,
            on_complete: None,
        }
    }

    /// Attach a callback fired once this step reaches its target
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for TimingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimingStep")
            .field("target", &self.target)
            .field("config", &self.config)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

struct ActiveStep {
    tween: Tween,
    on_complete: Option<CompletionCallback>,
}

/// A queue of timing steps applied to one value
pub struct Sequence {
    pending: VecDeque<TimingStep>,
    current: Option<ActiveStep>,
}

impl Sequence {
    pub fn new(steps: Vec<TimingStep>) -> Self {
        Self {
            pending: steps.into(),
            current: None,
        }
    }

    /// Advance the sequence by `dt_ms`, writing the new value
    ///
    /// Callbacks of steps that finished during this advance are pushed onto
    /// `fired` in step order; the caller decides where they run.
    pub fn advance(&mut self, value: &mut f32, dt_ms: f32, fired: &mut Vec<CompletionCallback>) {
        let mut remaining = dt_ms.max(0.0);

        loop {
            if self.current.is_none() {
                match self.pending.pop_front() {
                    Some(step) => {
                        self.current = Some(ActiveStep {
                            tween: Tween::new(*value, step.target, step.config),
                            on_complete: step.on_complete,
                        });
                    }
                    None => return,
                }
            }

            let Some(active) = self.current.as_mut() else {
                return;
            };

            let leftover = active.tween.advance(remaining);
            *value = active.tween.value();

            if !active.tween.is_finished() {
                return;
            }

            if let Some(callback) = active.on_complete.take() {
                fired.push(callback);
            }
            self.current = None;
            remaining = leftover;
        }
    }

    /// True once every step has reached its target
    pub fn is_finished(&self) -> bool {
        self.current.is_none() && self.pending.is_empty()
    }
}

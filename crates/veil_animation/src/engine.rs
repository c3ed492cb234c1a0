//! Animation engine abstraction
//!
//! Components that animate depend on [`AnimationEngine`] rather than on a
//! concrete scheduler, so hosts can plug in their own frame scheduler and
//! tests can drive time deterministically.

use std::sync::Arc;

use crate::scheduler::{SchedulerHandle, TimerCallback, TimerId, ValueId};
use crate::sequence::TimingStep;

/// Timing/animation engine used by animated components
///
/// Contract:
/// - a sequence's step callbacks fire exactly once each, after the value
///   reaches that step's target, in step order
/// - starting a new sequence on a value replaces the running one; callbacks
///   of the replaced sequence never fire
/// - a timer callback fires at most once, never after `clear_timeout`
pub trait AnimationEngine: Send + Sync {
    fn create_value(&self, initial: f32) -> Option<ValueId>;

    fn value(&self, id: ValueId) -> Option<f32>;

    /// Run an ordered sequence on the value; false if it was not accepted
    fn run(&self, id: ValueId, steps: Vec<TimingStep>) -> bool;

    fn remove_value(&self, id: ValueId);

    fn set_timeout(&self, delay_ms: u64, callback: TimerCallback) -> Option<TimerId>;

    fn clear_timeout(&self, id: TimerId) -> bool;

    fn is_alive(&self) -> bool;
}

impl AnimationEngine for SchedulerHandle {
    fn create_value(&self, initial: f32) -> Option<ValueId> {
        self.register_value(initial)
    }

    fn value(&self, id: ValueId) -> Option<f32> {
        SchedulerHandle::value(self, id)
    }

    fn run(&self, id: ValueId, steps: Vec<TimingStep>) -> bool {
        self.run_sequence(id, steps)
    }

    fn remove_value(&self, id: ValueId) {
        SchedulerHandle::remove_value(self, id)
    }

    fn set_timeout(&self, delay_ms: u64, callback: TimerCallback) -> Option<TimerId> {
        SchedulerHandle::set_timeout(self, delay_ms, callback)
    }

    fn clear_timeout(&self, id: TimerId) -> bool {
        SchedulerHandle::clear_timeout(self, id)
    }

    fn is_alive(&self) -> bool {
        SchedulerHandle::is_alive(self)
    }
}

/// A value registered with an engine, released when dropped
///
/// If the engine could not register the value, or has since shut down, reads
/// fall back to the initial value so rendering stays well-defined.
pub struct AnimatedValue {
    engine: Arc<dyn AnimationEngine>,
    id: Option<ValueId>,
    fallback: f32,
}

impl AnimatedValue {
    pub fn new(engine: Arc<dyn AnimationEngine>, initial: f32) -> Self {
        let id = engine.create_value(initial);
        if id.is_none() {
            tracing::warn!("animation engine unavailable; value pinned at {}", initial);
        }
        Self {
            engine,
            id,
            fallback: initial,
        }
    }

    /// Current value
    pub fn get(&self) -> f32 {
        self.id
            .and_then(|id| self.engine.value(id))
            .unwrap_or(self.fallback)
    }

    /// Run a sequence on this value; false if the engine refused it
    pub fn animate(&self, steps: Vec<TimingStep>) -> bool {
        match self.id {
            Some(id) => self.engine.run(id, steps),
            None => false,
        }
    }
}

impl Drop for AnimatedValue {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.engine.remove_value(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::scheduler::AnimationScheduler;
    use crate::timing::TimingConfig;

    #[test]
    fn test_animated_value_tracks_engine() {
        let scheduler = AnimationScheduler::new();
        let engine: Arc<dyn AnimationEngine> = Arc::new(scheduler.handle());

        let value = AnimatedValue::new(engine, 1.0);
        assert_eq!(value.get(), 1.0);

        assert!(value.animate(vec![TimingStep::new(
            0.0,
            TimingConfig::new(100).with_easing(Easing::Linear),
        )]));
        scheduler.tick_by(50.0);
        assert!((value.get() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_drop_releases_engine_value() {
        let scheduler = AnimationScheduler::new();
        let engine: Arc<dyn AnimationEngine> = Arc::new(scheduler.handle());

        {
            let _value = AnimatedValue::new(engine.clone(), 0.0);
            assert_eq!(scheduler.value_count(), 1);
        }
        assert_eq!(scheduler.value_count(), 0);
    }

    #[test]
    fn test_dead_engine_falls_back() {
        let engine: Arc<dyn AnimationEngine> = {
            let scheduler = AnimationScheduler::new();
            Arc::new(scheduler.handle())
        };

        let value = AnimatedValue::new(engine, 1.0);
        assert_eq!(value.get(), 1.0);
        assert!(!value.animate(Vec::new()));
    }

    #[test]
    fn test_engine_lost_mid_animation_reads_initial() {
        let scheduler = AnimationScheduler::new();
        let engine: Arc<dyn AnimationEngine> = Arc::new(scheduler.handle());

        let value = AnimatedValue::new(engine.clone(), 1.0);
        value.animate(vec![TimingStep::new(
            0.0,
            TimingConfig::new(100).with_easing(Easing::Linear),
        )]);
        scheduler.tick_by(50.0);
        drop(scheduler);

        assert!(!engine.is_alive());
        assert_eq!(value.get(), 1.0);
    }
}

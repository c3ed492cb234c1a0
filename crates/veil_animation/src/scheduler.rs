//! Animation scheduler
//!
//! Owns every animated value and one-shot timer and advances them each frame.
//! Values are registered through a [`SchedulerHandle`]; the scheduler itself
//! is held by the host (render loop or test) that decides when time passes:
//!
//! - [`AnimationScheduler::tick`] advances by wall-clock time since the last frame
//! - [`AnimationScheduler::tick_by`] advances by an explicit delta (deterministic clock)
//! - [`AnimationScheduler::start_background`] ticks on a dedicated thread
//!
//! Completion and timer callbacks are collected while the scheduler lock is
//! held and invoked after it is released, so a callback may call back into
//! the scheduler. In background mode they run on the animation thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use slotmap::{new_key_type, SlotMap};

use crate::sequence::{CompletionCallback, Sequence, TimingStep};

new_key_type! {
    /// Handle to a registered animated value
    pub struct ValueId;
    /// Handle to a pending one-shot timer
    pub struct TimerId;
}

/// Callback fired when a one-shot timer expires
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Callback type for waking up the main thread from the animation thread
pub type WakeCallback = Arc<dyn Fn() + Send + Sync>;

struct AnimatedSlot {
    value: f32,
    sequence: Option<Sequence>,
}

struct PendingTimer {
    remaining_ms: f32,
    callback: Option<TimerCallback>,
}

/// Internal state of the animation scheduler
struct SchedulerInner {
    values: SlotMap<ValueId, AnimatedSlot>,
    timers: SlotMap<TimerId, PendingTimer>,
    last_frame: Instant,
}

impl SchedulerInner {
    /// Advance timers and values by `dt_ms`
    ///
    /// Returns the callbacks that became due, timers first, and whether any
    /// animation or timer is still pending.
    fn step(&mut self, dt_ms: f32) -> (Vec<CompletionCallback>, bool) {
        let dt_ms = dt_ms.max(0.0);
        let mut fired: Vec<CompletionCallback> = Vec::new();

        let mut expired = Vec::new();
        for (id, timer) in self.timers.iter_mut() {
            timer.remaining_ms -= dt_ms;
            if timer.remaining_ms <= 0.0 {
                expired.push(id);
            }
        }
        for id in expired {
            if let Some(callback) = self.timers.remove(id).and_then(|t| t.callback) {
                fired.push(callback);
            }
        }

        for (_, slot) in self.values.iter_mut() {
            if let Some(sequence) = slot.sequence.as_mut() {
                sequence.advance(&mut slot.value, dt_ms, &mut fired);
                if sequence.is_finished() {
                    slot.sequence = None;
                }
            }
        }

        (fired, self.has_pending())
    }

    fn has_pending(&self) -> bool {
        !self.timers.is_empty() || self.values.iter().any(|(_, s)| s.sequence.is_some())
    }
}

fn lock(inner: &Mutex<SchedulerInner>) -> MutexGuard<'_, SchedulerInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

fn run_callbacks(callbacks: Vec<CompletionCallback>) {
    for callback in callbacks {
        callback();
    }
}

/// The scheduler that ticks all animated values and timers
///
/// # Background Thread Mode
///
/// ```ignore
/// let mut scheduler = AnimationScheduler::new();
/// scheduler.set_wake_callback(move || proxy.wake());
/// scheduler.start_background(); // 120fps ticks on a dedicated thread
/// ```
pub struct AnimationScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
    /// Stop signal for background thread
    stop_flag: Arc<AtomicBool>,
    /// Set by the background thread while anything is animating
    needs_redraw: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
    wake_callback: Option<WakeCallback>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                values: SlotMap::with_key(),
                timers: SlotMap::with_key(),
                last_frame: Instant::now(),
            })),
            stop_flag: Arc::new(AtomicBool::new(false)),
            needs_redraw: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
            wake_callback: None,
        }
    }

    /// Set a callback invoked from the background thread when a redraw is needed
    pub fn set_wake_callback<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.wake_callback = Some(Arc::new(callback));
    }

    /// Start ticking on a background thread at 120fps
    pub fn start_background(&mut self) {
        if self.thread_handle.is_some() {
            return; // Already running
        }

        let inner = Arc::clone(&self.inner);
        let stop_flag = Arc::clone(&self.stop_flag);
        let needs_redraw = Arc::clone(&self.needs_redraw);
        let wake_callback = self.wake_callback.clone();

        self.thread_handle = Some(thread::spawn(move || {
            let frame_duration = Duration::from_micros(1_000_000 / 120);
            tracing::debug!("animation thread started");

            while !stop_flag.load(Ordering::Relaxed) {
                let start = Instant::now();

                let (fired, has_pending) = {
                    let mut inner = lock(&inner);
                    let now = Instant::now();
                    let dt_ms = (now - inner.last_frame).as_secs_f32() * 1000.0;
                    inner.last_frame = now;
                    inner.step(dt_ms)
                };
                run_callbacks(fired);

                if has_pending {
                    needs_redraw.store(true, Ordering::Release);
                    if let Some(ref callback) = wake_callback {
                        callback();
                    }
                }

                let elapsed = start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }

            tracing::debug!("animation thread stopped");
        }));
    }

    /// Stop the background thread
    pub fn stop_background(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
        self.stop_flag.store(false, Ordering::Relaxed);
    }

    pub fn is_background_running(&self) -> bool {
        self.thread_handle.is_some()
    }

    /// Check and clear the redraw flag set by the background thread
    pub fn take_needs_redraw(&self) -> bool {
        self.needs_redraw.swap(false, Ordering::Acquire)
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Advance by the wall-clock time since the previous frame
    ///
    /// Returns true if any animation or timer is still pending.
    pub fn tick(&self) -> bool {
        let (fired, has_pending) = {
            let mut inner = lock(&self.inner);
            let now = Instant::now();
            let dt_ms = (now - inner.last_frame).as_secs_f32() * 1000.0;
            inner.last_frame = now;
            inner.step(dt_ms)
        };
        run_callbacks(fired);
        has_pending
    }

    /// Advance by exactly `dt_ms` milliseconds
    ///
    /// Returns true if any animation or timer is still pending.
    pub fn tick_by(&self, dt_ms: f32) -> bool {
        let (fired, has_pending) = lock(&self.inner).step(dt_ms);
        run_callbacks(fired);
        has_pending
    }

    pub fn has_active_animations(&self) -> bool {
        lock(&self.inner).has_pending()
    }

    /// Number of registered animated values
    pub fn value_count(&self) -> usize {
        lock(&self.inner).values.len()
    }

    /// Number of timers that have not fired or been cleared
    pub fn timer_count(&self) -> usize {
        lock(&self.inner).timers.len()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AnimationScheduler {
    fn drop(&mut self) {
        self.stop_background();
    }
}

/// A weak handle to the animation scheduler
///
/// Held by components that register values and timers. It does not keep the
/// scheduler alive; once the scheduler is dropped every operation no-ops.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Register a value at rest and return its ID
    pub fn register_value(&self, initial: f32) -> Option<ValueId> {
        self.inner.upgrade().map(|inner| {
            lock(&inner).values.insert(AnimatedSlot {
                value: initial,
                sequence: None,
            })
        })
    }

    /// Current value
    pub fn value(&self, id: ValueId) -> Option<f32> {
        self.inner
            .upgrade()
            .and_then(|inner| lock(&inner).values.get(id).map(|s| s.value))
    }

    /// Replace the value's animation with an ordered sequence of steps
    ///
    /// Returns false when the scheduler or value no longer exists; the steps
    /// (and their callbacks) are dropped in that case.
    pub fn run_sequence(&self, id: ValueId, steps: Vec<TimingStep>) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let mut guard = lock(&inner);
        match guard.values.get_mut(id) {
            Some(slot) => {
                slot.sequence = Some(Sequence::new(steps));
                true
            }
            None => false,
        }
    }

    /// Check if a sequence is still running on the value
    pub fn is_animating(&self, id: ValueId) -> bool {
        self.inner
            .upgrade()
            .and_then(|inner| lock(&inner).values.get(id).map(|s| s.sequence.is_some()))
            .unwrap_or(false)
    }

    pub fn remove_value(&self, id: ValueId) {
        if let Some(inner) = self.inner.upgrade() {
            lock(&inner).values.remove(id);
        }
    }

    /// Arm a one-shot timer that fires after `delay_ms` of scheduler time
    pub fn set_timeout<F>(&self, delay_ms: u64, callback: F) -> Option<TimerId>
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.upgrade().map(|inner| {
            lock(&inner).timers.insert(PendingTimer {
                remaining_ms: delay_ms as f32,
                callback: Some(Box::new(callback)),
            })
        })
    }

    /// Cancel a pending timer, returning whether it was still pending
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| lock(&inner).timers.remove(id).is_some())
            .unwrap_or(false)
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

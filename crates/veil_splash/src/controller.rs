//! Splash controller
//!
//! The controller owns a one-shot state machine:
//!
//! ```text
//! ShowingSplash ──hide()──▶ Animating ──driver done──▶ AppReady
//!       └────────hide() with AnimationType::None────────▲
//! ```
//!
//! Engine callbacks (timer expiry, exit completion) never touch controller
//! state. They post a command that [`SplashController::update`] applies on
//! the UI thread. `hide()` acts synchronously on the caller's
//! thread.

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use veil_animation::{AnimatedValue, AnimationEngine, TimerId, TimingStep};
use veil_core::Color;

use crate::chrome::{ChromeControl, OriginalChromeState};
use crate::config::{AnimationType, ContainerStyle, EndCallback, SplashConfig};
use crate::exit::{Channel, ExitPlan};
use crate::screen::ScreenMetrics;
use crate::style::{overlay_style, AnimationProgress, ContentTransform, OverlayStyle};

/// Callback passed to a single hide request
pub type HideCallback = Box<dyn FnOnce() + Send + 'static>;

/// Visibility phase of the splash
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplashPhase {
    /// Splash fully visible; initial phase
    ShowingSplash,
    /// Exit animation running
    Animating,
    /// Splash dismissed for good; app content is shown
    AppReady,
}

/// Work posted from engine callbacks to the UI thread
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SplashCommand {
    AutoHide,
    ExitComplete,
}

/// Collaborators the controller runs against
#[derive(Clone)]
pub struct SplashHost {
    pub engine: Arc<dyn AnimationEngine>,
    pub chrome: Arc<dyn ChromeControl>,
    pub screen: Arc<dyn ScreenMetrics>,
}

impl SplashHost {
    pub fn new(
        engine: Arc<dyn AnimationEngine>,
        chrome: Arc<dyn ChromeControl>,
        screen: Arc<dyn ScreenMetrics>,
    ) -> Self {
        Self {
            engine,
            chrome,
            screen,
        }
    }
}

struct ProgressChannels {
    opacity: AnimatedValue,
    scale: AnimatedValue,
    translate_y: AnimatedValue,
    background_opacity: AnimatedValue,
}

impl ProgressChannels {
    fn new(engine: &Arc<dyn AnimationEngine>) -> Self {
        let rest = AnimationProgress::REST;
        Self {
            opacity: AnimatedValue::new(engine.clone(), rest.opacity),
            scale: AnimatedValue::new(engine.clone(), rest.scale),
            translate_y: AnimatedValue::new(engine.clone(), rest.translate_y),
            background_opacity: AnimatedValue::new(engine.clone(), rest.background_opacity),
        }
    }

    fn get(&self, channel: Channel) -> &AnimatedValue {
        match channel {
            Channel::Opacity => &self.opacity,
            Channel::Scale => &self.scale,
            Channel::TranslateY => &self.translate_y,
            Channel::BackgroundOpacity => &self.background_opacity,
        }
    }

    fn snapshot(&self) -> AnimationProgress {
        AnimationProgress {
            opacity: self.opacity.get(),
            scale: self.scale.get(),
            translate_y: self.translate_y.get(),
            background_opacity: self.background_opacity.get(),
        }
    }
}

/// State shared between the controller and its hide handles
struct SplashCore {
    phase: SplashPhase,
    animation: AnimationType,
    screen_height: f32,
    engine: Arc<dyn AnimationEngine>,
    chrome: Arc<dyn ChromeControl>,
    channels: ProgressChannels,
    original_chrome: OriginalChromeState,
    timer: Option<TimerId>,
    on_animation_end: Option<EndCallback>,
    pending_callback: Option<HideCallback>,
    outbox: Sender<SplashCommand>,
}

impl SplashCore {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            if self.engine.clear_timeout(timer) {
                tracing::debug!("auto-hide timer cancelled");
            }
        }
    }

    /// Start every track of the plan; returns whether the driver started
    fn start_plan(&self, plan: &ExitPlan) -> bool {
        let mut driver_started = false;

        for track in &plan.tracks {
            let is_driver = track.channel == plan.driver;
            let last = track.steps.len().saturating_sub(1);

            let steps = track
                .steps
                .iter()
                .enumerate()
                .map(|(i, step)| {
                    let timing = TimingStep::new(step.target, step.timing);
                    if is_driver && i == last {
                        let outbox = self.outbox.clone();
                        timing.on_complete(move || {
                            let _ = outbox.send(SplashCommand::ExitComplete);
                        })
                    } else {
                        timing
                    }
                })
                .collect();

            let started = self.channels.get(track.channel).animate(steps);
            if is_driver {
                driver_started = started;
            }
        }

        driver_started
    }
}

fn lock(core: &Mutex<SplashCore>) -> MutexGuard<'_, SplashCore> {
    core.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Finish an exit whose engine shut down before the driver completed
///
/// The driver's completion callback is dropped with the engine, so nothing
/// else would ever leave `Animating`.
fn finish_if_engine_lost(core: &Mutex<SplashCore>) -> bool {
    let lost = {
        let guard = lock(core);
        guard.phase == SplashPhase::Animating && !guard.engine.is_alive()
    };
    if lost {
        tracing::warn!("animation engine shut down during the exit; finishing now");
        finish(core);
    }
    lost
}

/// Start the exit for the first hide request; later requests are ignored
fn begin_exit(core: &Mutex<SplashCore>, callback: Option<HideCallback>) {
    if finish_if_engine_lost(core) {
        tracing::debug!("hide ignored; splash already dismissed");
        return;
    }

    let mut guard = lock(core);
    if guard.phase != SplashPhase::ShowingSplash {
        tracing::debug!("hide ignored in phase {:?}", guard.phase);
        return;
    }

    guard.cancel_timer();
    guard.pending_callback = callback;

    let Some(plan) = ExitPlan::for_animation(guard.animation, guard.screen_height) else {
        drop(guard);
        finish(core);
        return;
    };

    guard.phase = SplashPhase::Animating;
    tracing::debug!(
        "splash exit started: {} ({}ms)",
        guard.animation,
        plan.duration_ms()
    );

    if !guard.start_plan(&plan) {
        tracing::warn!("animation engine refused the exit animation; finishing now");
        drop(guard);
        finish(core);
    }
}

/// Move to `AppReady`, restore chrome, and run the completion callbacks
///
/// Runs at most once per mount. Callbacks run after the lock is released so
/// they may call back into the controller.
fn finish(core: &Mutex<SplashCore>) {
    let (chrome, original, on_end, callback) = {
        let mut guard = lock(core);
        if guard.phase == SplashPhase::AppReady {
            return;
        }
        guard.phase = SplashPhase::AppReady;
        guard.cancel_timer();
        tracing::debug!("splash finished; app ready");

        (
            guard.chrome.clone(),
            guard.original_chrome.clone(),
            guard.on_animation_end.take(),
            guard.pending_callback.take(),
        )
    };

    original.restore(chrome.as_ref());

    if let Some(on_end) = on_end {
        on_end();
    }
    if let Some(callback) = callback {
        callback();
    }
}

/// Full-screen splash overlay controller
///
/// Dropping the controller unmounts it. The auto-hide timer is cancelled and
/// outstanding [`HideHandle`]s go inert.
pub struct SplashController<S, C> {
    splash: S,
    children: C,
    background: Color,
    container: ContainerStyle,
    screen: Arc<dyn ScreenMetrics>,
    core: Arc<Mutex<SplashCore>>,
    inbox: Receiver<SplashCommand>,
}

impl<S, C> SplashController<S, C> {
    /// Mount the splash
    ///
    /// Records the original chrome appearance, applies the splash appearance,
    /// and arms the auto-hide timer when configured.
    pub fn mount(config: SplashConfig<S, C>, host: SplashHost) -> (Self, HideHandle) {
        let SplashConfig {
            splash,
            children,
            options,
            on_animation_end,
        } = config;
        let SplashHost {
            engine,
            chrome,
            screen,
        } = host;

        let original_chrome = OriginalChromeState::capture(chrome.as_ref());
        if let Err(err) = chrome.set_status_bar_translucent(true) {
            tracing::error!("Error setting status bar translucent: {}", err);
        }
        if let Err(err) = chrome.set_status_bar_background_color(Color::TRANSPARENT) {
            tracing::error!("Error setting status bar color: {}", err);
        }
        original_chrome.apply_splash(chrome.as_ref(), options.background_color);

        let (outbox, inbox) = mpsc::channel();

        let timer = options.auto_hide_delay().and_then(|delay_ms| {
            let outbox = outbox.clone();
            let timer = engine.set_timeout(
                delay_ms,
                Box::new(move || {
                    let _ = outbox.send(SplashCommand::AutoHide);
                }),
            );
            if timer.is_none() {
                tracing::warn!("animation engine unavailable; auto-hide disabled");
            }
            timer
        });

        tracing::debug!(
            "splash mounted: animation={}, auto_hide={:?}",
            options.animation_type,
            options.auto_hide_delay()
        );

        let core = SplashCore {
            phase: SplashPhase::ShowingSplash,
            animation: options.animation_type,
            screen_height: screen.screen_size().height,
            channels: ProgressChannels::new(&engine),
            engine,
            chrome,
            original_chrome,
            timer,
            on_animation_end,
            pending_callback: None,
            outbox,
        };

        let controller = Self {
            splash,
            children,
            background: options.background_color,
            container: options.container_style,
            screen,
            core: Arc::new(Mutex::new(core)),
            inbox,
        };
        let handle = controller.handle();
        (controller, handle)
    }

    /// New handle to this controller
    pub fn handle(&self) -> HideHandle {
        HideHandle {
            core: Arc::downgrade(&self.core),
        }
    }

    pub fn hide(&self) {
        begin_exit(&self.core, None);
    }

    /// Hide, running `callback` once the splash is dismissed
    ///
    /// The callback is dropped without running if the splash is already
    /// hiding.
    pub fn hide_with<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        begin_exit(&self.core, Some(Box::new(callback)));
    }

    /// Apply commands posted by engine callbacks and return the new phase
    ///
    /// Call once per frame on the UI thread, after ticking the engine.
    pub fn update(&self) -> SplashPhase {
        while let Ok(command) = self.inbox.try_recv() {
            match command {
                SplashCommand::AutoHide => {
                    tracing::debug!("auto-hide timer fired");
                    lock(&self.core).timer = None;
                    begin_exit(&self.core, None);
                }
                SplashCommand::ExitComplete => finish(&self.core),
            }
        }
        finish_if_engine_lost(&self.core);
        self.phase()
    }

    pub fn phase(&self) -> SplashPhase {
        lock(&self.core).phase
    }

    pub fn is_app_ready(&self) -> bool {
        self.phase() == SplashPhase::AppReady
    }

    /// Current values of the animated channels
    pub fn progress(&self) -> AnimationProgress {
        lock(&self.core).channels.snapshot()
    }

    pub fn original_chrome(&self) -> OriginalChromeState {
        lock(&self.core).original_chrome.clone()
    }

    /// What the host should draw this frame
    pub fn render(&self) -> SplashFrame<'_, S, C> {
        let (phase, progress) = {
            let core = lock(&self.core);
            (core.phase, core.channels.snapshot())
        };

        if phase == SplashPhase::AppReady {
            return SplashFrame::App(&self.children);
        }

        let style = overlay_style(
            self.screen.screen_size(),
            self.screen.safe_area_insets(),
            self.background,
            &self.container,
        );

        SplashFrame::Splash(SplashView {
            content: &self.splash,
            style,
            transform: ContentTransform::from_progress(&progress),
            background_opacity: progress.background_opacity.clamp(0.0, 1.0),
        })
    }
}

impl<S, C> Drop for SplashController<S, C> {
    fn drop(&mut self) {
        let mut core = lock(&self.core);
        core.cancel_timer();
        tracing::debug!("splash unmounted in phase {:?}", core.phase);
    }
}

/// Output of [`SplashController::render`]
pub enum SplashFrame<'a, S, C> {
    Splash(SplashView<'a, S>),
    App(&'a C),
}

impl<S, C> SplashFrame<'_, S, C> {
    pub fn is_splash(&self) -> bool {
        matches!(self, SplashFrame::Splash(_))
    }
}

/// Splash overlay as it should be drawn this frame
pub struct SplashView<'a, S> {
    pub content: &'a S,
    pub style: OverlayStyle,
    pub transform: ContentTransform,
    pub background_opacity: f32,
}

/// Cloneable capability to dismiss a mounted splash
///
/// Does not keep the controller alive; after unmount every call is a no-op.
#[derive(Clone)]
pub struct HideHandle {
    core: Weak<Mutex<SplashCore>>,
}

impl HideHandle {
    pub fn hide(&self) {
        self.request(None);
    }

    /// Hide, running `callback` once the splash is dismissed
    pub fn hide_with<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.request(Some(Box::new(callback)));
    }

    pub fn is_mounted(&self) -> bool {
        self.core.strong_count() > 0
    }

    fn request(&self, callback: Option<HideCallback>) {
        match self.core.upgrade() {
            Some(core) => begin_exit(&core, callback),
            None => tracing::debug!("hide ignored; splash is not mounted"),
        }
    }
}

impl fmt::Debug for HideHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HideHandle")
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chrome::{ChromeError, ChromeVisibility};
    use crate::config::SplashDuration;
    use crate::screen::FixedScreen;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use veil_animation::AnimationScheduler;

    const FRAME_MS: f32 = 16.0;

    /// Chrome that records every setter call
    struct RecordingChrome {
        color: Option<Color>,
        visibility: Option<ChromeVisibility>,
        fail_setters: bool,
        calls: Mutex<Vec<String>>,
    }

    impl RecordingChrome {
        fn new(color: &str, visibility: ChromeVisibility) -> Self {
            Self {
                color: color.parse().ok(),
                visibility: Some(visibility),
                fail_setters: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                color: None,
                visibility: None,
                fail_setters: true,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Reports its appearance but rejects every change
        fn rejecting_setters(color: &str, visibility: ChromeVisibility) -> Self {
            Self {
                fail_setters: true,
                ..Self::new(color, visibility)
            }
        }

        fn record(&self, call: String) -> Result<(), ChromeError> {
            self.calls.lock().unwrap().push(call);
            if self.fail_setters {
                Err(ChromeError::Unavailable("simulated failure".to_string()))
            } else {
                Ok(())
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ChromeControl for RecordingChrome {
        fn background_color(&self) -> Result<Color, ChromeError> {
            self.color
                .ok_or_else(|| ChromeError::Unavailable("no color".to_string()))
        }

        fn visibility(&self) -> Result<ChromeVisibility, ChromeError> {
            self.visibility
                .clone()
                .ok_or_else(|| ChromeError::Unavailable("no visibility".to_string()))
        }

        fn set_background_color(&self, color: Color) -> Result<(), ChromeError> {
            self.record(format!("color {}", color))
        }

        fn set_visibility(&self, visibility: ChromeVisibility) -> Result<(), ChromeError> {
            self.record(format!("visibility {}", visibility))
        }

        fn set_status_bar_translucent(&self, translucent: bool) -> Result<(), ChromeError> {
            self.record(format!("translucent {}", translucent))
        }

        fn set_status_bar_background_color(&self, color: Color) -> Result<(), ChromeError> {
            self.record(format!("status bar color {}", color))
        }
    }

    fn host(scheduler: &AnimationScheduler, chrome: &Arc<RecordingChrome>) -> SplashHost {
        SplashHost::new(
            Arc::new(scheduler.handle()),
            chrome.clone(),
            Arc::new(FixedScreen::new(390.0, 844.0)),
        )
    }

    fn visible_chrome() -> Arc<RecordingChrome> {
        Arc::new(RecordingChrome::new("#112233", ChromeVisibility::Visible))
    }

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = count.clone();
        (count, move || {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    /// Tick frames until the splash is dismissed; returns the elapsed time
    fn run_until_ready<S, C>(
        scheduler: &AnimationScheduler,
        controller: &SplashController<S, C>,
        max_ms: f32,
    ) -> Option<f32> {
        let mut elapsed = 0.0;
        while elapsed < max_ms {
            scheduler.tick_by(FRAME_MS);
            elapsed += FRAME_MS;
            if controller.update() == SplashPhase::AppReady {
                return Some(elapsed);
            }
        }
        None
    }

    #[test]
    fn test_mount_applies_splash_chrome() {
        let scheduler = AnimationScheduler::new();
        let chrome = visible_chrome();

        let (controller, _handle) =
            SplashController::mount(SplashConfig::new("logo", "app"), host(&scheduler, &chrome));

        assert_eq!(controller.phase(), SplashPhase::ShowingSplash);
        assert_eq!(controller.progress(), AnimationProgress::REST);
        assert_eq!(
            chrome.calls(),
            vec![
                "translucent true",
                "status bar color #00000000",
                "visibility hidden",
                "color #ffffff"
            ]
        );
        assert_eq!(
            controller.original_chrome().visibility,
            Some(ChromeVisibility::Visible)
        );
    }

    #[test]
    fn test_none_hides_synchronously() {
        let scheduler = AnimationScheduler::new();
        let chrome = visible_chrome();
        let order = Arc::new(Mutex::new(Vec::new()));

        let end_order = order.clone();
        let config = SplashConfig::new("logo", "app")
            .on_animation_end(move || end_order.lock().unwrap().push("end"));
        let (controller, handle) = SplashController::mount(config, host(&scheduler, &chrome));

        let hide_order = order.clone();
        handle.hide_with(move || hide_order.lock().unwrap().push("hide"));

        assert!(controller.is_app_ready());
        assert_eq!(*order.lock().unwrap(), vec!["end", "hide"]);
        assert_eq!(
            chrome.calls()[4..],
            ["color #112233".to_string(), "visibility visible".to_string()]
        );
        assert!(matches!(controller.render(), SplashFrame::App(&"app")));
    }

    #[test]
    fn test_manual_splash_stays_until_hidden() {
        let scheduler = AnimationScheduler::new();
        let chrome = visible_chrome();

        let (controller, _handle) =
            SplashController::mount(SplashConfig::new("logo", "app"), host(&scheduler, &chrome));

        assert_eq!(scheduler.timer_count(), 0);
        assert_eq!(run_until_ready(&scheduler, &controller, 5000.0), None);
        assert!(controller.render().is_splash());
    }

    #[test]
    fn test_fade_completes_after_animation() {
        let scheduler = AnimationScheduler::new();
        let chrome = visible_chrome();
        let (ended, on_end) = counter();

        let config = SplashConfig::new("logo", "app")
            .animation(AnimationType::Fade)
            .on_animation_end(on_end);
        let (controller, handle) = SplashController::mount(config, host(&scheduler, &chrome));

        handle.hide();
        assert_eq!(controller.phase(), SplashPhase::Animating);
        assert_eq!(ended.load(Ordering::SeqCst), 0);

        let elapsed = run_until_ready(&scheduler, &controller, 2000.0).unwrap();
        assert!(elapsed >= 500.0, "finished after {elapsed}ms");
        assert!(elapsed < 600.0, "finished after {elapsed}ms");
        assert_eq!(ended.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fade_progress_is_rendered() {
        let scheduler = AnimationScheduler::new();
        let chrome = visible_chrome();

        let config = SplashConfig::new("logo", "app").animation(AnimationType::Fade);
        let (controller, _handle) = SplashController::mount(config, host(&scheduler, &chrome));

        controller.hide();
        scheduler.tick_by(250.0);
        controller.update();

        let progress = controller.progress();
        assert!(progress.opacity > 0.0 && progress.opacity < 1.0);
        assert!(progress.background_opacity > 0.0 && progress.background_opacity < 1.0);

        match controller.render() {
            SplashFrame::Splash(view) => {
                assert_eq!(*view.content, "logo");
                assert_eq!(view.transform.opacity, progress.opacity);
                assert_eq!(view.style.frame.height(), 844.0);
            }
            SplashFrame::App(_) => panic!("splash should still be visible"),
        }
    }

    #[test]
    fn test_bounce_overshoots_before_shrinking() {
        let scheduler = AnimationScheduler::new();
        let chrome = visible_chrome();

        let config = SplashConfig::new("logo", "app").animation(AnimationType::Bounce);
        let (controller, _handle) = SplashController::mount(config, host(&scheduler, &chrome));

        controller.hide();
        scheduler.tick_by(150.0);
        assert!((controller.progress().scale - 1.1).abs() < 1e-4);

        let elapsed = run_until_ready(&scheduler, &controller, 2000.0).unwrap();
        assert!(elapsed >= 350.0);
        assert_eq!(controller.progress().scale, 0.0);
    }

    #[test]
    fn test_slide_moves_off_screen() {
        let scheduler = AnimationScheduler::new();
        let chrome = visible_chrome();

        let config = SplashConfig::new("logo", "app").animation(AnimationType::Slide);
        let (controller, _handle) = SplashController::mount(config, host(&scheduler, &chrome));

        controller.hide();
        run_until_ready(&scheduler, &controller, 2000.0).unwrap();
        assert_eq!(controller.progress().translate_y, -844.0);
    }

    #[test]
    fn test_auto_hide_after_duration() {
        let scheduler = AnimationScheduler::new();
        let chrome = visible_chrome();

        let config = SplashConfig::new("logo", "app")
            .animation(AnimationType::Fade)
            .auto_hide(true)
            .splash_duration(SplashDuration::Millis(1000));
        let (controller, _handle) = SplashController::mount(config, host(&scheduler, &chrome));
        assert_eq!(scheduler.timer_count(), 1);

        let elapsed = run_until_ready(&scheduler, &controller, 5000.0).unwrap();
        assert!(elapsed >= 1500.0, "finished after {elapsed}ms");
        assert!(elapsed < 1600.0, "finished after {elapsed}ms");
    }

    #[test]
    fn test_auto_hide_without_duration_never_fires() {
        let scheduler = AnimationScheduler::new();
        let chrome = visible_chrome();

        let config = SplashConfig::new("logo", "app")
            .auto_hide(true)
            .splash_duration(SplashDuration::Manual);
        let (controller, _handle) = SplashController::mount(config, host(&scheduler, &chrome));

        assert_eq!(scheduler.timer_count(), 0);
        assert_eq!(run_until_ready(&scheduler, &controller, 5000.0), None);
    }

    #[test]
    fn test_unmount_cancels_timer() {
        let scheduler = AnimationScheduler::new();
        let chrome = visible_chrome();
        let (ended, on_end) = counter();

        let config = SplashConfig::new("logo", "app")
            .auto_hide(true)
            .splash_duration(SplashDuration::Millis(1000))
            .on_animation_end(on_end);
        let (controller, handle) = SplashController::mount(config, host(&scheduler, &chrome));
        assert_eq!(scheduler.timer_count(), 1);
        assert_eq!(scheduler.value_count(), 4);

        drop(controller);
        assert_eq!(scheduler.timer_count(), 0);
        assert_eq!(scheduler.value_count(), 0);

        scheduler.tick_by(2000.0);
        handle.hide();
        assert!(!handle.is_mounted());
        assert_eq!(ended.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_explicit_hide_cancels_timer() {
        let scheduler = AnimationScheduler::new();
        let chrome = visible_chrome();
        let (ended, on_end) = counter();

        let config = SplashConfig::new("logo", "app")
            .animation(AnimationType::Scale)
            .auto_hide(true)
            .splash_duration(SplashDuration::Millis(1000))
            .on_animation_end(on_end);
        let (controller, handle) = SplashController::mount(config, host(&scheduler, &chrome));

        handle.hide();
        assert_eq!(scheduler.timer_count(), 0);

        run_until_ready(&scheduler, &controller, 3000.0).unwrap();
        scheduler.tick_by(2000.0);
        controller.update();
        assert_eq!(ended.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failing_chrome_still_completes() {
        let scheduler = AnimationScheduler::new();
        let chrome = Arc::new(RecordingChrome::failing());
        let (ended, on_end) = counter();
        let (hidden, on_hide) = counter();

        let config = SplashConfig::new("logo", "app")
            .animation(AnimationType::Fade)
            .on_animation_end(on_end);
        let (controller, handle) = SplashController::mount(config, host(&scheduler, &chrome));
        assert_eq!(controller.original_chrome(), OriginalChromeState::default());

        handle.hide_with(on_hide);
        run_until_ready(&scheduler, &controller, 2000.0).unwrap();

        assert_eq!(ended.load(Ordering::SeqCst), 1);
        assert_eq!(hidden.load(Ordering::SeqCst), 1);
        // Nothing was recorded, so only the status bar was touched
        assert_eq!(
            chrome.calls(),
            vec!["translucent true", "status bar color #00000000"]
        );
    }

    #[test]
    fn test_rejected_chrome_changes_still_complete() {
        let scheduler = AnimationScheduler::new();
        let chrome = Arc::new(RecordingChrome::rejecting_setters(
            "#112233",
            ChromeVisibility::Visible,
        ));
        let (ended, on_end) = counter();
        let (hidden, on_hide) = counter();

        let config = SplashConfig::new("logo", "app")
            .animation(AnimationType::Fade)
            .on_animation_end(on_end);
        let (controller, handle) = SplashController::mount(config, host(&scheduler, &chrome));
        let original = controller.original_chrome();
        assert_eq!(original.visibility, Some(ChromeVisibility::Visible));
        assert!(original.background_color.is_some());

        handle.hide_with(on_hide);
        assert!(run_until_ready(&scheduler, &controller, 2000.0).is_some());

        assert_eq!(ended.load(Ordering::SeqCst), 1);
        assert_eq!(hidden.load(Ordering::SeqCst), 1);
        // Every change was attempted even though each one failed
        assert_eq!(
            chrome.calls(),
            vec![
                "translucent true",
                "status bar color #00000000",
                "visibility hidden",
                "color #ffffff",
                "color #112233",
                "visibility visible"
            ]
        );
    }

    #[test]
    fn test_engine_dropped_mid_exit_still_finishes() {
        let scheduler = AnimationScheduler::new();
        let chrome = visible_chrome();
        let (ended, on_end) = counter();
        let (hidden, on_hide) = counter();

        let config = SplashConfig::new("logo", "app")
            .animation(AnimationType::Fade)
            .on_animation_end(on_end);
        let (controller, handle) = SplashController::mount(config, host(&scheduler, &chrome));

        handle.hide_with(on_hide);
        scheduler.tick_by(100.0);
        assert_eq!(controller.update(), SplashPhase::Animating);

        drop(scheduler);
        assert_eq!(controller.update(), SplashPhase::AppReady);
        assert_eq!(ended.load(Ordering::SeqCst), 1);
        assert_eq!(hidden.load(Ordering::SeqCst), 1);
        assert_eq!(chrome.calls().last().unwrap(), "visibility visible");

        controller.update();
        assert_eq!(ended.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_hide_after_engine_lost_finishes_exit() {
        let scheduler = AnimationScheduler::new();
        let chrome = visible_chrome();
        let (ended, on_end) = counter();
        let (late, on_late) = counter();

        let config = SplashConfig::new("logo", "app")
            .animation(AnimationType::Slide)
            .on_animation_end(on_end);
        let (controller, handle) = SplashController::mount(config, host(&scheduler, &chrome));

        controller.hide();
        scheduler.tick_by(100.0);
        drop(scheduler);

        handle.hide_with(on_late);
        assert!(controller.is_app_ready());
        assert_eq!(ended.load(Ordering::SeqCst), 1);
        // The exit was already under way, so the late callback is dropped
        assert_eq!(late.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_hidden_bar_is_not_made_visible() {
        let scheduler = AnimationScheduler::new();
        let chrome = Arc::new(RecordingChrome::new("#000000", ChromeVisibility::Hidden));

        let (controller, handle) =
            SplashController::mount(SplashConfig::new("logo", "app"), host(&scheduler, &chrome));
        handle.hide();

        assert!(controller.is_app_ready());
        assert!(!chrome.calls().iter().any(|c| c.starts_with("visibility")));
    }

    #[test]
    fn test_unusual_visibility_is_restored_visible() {
        let scheduler = AnimationScheduler::new();
        let chrome = Arc::new(RecordingChrome::new(
            "#000000",
            ChromeVisibility::Other("leanback".to_string()),
        ));

        let (_controller, handle) =
            SplashController::mount(SplashConfig::new("logo", "app"), host(&scheduler, &chrome));
        handle.hide();

        assert_eq!(chrome.calls().last().unwrap(), "visibility visible");
    }

    #[test]
    fn test_second_hide_is_ignored() {
        let scheduler = AnimationScheduler::new();
        let chrome = visible_chrome();
        let (ended, on_end) = counter();
        let (first, on_first) = counter();
        let (second, on_second) = counter();

        let config = SplashConfig::new("logo", "app")
            .animation(AnimationType::Fade)
            .on_animation_end(on_end);
        let (controller, handle) = SplashController::mount(config, host(&scheduler, &chrome));

        handle.hide_with(on_first);
        scheduler.tick_by(100.0);
        handle.hide_with(on_second);

        run_until_ready(&scheduler, &controller, 2000.0).unwrap();
        handle.hide();
        controller.update();

        assert_eq!(ended.load(Ordering::SeqCst), 1);
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_hide_from_completion_callback() {
        let scheduler = AnimationScheduler::new();
        let chrome = visible_chrome();
        let (ended, on_end) = counter();

        let config = SplashConfig::new("logo", "app").on_animation_end(on_end);
        let (controller, handle) = SplashController::mount(config, host(&scheduler, &chrome));

        let again = handle.clone();
        controller.hide_with(move || again.hide());

        assert!(controller.is_app_ready());
        assert_eq!(ended.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_hide_from_another_thread() {
        let scheduler = AnimationScheduler::new();
        let chrome = visible_chrome();

        let config = SplashConfig::new("logo", "app").animation(AnimationType::Fade);
        let (controller, handle) = SplashController::mount(config, host(&scheduler, &chrome));

        std::thread::spawn(move || handle.hide()).join().unwrap();

        assert_eq!(controller.phase(), SplashPhase::Animating);
        assert!(run_until_ready(&scheduler, &controller, 2000.0).is_some());
    }

    #[test]
    fn test_dead_engine_finishes_immediately() {
        let chrome = visible_chrome();
        let (ended, on_end) = counter();

        let orphaned = {
            let scheduler = AnimationScheduler::new();
            host(&scheduler, &chrome)
        };
        let config = SplashConfig::new("logo", "app")
            .animation(AnimationType::Fade)
            .auto_hide(true)
            .splash_duration(SplashDuration::Millis(1000))
            .on_animation_end(on_end);
        let (controller, handle) = SplashController::mount(config, orphaned);

        handle.hide();
        assert!(controller.is_app_ready());
        assert_eq!(ended.load(Ordering::SeqCst), 1);
    }
}

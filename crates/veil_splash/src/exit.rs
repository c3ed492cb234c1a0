//! Exit animation plans
//!
//! Each [`AnimationType`] maps to a set of per-channel step lists. Plans are
//! plain data; the controller turns them into engine sequences and hooks the
//! completion of the driving track's last step.

use veil_animation::{Easing, TimingConfig};

use crate::config::AnimationType;

const FADE_MS: u32 = 500;
const SCALE_MS: u32 = 500;
const SLIDE_MS: u32 = 500;
const BACKGROUND_FADE_MS: u32 = 600;
const BOUNCE_GROW_MS: u32 = 150;
const BOUNCE_SHRINK_MS: u32 = 350;
const BOUNCE_BACKGROUND_MS: u32 = 500;
const BOUNCE_PEAK: f32 = 1.1;

/// Animated property of the splash
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Opacity,
    Scale,
    TranslateY,
    BackgroundOpacity,
}

/// One timed segment toward `target`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExitStep {
    pub target: f32,
    pub timing: TimingConfig,
}

impl ExitStep {
    fn new(target: f32, duration_ms: u32) -> Self {
        Self {
            target,
            timing: TimingConfig::new(duration_ms),
        }
    }

    fn eased(mut self, easing: Easing) -> Self {
        self.timing = self.timing.with_easing(easing);
        self
    }
}

/// Steps run in order on a single channel
#[derive(Clone, Debug, PartialEq)]
pub struct ExitTrack {
    pub channel: Channel,
    pub steps: Vec<ExitStep>,
}

impl ExitTrack {
    fn new(channel: Channel, steps: Vec<ExitStep>) -> Self {
        Self { channel, steps }
    }

    /// Total duration of the track
    pub fn duration_ms(&self) -> u32 {
        self.steps.iter().map(|s| s.timing.duration_ms).sum()
    }
}

/// Full exit animation: parallel tracks, one of which drives completion
#[derive(Clone, Debug, PartialEq)]
pub struct ExitPlan {
    pub tracks: Vec<ExitTrack>,
    /// Channel whose last step completing dismisses the splash
    pub driver: Channel,
}

impl ExitPlan {
    /// Plan for the given animation type
    ///
    /// Returns `None` for [`AnimationType::None`], which dismisses without
    /// animating. `screen_height` is the slide distance.
    pub fn for_animation(kind: AnimationType, screen_height: f32) -> Option<Self> {
        let plan = match kind {
            AnimationType::Fade => ExitPlan {
                tracks: vec![
                    ExitTrack::new(
                        Channel::Opacity,
                        vec![ExitStep::new(0.0, FADE_MS).eased(Easing::EaseOut)],
                    ),
                    ExitTrack::new(
                        Channel::BackgroundOpacity,
                        vec![ExitStep::new(0.0, BACKGROUND_FADE_MS)],
                    ),
                ],
                driver: Channel::Opacity,
            },
            AnimationType::Scale => ExitPlan {
                tracks: vec![
                    ExitTrack::new(Channel::Scale, vec![ExitStep::new(0.0, SCALE_MS)]),
                    ExitTrack::new(
                        Channel::BackgroundOpacity,
                        vec![ExitStep::new(0.0, BACKGROUND_FADE_MS)],
                    ),
                ],
                driver: Channel::Scale,
            },
            AnimationType::Slide => ExitPlan {
                tracks: vec![ExitTrack::new(
                    Channel::TranslateY,
                    vec![ExitStep::new(-screen_height, SLIDE_MS).eased(Easing::MirroredEaseIn)],
                )],
                driver: Channel::TranslateY,
            },
            AnimationType::Bounce => ExitPlan {
                tracks: vec![
                    ExitTrack::new(
                        Channel::Scale,
                        vec![
                            ExitStep::new(BOUNCE_PEAK, BOUNCE_GROW_MS),
                            ExitStep::new(0.0, BOUNCE_SHRINK_MS).eased(Easing::EaseOut),
                        ],
                    ),
                    ExitTrack::new(
                        Channel::BackgroundOpacity,
                        vec![ExitStep::new(0.0, BOUNCE_BACKGROUND_MS)],
                    ),
                ],
                driver: Channel::Scale,
            },
            AnimationType::None => return None,
        };
        Some(plan)
    }

    pub fn track(&self, channel: Channel) -> Option<&ExitTrack> {
        self.tracks.iter().find(|t| t.channel == channel)
    }

    pub fn driver_track(&self) -> Option<&ExitTrack> {
        self.track(self.driver)
    }

    /// Time until the driving track completes
    pub fn duration_ms(&self) -> u32 {
        self.driver_track().map_or(0, ExitTrack::duration_ms)
    }
}

use std::time::Instant;

use gpui::Hsla;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::state::{ButtonState, PROGRESS_RANGE, clamp_progress};
use crate::{
    animation::{
        AnimationOptions, AnimationTarget, IMPLICIT_DURATION, animate_scoped, implicit_easing,
        lerp,
    },
    debug::{DebugRecord, DebugSink},
    icon::ButtonIcon,
    stroke::StrokeMode,
};

/// The default opacity of a pressed button.
pub const DEFAULT_TOUCHED_ALPHA: f32 = 0.5;

/// One icon per state, `None` leaves the button without icon in that state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StateImages {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<ButtonIcon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_progress: Option<ButtonIcon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended: Option<ButtonIcon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<ButtonIcon>,
}

impl StateImages {
    pub fn get(&self, state: ButtonState) -> Option<&ButtonIcon> {
        match state {
            ButtonState::Default => self.default.as_ref(),
            ButtonState::InProgress => self.in_progress.as_ref(),
            ButtonState::Suspended => self.suspended.as_ref(),
            ButtonState::Completed => self.completed.as_ref(),
        }
    }
}

/// Stroke colors per state, `None` keeps the current stroke color.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StrokeColors {
    pub in_progress: Option<Hsla>,
    pub suspended: Option<Hsla>,
    pub completed: Option<Hsla>,
}

impl StrokeColors {
    /// The color for `state`, [`ButtonState::Default`] shares the in progress color.
    pub fn get(&self, state: ButtonState) -> Option<Hsla> {
        match state {
            ButtonState::Default | ButtonState::InProgress => self.in_progress,
            ButtonState::Suspended => self.suspended,
            ButtonState::Completed => self.completed,
        }
    }
}

/// A change of the ring sweep that should be animated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingTransition {
    pub from: f32,
    pub to: f32,
    /// Unique per transition, used to restart the animation.
    pub epoch: usize,
    pub started_at: Instant,
}

impl RingTransition {
    /// The sweep shown at `now`, following the implicit animation curve.
    pub fn value_at(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.started_at);
        if elapsed >= IMPLICIT_DURATION {
            return self.to;
        }
        let delta = elapsed.as_secs_f32() / IMPLICIT_DURATION.as_secs_f32();
        lerp(self.from, self.to, implicit_easing()(delta))
    }
}

/// What the ring surface currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeLayer {
    pub stroke_color: Option<Hsla>,
    pub stroke_start: f32,
    pub stroke_end: f32,
    pub transition: Option<RingTransition>,
}

/// What the icon surface currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IconLayer {
    pub image: Option<ButtonIcon>,
    /// Bumped every time the image is assigned.
    pub revision: usize,
    /// The running completion bounce, if any.
    pub bounce: Option<usize>,
}

/// State machine and derived visuals of a circle progress button.
///
/// This is independent of any window, [`CircleProgressButton`](super::CircleProgressButton)
/// wraps it into a GPUI view.
#[derive(Debug)]
pub struct ProgressButtonModel {
    state: ButtonState,
    progress: f32,
    images: StateImages,
    stroke_colors: StrokeColors,
    icon_color: Option<Hsla>,
    stroke_mode: StrokeMode,
    touched_alpha: f32,
    animation_options: AnimationOptions,
    debug: bool,
    debug_sink: Option<DebugSink>,
    alpha: f32,
    attached: bool,
    layer: StrokeLayer,
    icon: IconLayer,
    epoch: usize,
}

impl AnimationTarget for ProgressButtonModel {
    fn animation_options_mut(&mut self) -> &mut AnimationOptions {
        &mut self.animation_options
    }
}

impl Default for ProgressButtonModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressButtonModel {
    pub fn new() -> Self {
        Self {
            state: ButtonState::Default,
            progress: *PROGRESS_RANGE.start(),
            images: StateImages::default(),
            stroke_colors: StrokeColors::default(),
            icon_color: None,
            stroke_mode: StrokeMode::default(),
            touched_alpha: DEFAULT_TOUCHED_ALPHA,
            animation_options: AnimationOptions::default(),
            debug: false,
            debug_sink: None,
            alpha: 1.,
            attached: false,
            layer: StrokeLayer::default(),
            icon: IconLayer::default(),
            epoch: 0,
        }
    }

    /// Materialize the visuals once the button is on screen, this enters [`ButtonState::Default`].
    pub fn attach(&mut self) {
        self.attached = true;
        self.layer.stroke_start = 0.;
        self.layer.stroke_end = self.progress / 100.;
        self.set_state(ButtonState::Default);
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn suspend(&mut self) {
        self.set_state(ButtonState::Suspended);
    }

    pub fn resume(&mut self) {
        self.set_state(ButtonState::InProgress);
    }

    /// Enter [`ButtonState::Completed`], the progress is forced to 100.
    pub fn complete(&mut self) {
        self.set_state(ButtonState::Completed);
        self.set_progress(*PROGRESS_RANGE.end());
    }

    /// Back to [`ButtonState::Default`] with progress 0.
    pub fn reset(&mut self) {
        self.set_progress(*PROGRESS_RANGE.start());
        self.set_state(ButtonState::Default);
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Set the progress, clamped into `0..=100`. This never changes the state.
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = clamp_progress(progress);
        self.update_circle_progress();
    }

    /// The visible fraction of the ring, `progress / 100`.
    pub fn sweep_fraction(&self) -> f32 {
        self.layer.stroke_end - self.layer.stroke_start
    }

    pub fn images(&self) -> &StateImages {
        &self.images
    }

    /// Replace the per state images.
    ///
    /// The displayed icon changes with the next state change.
    pub fn set_images(&mut self, images: StateImages) {
        self.images = images;
    }

    pub fn stroke_colors(&self) -> StrokeColors {
        self.stroke_colors
    }

    /// Replace the per state stroke colors, applied on the next state change.
    pub fn set_stroke_colors(&mut self, colors: StrokeColors) {
        self.stroke_colors = colors;
    }

    pub fn icon_color(&self) -> Option<Hsla> {
        self.icon_color
    }

    /// Tint of SVG icons.
    pub fn set_icon_color(&mut self, color: Option<Hsla>) {
        self.icon_color = color;
    }

    pub fn stroke_mode(&self) -> &StrokeMode {
        &self.stroke_mode
    }

    pub fn set_stroke_mode(&mut self, mode: StrokeMode) {
        self.stroke_mode = mode;
    }

    pub fn touched_alpha(&self) -> f32 {
        self.touched_alpha
    }

    pub fn set_touched_alpha(&mut self, alpha: f32) {
        self.touched_alpha = if alpha.is_nan() {
            DEFAULT_TOUCHED_ALPHA
        } else {
            alpha.clamp(0., 1.)
        };
    }

    pub fn animation_options(&self) -> AnimationOptions {
        self.animation_options
    }

    pub fn set_animation_options(&mut self, options: AnimationOptions) {
        self.animation_options = options;
    }

    /// Run `f` with `options`, the previous options are restored afterwards, also when `f` panics.
    pub fn animate<R>(&mut self, options: AnimationOptions, f: impl FnOnce(&mut Self) -> R) -> R {
        animate_scoped(self, options, f)
    }

    /// Run `f` with every animation disabled.
    pub fn perform_without_animation<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.animate(AnimationOptions::empty(), f)
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.debug
    }

    /// Trace every progress update, see [`DebugSink`].
    pub fn set_debug(&mut self, enabled: bool) {
        self.debug = enabled;
    }

    /// Send debug records to `sink` instead of the global one.
    pub fn set_debug_sink(&mut self, sink: DebugSink) {
        self.debug_sink = Some(sink);
    }

    /// Opacity of the whole button, lowered while pressed.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn press(&mut self) {
        self.alpha = self.touched_alpha;
    }

    /// The touch ended or was cancelled.
    pub fn release(&mut self) {
        self.alpha = 1.;
    }

    /// Handle a tap, returns the state the tap callbacks should receive.
    pub fn tap(&mut self) -> ButtonState {
        self.alpha = 1.;
        self.state
    }

    pub fn stroke_layer(&self) -> &StrokeLayer {
        &self.layer
    }

    pub fn icon_layer(&self) -> &IconLayer {
        &self.icon
    }

    fn set_state(&mut self, state: ButtonState) {
        self.state = state;
        self.update_image_if_needed();
        if let Some(color) = self.stroke_colors.get(state) {
            self.layer.stroke_color = Some(color);
        }
    }

    fn update_image_if_needed(&mut self) {
        let image = self.images.get(self.state).cloned();
        match self.state {
            ButtonState::Completed => {
                self.icon.image = image;
                self.icon.revision += 1;
                self.icon.bounce = if self
                    .animation_options
                    .contains(AnimationOptions::ICON_SCALE)
                {
                    Some(self.next_epoch())
                } else {
                    None
                };
            }
            _ => {
                self.icon.bounce = None;
                if self.icon.image != image {
                    self.icon.image = image;
                    self.icon.revision += 1;
                }
            }
        }
    }

    fn update_circle_progress(&mut self) {
        if self.debug {
            let record = DebugRecord {
                state: self.state,
                progress: self.progress,
            };
            match &self.debug_sink {
                Some(sink) => sink.trace(record),
                None => DebugSink::global().trace(record),
            }
        }

        let previous = self.layer.stroke_end;
        let to = self.progress / 100.;
        self.layer.stroke_start = 0.;
        self.layer.stroke_end = to;

        if !self.animation_options.contains(AnimationOptions::CIRCLE) {
            self.layer.transition = None;
        } else if previous != to {
            // Continue from what is on screen when a transition is still running.
            let now = Instant::now();
            let from = match self.layer.transition {
                Some(transition) => transition.value_at(now),
                None => previous,
            };
            self.layer.transition = Some(RingTransition {
                from,
                to,
                epoch: self.next_epoch(),
                started_at: now,
            });
        }
    }

    fn next_epoch(&mut self) -> usize {
        self.epoch += 1;
        self.epoch
    }
}

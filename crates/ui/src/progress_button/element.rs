use std::rc::Rc;

use gpui::{
    Animation, AnimationExt as _, AnyElement, App, AppContext as _, Context, ElementId, Entity,
    EventEmitter, Hsla, InteractiveElement as _, IntoElement, MouseButton, ParentElement as _,
    Pixels, Render, StatefulInteractiveElement as _, Styled as _, Window, canvas, div,
    prelude::FluentBuilder as _, px,
};

use super::{
    ButtonState, DisposeToken, ProgressButtonModel, StateImages, StrokeColors, TapRegistry,
};
use crate::{
    animation::{
        AnimationOptions, AnimationTarget, IMPLICIT_DURATION, animate_scoped,
        icon_bounce_duration, icon_scale_at, implicit_easing, lerp,
    },
    config::{ButtonConfig, ButtonDefaults},
    debug::DebugSink,
    ring,
    stroke::{RingGeometry, StrokeMode},
};

/// The default width and height of a button.
pub const DEFAULT_SIZE: Pixels = px(40.);

type TapCallback = dyn Fn(ButtonState, &mut Window, &mut App);

/// Emitted after the tap callbacks were scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Tap(ButtonState),
}

/// A circular button showing a progress ring and a per state icon.
///
/// ```ignore
/// let button = CircleProgressButton::view(window, cx);
/// button.update(cx, |button, cx| {
///     button.resume(cx);
///     button.set_progress(42., cx);
/// });
/// ```
pub struct CircleProgressButton {
    model: ProgressButtonModel,
    taps: TapRegistry<TapCallback>,
    size: Pixels,
    icon_size: Option<Pixels>,
}

impl EventEmitter<ButtonEvent> for CircleProgressButton {}

impl AnimationTarget for CircleProgressButton {
    fn animation_options_mut(&mut self) -> &mut AnimationOptions {
        self.model.animation_options_mut()
    }
}

impl CircleProgressButton {
    pub fn view(window: &mut Window, cx: &mut App) -> Entity<Self> {
        cx.new(|cx| Self::new(window, cx))
    }

    /// Create a button from the [`ButtonDefaults`], in [`ButtonState::Default`].
    pub fn new(_: &mut Window, cx: &mut Context<Self>) -> Self {
        let mut model = ProgressButtonModel::new();
        if let Some(defaults) = cx.try_global::<ButtonDefaults>() {
            defaults.config().apply(&mut model);
        }
        model.attach();

        Self {
            model,
            taps: TapRegistry::new(),
            size: DEFAULT_SIZE,
            icon_size: None,
        }
    }

    pub fn model(&self) -> &ProgressButtonModel {
        &self.model
    }

    pub fn state(&self) -> ButtonState {
        self.model.state()
    }

    pub fn progress(&self) -> f32 {
        self.model.progress()
    }

    pub fn suspend(&mut self, cx: &mut Context<Self>) {
        self.model.suspend();
        cx.notify();
    }

    pub fn resume(&mut self, cx: &mut Context<Self>) {
        self.model.resume();
        cx.notify();
    }

    pub fn complete(&mut self, cx: &mut Context<Self>) {
        self.model.complete();
        cx.notify();
    }

    pub fn reset(&mut self, cx: &mut Context<Self>) {
        self.model.reset();
        cx.notify();
    }

    /// Set the progress, the value is clamped into `0..=100`.
    pub fn set_progress(&mut self, progress: f32, cx: &mut Context<Self>) {
        self.model.set_progress(progress);
        cx.notify();
    }

    pub fn stroke_mode(&self) -> &StrokeMode {
        self.model.stroke_mode()
    }

    pub fn set_stroke_mode(&mut self, mode: StrokeMode, cx: &mut Context<Self>) {
        self.model.set_stroke_mode(mode);
        cx.notify();
    }

    pub fn touched_alpha(&self) -> f32 {
        self.model.touched_alpha()
    }

    pub fn set_touched_alpha(&mut self, alpha: f32, cx: &mut Context<Self>) {
        self.model.set_touched_alpha(alpha);
        cx.notify();
    }

    pub fn animation_options(&self) -> AnimationOptions {
        self.model.animation_options()
    }

    pub fn set_animation_options(&mut self, options: AnimationOptions, cx: &mut Context<Self>) {
        self.model.set_animation_options(options);
        cx.notify();
    }

    pub fn set_images(&mut self, images: StateImages, cx: &mut Context<Self>) {
        self.model.set_images(images);
        cx.notify();
    }

    pub fn set_stroke_colors(&mut self, colors: StrokeColors, cx: &mut Context<Self>) {
        self.model.set_stroke_colors(colors);
        cx.notify();
    }

    pub fn set_icon_color(&mut self, color: Option<Hsla>, cx: &mut Context<Self>) {
        self.model.set_icon_color(color);
        cx.notify();
    }

    pub fn set_debug(&mut self, enabled: bool, cx: &mut Context<Self>) {
        self.model.set_debug(enabled);
        cx.notify();
    }

    pub fn set_debug_sink(&mut self, sink: DebugSink) {
        self.model.set_debug_sink(sink);
    }

    /// Set the width and height of the button, default is 40px.
    pub fn set_size(&mut self, size: impl Into<Pixels>, cx: &mut Context<Self>) {
        self.size = size.into();
        cx.notify();
    }

    /// Set the icon size, default is half of the button size.
    pub fn set_icon_size(&mut self, size: Option<Pixels>, cx: &mut Context<Self>) {
        self.icon_size = size;
        cx.notify();
    }

    /// Apply `config` on top of the current settings.
    pub fn apply_config(&mut self, config: &ButtonConfig, cx: &mut Context<Self>) {
        config.apply(&mut self.model);
        cx.notify();
    }

    /// Run `f` with the given animation options, restoring the previous ones afterwards.
    pub fn animate<R>(
        &mut self,
        options: AnimationOptions,
        cx: &mut Context<Self>,
        f: impl FnOnce(&mut Self, &mut Context<Self>) -> R,
    ) -> R {
        let result = animate_scoped(self, options, |this| f(this, cx));
        cx.notify();
        result
    }

    pub fn perform_without_animation<R>(
        &mut self,
        cx: &mut Context<Self>,
        f: impl FnOnce(&mut Self, &mut Context<Self>) -> R,
    ) -> R {
        self.animate(AnimationOptions::empty(), cx, f)
    }

    /// Register a tap callback, it receives the state the button was in when tapped.
    pub fn on_tap(
        &mut self,
        callback: impl Fn(ButtonState, &mut Window, &mut App) + 'static,
    ) -> DisposeToken {
        self.taps.register(Rc::new(callback))
    }

    fn tap(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let state = self.model.tap();
        let callbacks = self.taps.snapshot();
        if !callbacks.is_empty() {
            window.defer(cx, move |window, cx| {
                for callback in callbacks {
                    callback(state, window, cx);
                }
            });
        }

        cx.emit(ButtonEvent::Tap(state));
        cx.notify();
    }

    fn render_ring(&self) -> AnyElement {
        let layer = self.model.stroke_layer();
        let color = layer.stroke_color;
        let mode = self.model.stroke_mode().clone();

        match layer.transition {
            Some(transition) => div()
                .absolute()
                .size_full()
                .with_animation(
                    ElementId::NamedInteger("circle-progress".into(), transition.epoch as u64),
                    Animation::new(IMPLICIT_DURATION).with_easing(implicit_easing()),
                    move |this, delta| {
                        let sweep = lerp(transition.from, transition.to, delta);
                        this.child(ring_canvas(mode.clone(), sweep, color))
                    },
                )
                .into_any_element(),
            None => div()
                .absolute()
                .size_full()
                .child(ring_canvas(mode, layer.stroke_end - layer.stroke_start, color))
                .into_any_element(),
        }
    }

    fn render_icon(&self) -> Option<AnyElement> {
        let layer = self.model.icon_layer();
        let image = layer.image.clone()?;
        let tint = self.model.icon_color();
        let icon_size = self.icon_size.unwrap_or(self.size * 0.5);

        let icon = div().flex_none().size(icon_size).child(image.render(tint));
        let icon = match layer.bounce {
            Some(epoch) => icon
                .with_animation(
                    ElementId::NamedInteger("icon-scale".into(), epoch as u64),
                    Animation::new(icon_bounce_duration()),
                    move |this, delta| this.size(icon_size * icon_scale_at(delta)),
                )
                .into_any_element(),
            None => icon.into_any_element(),
        };

        Some(
            div()
                .absolute()
                .size_full()
                .flex()
                .items_center()
                .justify_center()
                .child(icon)
                .into_any_element(),
        )
    }
}

fn ring_canvas(mode: StrokeMode, sweep: f32, color: Option<Hsla>) -> impl IntoElement {
    canvas(
        move |bounds, _, _| {
            let diameter = f32::from(bounds.size.width.min(bounds.size.height));
            RingGeometry::new(diameter, &mode, sweep)
        },
        move |bounds, geometry, window, _| {
            if let Some(color) = color {
                ring::paint_ring(&geometry, bounds, color, window);
            }
        },
    )
    .absolute()
    .size_full()
}

impl Render for CircleProgressButton {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        div()
            .id("circle-progress-button")
            .relative()
            .flex_none()
            .size(self.size)
            .cursor_pointer()
            .opacity(self.model.alpha())
            .child(self.render_ring())
            .when_some(self.render_icon(), |this, icon| this.child(icon))
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, _, _, cx| {
                    this.model.press();
                    cx.notify();
                }),
            )
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, _, _, cx| {
                    this.model.release();
                    cx.notify();
                }),
            )
            .on_mouse_up_out(
                MouseButton::Left,
                cx.listener(|this, _, _, cx| {
                    this.model.release();
                    cx.notify();
                }),
            )
            .on_click(cx.listener(|this, _, window, cx| this.tap(window, cx)))
    }
}

impl Drop for CircleProgressButton {
    fn drop(&mut self) {
        self.taps.clear();
    }
}

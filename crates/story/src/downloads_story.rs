use std::time::Duration;

use circle_progress_button::{
    ButtonEvent, ButtonState, CircleProgressButton, DisposeToken, PROGRESS_RANGE, StrokeMode,
    animation::AnimationOptions,
};
use gpui::{
    App, AppContext as _, Context, Entity, InteractiveElement as _, IntoElement,
    ParentElement as _, Render, StatefulInteractiveElement as _, Styled as _, Subscription, Task,
    Window, div, px, rgb,
};
use smol::Timer;

use crate::item::{ItemState, create_items};

const BUTTON_SIZE: f32 = 44.;
const STEP_INTERVAL: Duration = Duration::from_millis(50);
const START_DELAY: Duration = Duration::from_secs(2);

struct Row {
    state: ItemState,
    button: Entity<CircleProgressButton>,
    first_apply: bool,
}

impl Row {
    fn new(state: ItemState, window: &mut Window, cx: &mut App) -> Self {
        let button = CircleProgressButton::view(window, cx);
        button.update(cx, |button, cx| button.set_size(px(BUTTON_SIZE), cx));

        let mut row = Self {
            state,
            button,
            first_apply: true,
        };
        row.apply(state, cx);
        row
    }

    /// The first state is applied without animation, later ones with the icon bounce.
    fn apply(&mut self, state: ItemState, cx: &mut App) {
        let options = if self.first_apply {
            AnimationOptions::empty()
        } else {
            AnimationOptions::ICON_SCALE
        };
        self.first_apply = false;
        self.state = state;

        self.button.update(cx, |button, cx| {
            button.set_animation_options(options, cx);
            button.set_progress(state.progress(), cx);
            match state {
                ItemState::Active(_) => button.resume(cx),
                ItemState::Inactive(_) => button.suspend(cx),
                ItemState::Completed => {
                    button.set_stroke_mode(StrokeMode::border(0.), cx);
                    button.complete(cx);
                }
            }
        });
    }
}

/// A download button driven by a timer, above a list of buttons in mixed states.
pub struct DownloadsStory {
    button: Entity<CircleProgressButton>,
    rows: Vec<Row>,
    progress: f32,
    stopped: bool,
    stepper: Option<Task<()>>,
    tap_token: Option<DisposeToken>,
    _subscriptions: Vec<Subscription>,
}

impl DownloadsStory {
    pub fn view(window: &mut Window, cx: &mut App) -> Entity<Self> {
        cx.new(|cx| Self::new(window, cx))
    }

    fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let button = CircleProgressButton::view(window, cx);
        let this = cx.weak_entity();
        let tap_token = button.update(cx, |button, cx| {
            button.set_size(px(BUTTON_SIZE), cx);
            button.set_debug(true, cx);
            button.on_tap(move |state, _, cx| {
                _ = this.update(cx, |this, cx| this.on_button_tap(state, cx));
            })
        });

        let rows: Vec<Row> = create_items()
            .into_iter()
            .map(|state| Row::new(state, window, cx))
            .collect();

        let _subscriptions = rows
            .iter()
            .enumerate()
            .map(|(ix, row)| {
                cx.subscribe(&row.button, move |this, _, event: &ButtonEvent, cx| {
                    let ButtonEvent::Tap(state) = event;
                    tracing::info!("row {} tapped in {}", ix, state);
                    if let Some(row) = this.rows.get_mut(ix) {
                        row.apply(row.state.toggled(), cx);
                    }
                })
            })
            .collect();

        Self {
            button,
            rows,
            progress: *PROGRESS_RANGE.start(),
            stopped: false,
            stepper: None,
            tap_token: Some(tap_token),
            _subscriptions,
        }
    }

    fn on_button_tap(&mut self, state: ButtonState, cx: &mut Context<Self>) {
        match state {
            ButtonState::InProgress => {
                tracing::info!("suspend");
                self.stopped = true;
                self.stepper = None;
                self.button.update(cx, |button, cx| button.suspend(cx));
            }
            ButtonState::Completed => {
                tracing::info!("delete");
                self.progress = *PROGRESS_RANGE.start();
                self.button.update(cx, |button, cx| button.reset(cx));
            }
            ButtonState::Default => {
                tracing::info!("start");
                self.button.update(cx, |button, cx| {
                    button.resume(cx);
                    button.set_stroke_mode(StrokeMode::dashed(4., vec![3.94], 0.), cx);
                    button.set_progress(*PROGRESS_RANGE.end(), cx);
                });
                self.stopped = false;
                self.update_periodically(START_DELAY, cx);
            }
            ButtonState::Suspended => {
                tracing::info!("resume");
                self.button.update(cx, |button, cx| button.resume(cx));
                self.stopped = false;
                self.update_periodically(STEP_INTERVAL, cx);
            }
        }
        cx.notify();
    }

    fn update_periodically(&mut self, after: Duration, cx: &mut Context<Self>) {
        if self.stopped {
            return;
        }

        self.stepper = Some(cx.spawn(async move |this, cx| {
            Timer::after(after).await;
            _ = this.update(cx, |this, cx| this.step(cx));
        }));
    }

    fn step(&mut self, cx: &mut Context<Self>) {
        if self.stopped {
            return;
        }

        if self.progress < 99. {
            self.progress += 1.;
            let progress = self.progress;
            self.button.update(cx, |button, cx| {
                button.set_progress(progress, cx);
                button.set_stroke_mode(StrokeMode::border(4.), cx);
            });
            self.update_periodically(STEP_INTERVAL, cx);
        } else {
            self.stepper = None;
            self.button.update(cx, |button, cx| {
                button.set_stroke_mode(StrokeMode::border(0.), cx);
                button.complete(cx);
            });
        }
        cx.notify();
    }
}

impl Drop for DownloadsStory {
    fn drop(&mut self) {
        if let Some(token) = self.tap_token.take() {
            token.dispose();
        }
    }
}

impl Render for DownloadsStory {
    fn render(&mut self, _: &mut Window, _: &mut Context<Self>) -> impl IntoElement {
        div()
            .id("downloads-story")
            .size_full()
            .flex()
            .flex_col()
            .items_center()
            .gap_3()
            .p_4()
            .bg(rgb(0xFFFFFF))
            .text_color(rgb(0x333333))
            .overflow_y_scroll()
            .child(self.button.clone())
            .child(
                div()
                    .w_full()
                    .flex()
                    .flex_col()
                    .children(self.rows.iter().enumerate().map(|(ix, row)| {
                        div()
                            .flex()
                            .flex_row()
                            .items_center()
                            .justify_between()
                            .py_1()
                            .border_b_1()
                            .border_color(rgb(0xEEEEEE))
                            .child(format!("Item {}  {}", ix + 1, row.state))
                            .child(row.button.clone())
                    })),
            )
    }
}

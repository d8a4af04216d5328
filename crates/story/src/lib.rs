mod downloads_story;
mod item;

use anyhow::Result;
use circle_progress_button::{ButtonConfig, ButtonDefaults};
use gpui::{App, Bounds, WindowBounds, WindowOptions, px, size};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

pub use downloads_story::DownloadsStory;
pub use item::ItemState;

const BUTTON_CONFIG: &str = include_str!("../config/button.json");

pub fn init(cx: &mut App) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "circle_progress_button=debug,circle_progress_button_story=info",
                )
            }),
        )
        .init();

    circle_progress_button::init(cx);
    match ButtonConfig::from_json(BUTTON_CONFIG) {
        Ok(config) => ButtonDefaults::set(config, cx),
        Err(err) => tracing::error!("Failed to load button config: {:?}", err),
    }
}

pub fn open_window(cx: &mut App) -> Result<()> {
    let bounds = Bounds::centered(None, size(px(360.), px(640.)), cx);
    let window = cx.open_window(
        WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            ..Default::default()
        },
        |window, cx| DownloadsStory::view(window, cx),
    )?;

    window.update(cx, |_, window, _| {
        window.activate_window();
        window.set_window_title("Circle Progress Button");
    })?;
    Ok(())
}

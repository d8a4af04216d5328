use gpui::App;

pub mod animation;
pub mod config;
pub mod debug;
mod icon;
pub mod progress_button;
mod ring;
pub mod stroke;

pub use config::{ButtonConfig, ButtonDefaults};
pub use icon::ButtonIcon;
pub use progress_button::*;
pub use stroke::StrokeMode;

/// Install the global [`ButtonDefaults`], new buttons start from them.
pub fn init(cx: &mut App) {
    config::init(cx);
}

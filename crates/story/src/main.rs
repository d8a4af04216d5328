use circle_progress_button_assets::Assets;
use circle_progress_button_story::{init, open_window};
use gpui::Application;

fn main() {
    let app = Application::new().with_assets(Assets);

    app.run(move |cx| {
        init(cx);
        cx.activate(true);

        if let Err(err) = open_window(cx) {
            tracing::error!("Failed to open window: {:?}", err);
            cx.quit();
        }
    });
}

use anyhow::anyhow;
use gpui::{AssetSource, Result, SharedString};
use std::borrow::Cow;

/// The icons of the four button states, embedded in the binary.
///
/// ```rust,no_run
/// use gpui::*;
/// use circle_progress_button_assets::Assets;
///
/// let app = Application::new().with_assets(Assets);
/// ```
///
/// | Path | State |
/// |---|---|
/// | `icons/state0.svg` | default |
/// | `icons/state1.svg` | in progress |
/// | `icons/state2.svg` | suspended |
/// | `icons/completed.svg` | completed |
#[derive(rust_embed::RustEmbed)]
#[folder = "assets"]
#[include = "icons/**/*.svg"]
pub struct Assets;

impl AssetSource for Assets {
    fn load(&self, path: &str) -> Result<Option<Cow<'static, [u8]>>> {
        if path.is_empty() {
            return Ok(None);
        }

        Self::get(path)
            .map(|f| Some(f.data))
            .ok_or_else(|| anyhow!("could not find asset at path \"{path}\""))
    }

    fn list(&self, path: &str) -> Result<Vec<SharedString>> {
        Ok(Self::iter()
            .filter_map(|p| p.starts_with(path).then(|| p.into()))
            .collect())
    }
}

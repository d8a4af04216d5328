use gpui::{AnyElement, Hsla, IntoElement, SharedString, Styled, img, prelude::FluentBuilder as _, svg};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The icon shown on top of the progress ring.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ButtonIcon {
    /// An SVG asset path, tinted with the button icon color.
    Svg(SharedString),
    /// A raster image, loaded from a path or uri, drawn as is.
    Image(SharedString),
}

impl ButtonIcon {
    pub fn svg(path: impl Into<SharedString>) -> Self {
        Self::Svg(path.into())
    }

    pub fn image(source: impl Into<SharedString>) -> Self {
        Self::Image(source.into())
    }

    pub fn path(&self) -> &SharedString {
        match self {
            Self::Svg(path) | Self::Image(path) => path,
        }
    }

    /// Render the icon filling its parent.
    pub(crate) fn render(&self, tint: Option<Hsla>) -> AnyElement {
        match self {
            Self::Svg(path) => svg()
                .path(path.clone())
                .size_full()
                .when_some(tint, |this, color| this.text_color(color))
                .into_any_element(),
            Self::Image(source) => img(source.clone()).size_full().into_any_element(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_serde() {
        let icon: ButtonIcon = serde_json::from_str(r#"{"svg": "icons/state0.svg"}"#).unwrap();
        assert_eq!(icon, ButtonIcon::svg("icons/state0.svg"));
        assert_eq!(icon.path().as_ref(), "icons/state0.svg");
        assert_ne!(icon, ButtonIcon::image("icons/state0.svg"));
    }
}

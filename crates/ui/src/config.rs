use std::{fs, path::Path};

use anyhow::{Context as _, Result};
use gpui::{App, Global, Hsla, Rgba};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    animation::AnimationOptions,
    progress_button::{DEFAULT_TOUCHED_ALPHA, ProgressButtonModel, StateImages, StrokeColors},
    stroke::StrokeMode,
};

pub(crate) fn init(cx: &mut App) {
    cx.set_global(ButtonDefaults::default());
}

/// Settings of a button, loadable from JSON.
///
/// ```json
/// {
///   "in_progress_stroke_color": "#0044C3",
///   "suspended_stroke_color": "#8C8C8C",
///   "icon_color": "#A3A3A3",
///   "icons": { "default": { "svg": "icons/state0.svg" } },
///   "stroke_mode": { "type": "border", "width": 4 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ButtonConfig {
    /// Stroke color in the default and in progress states, e.g. `#0044C3`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_progress_stroke_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended_stroke_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_stroke_color: Option<String>,
    /// Tint of SVG icons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_color: Option<String>,
    pub icons: StateImages,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_mode: Option<StrokeMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub touched_alpha: Option<f32>,
    pub animations: AnimationConfig,
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AnimationConfig {
    /// Animate the progress ring.
    pub circle: bool,
    /// Bounce the icon on completion.
    pub icon_scale: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            circle: true,
            icon_scale: true,
        }
    }
}

impl AnimationConfig {
    pub fn options(&self) -> AnimationOptions {
        let mut options = AnimationOptions::empty();
        options.set(AnimationOptions::CIRCLE, self.circle);
        options.set(AnimationOptions::ICON_SCALE, self.icon_scale);
        options
    }
}

impl From<AnimationOptions> for AnimationConfig {
    fn from(options: AnimationOptions) -> Self {
        Self {
            circle: options.contains(AnimationOptions::CIRCLE),
            icon_scale: options.contains(AnimationOptions::ICON_SCALE),
        }
    }
}

impl ButtonConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse button config")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read button config {}", path.display()))?;
        Self::from_json(&json)
    }

    /// The settings of `model`, colors are written as hex strings.
    pub fn from_model(model: &ProgressButtonModel) -> Self {
        let colors = model.stroke_colors();
        Self {
            in_progress_stroke_color: colors.in_progress.map(hex),
            suspended_stroke_color: colors.suspended.map(hex),
            completed_stroke_color: colors.completed.map(hex),
            icon_color: model.icon_color().map(hex),
            icons: model.images().clone(),
            stroke_mode: Some(model.stroke_mode().clone()),
            touched_alpha: Some(model.touched_alpha()),
            animations: model.animation_options().into(),
            debug: model.is_debug_enabled(),
        }
    }

    /// Apply the settings to `model`.
    ///
    /// Invalid colors are skipped with a warning.
    pub fn apply(&self, model: &mut ProgressButtonModel) {
        model.set_stroke_colors(StrokeColors {
            in_progress: color_field("in_progress_stroke_color", &self.in_progress_stroke_color),
            suspended: color_field("suspended_stroke_color", &self.suspended_stroke_color),
            completed: color_field("completed_stroke_color", &self.completed_stroke_color),
        });
        model.set_icon_color(color_field("icon_color", &self.icon_color));
        model.set_images(self.icons.clone());
        model.set_stroke_mode(self.stroke_mode.clone().unwrap_or_default());
        model.set_touched_alpha(self.touched_alpha.unwrap_or(DEFAULT_TOUCHED_ALPHA));
        model.set_animation_options(self.animations.options());
        model.set_debug(self.debug);
    }

    /// The JSON schema of the config file.
    pub fn schema() -> schemars::Schema {
        schemars::schema_for!(ButtonConfig)
    }
}

fn color_field(name: &str, value: &Option<String>) -> Option<Hsla> {
    let value = value.as_deref()?;
    match parse_hex_color(value) {
        Ok(color) => Some(color),
        Err(err) => {
            tracing::warn!("ignored {}: {:?}", name, err);
            None
        }
    }
}

/// Parse `#RRGGBB`, `#RRGGBBAA`, `0xRRGGBB` or bare hex digits into a color.
///
/// The short `#RGB` and `#RGBA` forms are accepted as well.
pub fn parse_hex_color(value: &str) -> Result<Hsla> {
    let value = value.trim();
    let digits = value
        .strip_prefix('#')
        .or_else(|| value.strip_prefix("0x"))
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    let color = Rgba::try_from(format!("#{}", digits).as_str())
        .with_context(|| format!("invalid hex color {:?}", value))?;
    Ok(color.into())
}

/// Format a color as `#RRGGBB`, or `#RRGGBBAA` when it is not opaque.
pub fn hex(color: Hsla) -> String {
    let color = Rgba::from(color);
    let channel = |v: f32| (v.clamp(0., 1.) * 255.).round() as u8;
    let (r, g, b, a) = (
        channel(color.r),
        channel(color.g),
        channel(color.b),
        channel(color.a),
    );

    if a == u8::MAX {
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    } else {
        format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
    }
}

/// The config every new [`CircleProgressButton`](crate::CircleProgressButton) starts from.
#[derive(Debug, Clone, Default)]
pub struct ButtonDefaults {
    config: ButtonConfig,
}

impl Global for ButtonDefaults {}

impl ButtonDefaults {
    pub fn global(cx: &App) -> &Self {
        cx.global::<Self>()
    }

    pub fn config(&self) -> &ButtonConfig {
        &self.config
    }

    pub fn set(config: ButtonConfig, cx: &mut App) {
        cx.set_global(Self { config });
    }

    /// Load the defaults from a JSON file, on failure the current defaults are kept.
    pub fn load(path: impl AsRef<Path>, cx: &mut App) {
        match ButtonConfig::load(path) {
            Ok(config) => Self::set(config, cx),
            Err(err) => tracing::error!("Failed to load button defaults: {:?}", err),
        }
    }
}

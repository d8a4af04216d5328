use std::{fmt, ops::RangeInclusive};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The valid range of a button progress, in percent.
pub const PROGRESS_RANGE: RangeInclusive<f32> = 0.0..=100.0;

/// Display state of a [`CircleProgressButton`](super::CircleProgressButton).
///
/// The state is read-only from the outside, use `suspend`, `resume`,
/// `complete` and `reset` to move between states.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ButtonState {
    #[default]
    Default,
    InProgress,
    Suspended,
    Completed,
}

impl ButtonState {
    pub fn is_suspended(&self) -> bool {
        matches!(self, Self::Suspended)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::InProgress => "in_progress",
            Self::Suspended => "suspended",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ButtonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clamp a progress value into [`PROGRESS_RANGE`].
///
/// `NaN` is treated as the lower bound.
pub fn clamp_progress(value: f32) -> f32 {
    if value.is_nan() {
        return *PROGRESS_RANGE.start();
    }
    value.clamp(*PROGRESS_RANGE.start(), *PROGRESS_RANGE.end())
}

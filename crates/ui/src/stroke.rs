use std::f32::consts::{FRAC_PI_2, TAU};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Angle of the ring start, the top of the circle.
pub const START_ANGLE: f32 = -FRAC_PI_2;

/// Added to the ring radius so neighbour dashes and the pie edge do not leave hairline gaps.
const RADIUS_BIAS: f32 = 0.1;

/// Dash patterns repeating more often than this along the stroke are drawn solid.
const MAX_DASH_PERIODS: usize = 1024;

/// How the progress ring is drawn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrokeMode {
    /// A solid ring of the given width along the button border.
    Border { width: f32 },
    /// A dashed ring along the button border.
    ///
    /// - `pattern`: alternating dash and gap lengths, e.g. `[dash, gap, other_dash, other_gap]`.
    /// - `offset`: the dash phase, how far into the pattern the stroke starts.
    DashedBorder {
        width: f32,
        pattern: Vec<f32>,
        offset: f32,
    },
    /// The progress fills the button as a pie.
    #[default]
    Fill,
}

impl StrokeMode {
    pub fn border(width: f32) -> Self {
        Self::Border { width }
    }

    pub fn dashed(width: f32, pattern: impl Into<Vec<f32>>, offset: f32) -> Self {
        Self::DashedBorder {
            width,
            pattern: pattern.into(),
            offset,
        }
    }

    /// The user defined stroke width, `None` for [`StrokeMode::Fill`].
    pub fn border_width(&self) -> Option<f32> {
        match self {
            Self::Border { width } | Self::DashedBorder { width, .. } => Some(*width),
            Self::Fill => None,
        }
    }

    /// The dash pattern and phase, only for [`StrokeMode::DashedBorder`].
    pub fn dash(&self) -> Option<(&[f32], f32)> {
        match self {
            Self::DashedBorder {
                pattern, offset, ..
            } => Some((pattern.as_slice(), *offset)),
            _ => None,
        }
    }
}

/// Resolved geometry of the progress ring for a given button size.
#[derive(Debug, Clone, PartialEq)]
pub struct RingGeometry {
    pub radius: f32,
    pub line_width: f32,
    pub dash_pattern: SmallVec<[f32; 4]>,
    pub dash_phase: f32,
    /// Start of the stroke as a fraction of the full circle.
    pub stroke_start: f32,
    /// End of the stroke as a fraction of the full circle.
    pub stroke_end: f32,
}

impl RingGeometry {
    /// Build the ring geometry for a button of `diameter` px.
    ///
    /// `sweep` is the visible fraction of the circle, clamped into `0..=1`.
    pub fn new(diameter: f32, mode: &StrokeMode, sweep: f32) -> Self {
        let diameter = diameter.max(0.);
        let (radius, line_width) = match mode.border_width() {
            Some(width) => (diameter / 2. - width / 2. + RADIUS_BIAS, width),
            None => (diameter / 4. + RADIUS_BIAS, diameter / 2.),
        };
        let (dash_pattern, dash_phase) = match mode.dash() {
            Some((pattern, offset)) => (pattern.iter().copied().collect(), offset),
            None => (SmallVec::new(), 0.),
        };

        Self {
            radius,
            line_width,
            dash_pattern,
            dash_phase,
            stroke_start: 0.,
            stroke_end: if sweep.is_nan() { 0. } else { sweep.clamp(0., 1.) },
        }
    }

    pub fn circumference(&self) -> f32 {
        TAU * self.radius
    }

    /// The fraction of the circle between stroke start and end.
    pub fn sweep(&self) -> f32 {
        (self.stroke_end - self.stroke_start).max(0.)
    }

    /// Returns the visible parts of the stroke as `(start, end)` fractions of the circle.
    ///
    /// A solid stroke yields a single segment, a dashed one yields one segment per dash.
    pub fn segments(&self) -> SmallVec<[(f32, f32); 8]> {
        let mut segments = SmallVec::new();
        if self.sweep() <= 0. || self.line_width <= 0. || self.radius <= 0. {
            return segments;
        }

        let pattern: SmallVec<[f32; 4]> = self
            .dash_pattern
            .iter()
            .map(|v| if v.is_finite() { v.max(0.) } else { 0. })
            .collect();
        let sum: f32 = pattern.iter().sum();
        if pattern.is_empty() || sum <= 0. {
            segments.push((self.stroke_start, self.stroke_end));
            return segments;
        }

        // Odd patterns repeat with the on/off parity swapped.
        let (period, on) = if pattern.len() % 2 == 1 {
            (sum * 2., sum)
        } else {
            (sum, pattern.iter().step_by(2).sum::<f32>())
        };
        if on <= 0. {
            return segments;
        }

        let length = self.circumference();
        let from = self.stroke_start * length;
        let to = self.stroke_end * length;
        if on >= period || to / period > MAX_DASH_PERIODS as f32 {
            // Gapless, or finer than can be drawn.
            segments.push((self.stroke_start, self.stroke_end));
            return segments;
        }

        let phase = if self.dash_phase.is_finite() {
            self.dash_phase.rem_euclid(period)
        } else {
            0.
        };
        let mut cursor = -phase;
        let max_steps = (MAX_DASH_PERIODS + 2) * 2 * pattern.len();
        let mut index = 0;
        while cursor < to && index < max_steps {
            let dash = pattern[index % pattern.len()];
            if index % 2 == 0 {
                let start = cursor.max(from);
                let end = (cursor + dash).min(to);
                if end > start {
                    segments.push((start / length, end / length));
                }
            }
            cursor += dash;
            index += 1;
        }

        segments
    }
}

/// The angle, in radians, of a point at `fraction` of the ring, clockwise from the top.
pub fn angle_at(fraction: f32) -> f32 {
    START_ANGLE + fraction * TAU
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn assert_segments(actual: &[(f32, f32)], expected: &[(f32, f32)]) {
        assert_eq!(actual.len(), expected.len(), "{:?}", actual);
        for (a, e) in actual.iter().zip(expected) {
            assert!(
                approx_eq(a.0, e.0) && approx_eq(a.1, e.1),
                "{:?} != {:?}",
                actual,
                expected
            );
        }
    }

    /// A ring whose circumference is exactly 100 units.
    fn ring(pattern: &[f32], phase: f32, sweep: f32) -> RingGeometry {
        RingGeometry {
            radius: 50. / PI,
            line_width: 4.,
            dash_pattern: pattern.iter().copied().collect(),
            dash_phase: phase,
            stroke_start: 0.,
            stroke_end: sweep,
        }
    }

    #[test]
    fn test_border_geometry() {
        let geometry = RingGeometry::new(44., &StrokeMode::border(4.), 0.42);
        assert!(approx_eq(geometry.radius, 20.1));
        assert_eq!(geometry.line_width, 4.);
        assert!(geometry.dash_pattern.is_empty());
        assert_eq!(geometry.stroke_start, 0.);
        assert_eq!(geometry.stroke_end, 0.42);
    }

    #[test]
    fn test_fill_geometry() {
        let geometry = RingGeometry::new(44., &StrokeMode::Fill, 1.);
        assert!(approx_eq(geometry.radius, 11.1));
        assert_eq!(geometry.line_width, 22.);
        assert_eq!(geometry.sweep(), 1.);
    }

    #[test]
    fn test_dashed_geometry() {
        let geometry = RingGeometry::new(44., &StrokeMode::dashed(4., vec![3.94], 1.5), 0.5);
        assert_eq!(geometry.line_width, 4.);
        assert_eq!(geometry.dash_pattern.as_slice(), &[3.94]);
        assert_eq!(geometry.dash_phase, 1.5);
    }

    #[test]
    fn test_sweep_is_clamped() {
        assert_eq!(RingGeometry::new(44., &StrokeMode::Fill, 1.4).stroke_end, 1.);
        assert_eq!(RingGeometry::new(44., &StrokeMode::Fill, -0.2).stroke_end, 0.);
        assert_eq!(RingGeometry::new(44., &StrokeMode::Fill, f32::NAN).stroke_end, 0.);
    }

    #[test]
    fn test_solid_segments() {
        assert_segments(&ring(&[], 0., 0.42).segments(), &[(0., 0.42)]);
        assert!(ring(&[], 0., 0.).segments().is_empty());

        let zero_width = RingGeometry::new(44., &StrokeMode::border(0.), 1.);
        assert!(zero_width.segments().is_empty());
    }

    #[test]
    fn test_dash_segments() {
        assert_segments(
            &ring(&[10., 5.], 0., 0.5).segments(),
            &[(0., 0.1), (0.15, 0.25), (0.3, 0.4), (0.45, 0.5)],
        );
    }

    #[test]
    fn test_dash_phase() {
        assert_segments(
            &ring(&[10., 5.], 5., 0.5).segments(),
            &[(0., 0.05), (0.1, 0.2), (0.25, 0.35), (0.4, 0.5)],
        );
    }

    #[test]
    fn test_odd_dash_pattern() {
        assert_segments(
            &ring(&[10.], 0., 0.5).segments(),
            &[(0., 0.1), (0.2, 0.3), (0.4, 0.5)],
        );
    }

    #[test]
    fn test_degenerate_dash_pattern_is_solid() {
        assert_segments(&ring(&[0., 0.], 0., 0.3).segments(), &[(0., 0.3)]);
        assert_segments(&ring(&[-2.], 0., 0.3).segments(), &[(0., 0.3)]);
    }

    #[test]
    fn test_invisible_dashes_terminate() {
        let geometry = RingGeometry::new(44., &StrokeMode::dashed(4., vec![0., 1e-6], 0.), 1.);
        assert!(geometry.segments().is_empty());

        let geometry = RingGeometry::new(44., &StrokeMode::dashed(4., vec![0., 5.], 0.), 1.);
        assert!(geometry.segments().is_empty());
    }

    #[test]
    fn test_too_fine_dashes_are_solid() {
        let geometry = RingGeometry::new(44., &StrokeMode::dashed(4., vec![1e-6, 1e-6], 0.), 0.5);
        assert_segments(&geometry.segments(), &[(0., 0.5)]);

        // No gaps.
        assert_segments(&ring(&[10., 0.], 0., 0.5).segments(), &[(0., 0.5)]);
    }

    #[test]
    fn test_non_finite_dash_values() {
        assert_segments(
            &ring(&[10., 5.], f32::NAN, 0.5).segments(),
            &ring(&[10., 5.], 0., 0.5).segments(),
        );
        assert_segments(
            &ring(&[10., 5.], f32::INFINITY, 0.5).segments(),
            &ring(&[10., 5.], 0., 0.5).segments(),
        );
        assert_segments(&ring(&[f32::NAN, 5.], 0., 0.5).segments(), &[]);
        assert_segments(&ring(&[f32::INFINITY], 0., 0.5).segments(), &[(0., 0.5)]);
    }

    #[test]
    fn test_dash_segments_are_bounded() {
        let segments = ring(&[0.1, 0.0001], 0., 1.).segments();
        assert!(segments.len() <= (MAX_DASH_PERIODS + 2) * 2);
    }

    #[test]
    fn test_angle_at() {
        assert!(approx_eq(angle_at(0.), -FRAC_PI_2));
        assert!(approx_eq(angle_at(0.25), 0.));
        assert!(approx_eq(angle_at(1.), 3. * FRAC_PI_2));
    }

    #[test]
    fn test_stroke_mode_serde() {
        let mode: StrokeMode =
            serde_json::from_str(r#"{"type": "dashed_border", "width": 4, "pattern": [3.94], "offset": 0}"#)
                .unwrap();
        assert_eq!(mode, StrokeMode::dashed(4., vec![3.94], 0.));

        let mode: StrokeMode = serde_json::from_str(r#"{"type": "fill"}"#).unwrap();
        assert_eq!(mode, StrokeMode::Fill);
        assert_eq!(StrokeMode::default(), StrokeMode::Fill);
    }
}

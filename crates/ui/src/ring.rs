use std::f32::consts::PI;

use gpui::{Bounds, Hsla, Path, PathBuilder, Pixels, Point, Window, point, px};

use crate::stroke::{RingGeometry, angle_at};

/// Max angle covered by one line of an arc polyline.
const MAX_ARC_STEP: f32 = PI / 90.;

/// Points of the arc between the `start` and `end` fractions of the circle, relative to its center.
pub fn arc_points(radius: f32, start: f32, end: f32) -> Vec<(f32, f32)> {
    let from = angle_at(start);
    let to = angle_at(end);
    let steps = ((to - from).abs() / MAX_ARC_STEP).ceil().max(1.) as usize;

    (0..=steps)
        .map(|i| {
            let angle = from + (to - from) * i as f32 / steps as f32;
            (radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

fn build_arc(
    center: Point<Pixels>,
    geometry: &RingGeometry,
    start: f32,
    end: f32,
) -> Option<Path<Pixels>> {
    let mut points = arc_points(geometry.radius, start, end)
        .into_iter()
        .map(|(x, y)| point(center.x + px(x), center.y + px(y)));

    let mut builder = PathBuilder::stroke(px(geometry.line_width));
    builder.move_to(points.next()?);
    for point in points {
        builder.line_to(point);
    }
    builder.build().ok()
}

/// Paint the visible segments of `geometry` centered in `bounds`.
pub fn paint_ring(geometry: &RingGeometry, bounds: Bounds<Pixels>, color: Hsla, window: &mut Window) {
    if color.a <= 0. {
        return;
    }

    let center = bounds.center();
    for (start, end) in geometry.segments() {
        if let Some(path) = build_arc(center, geometry, start, end) {
            window.paint_path(path, color);
        }
    }
}

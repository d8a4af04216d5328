use std::{
    panic::{self, AssertUnwindSafe},
    time::Duration,
};

use bitflags::bitflags;

bitflags! {
    /// Which animations a button is allowed to run.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AnimationOptions: u8 {
        /// Implicit animation of the progress ring.
        const CIRCLE = 1 << 0;
        /// Icon bounce on `complete()`.
        const ICON_SCALE = 1 << 1;
    }
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self::all()
    }
}

/// Duration of the implicit ring animation.
pub const IMPLICIT_DURATION: Duration = Duration::from_millis(250);

/// Easing of the implicit ring animation.
pub fn implicit_easing() -> impl Fn(f32) -> f32 {
    cubic_bezier(0.25, 0.1, 0.25, 1.)
}

/// Something owning a set of [`AnimationOptions`].
pub(crate) trait AnimationTarget {
    fn animation_options_mut(&mut self) -> &mut AnimationOptions;
}

/// Run `f` with `options` swapped in, the previous options are restored afterwards, also when
/// `f` panics.
pub(crate) fn animate_scoped<T: AnimationTarget, R>(
    target: &mut T,
    options: AnimationOptions,
    f: impl FnOnce(&mut T) -> R,
) -> R {
    let previous = std::mem::replace(target.animation_options_mut(), options);
    let result = panic::catch_unwind(AssertUnwindSafe(|| f(target)));
    *target.animation_options_mut() = previous;

    match result {
        Ok(value) => value,
        Err(payload) => panic::resume_unwind(payload),
    }
}

/// Icon bounce: scale up to [`ICON_SCALE_PEAK`] ...
pub const ICON_SCALE_UP_DURATION: Duration = Duration::from_millis(200);
/// ... then settle back to the identity.
pub const ICON_SETTLE_DURATION: Duration = Duration::from_millis(100);
pub const ICON_SCALE_PEAK: f32 = 1.3;

/// Total duration of the icon bounce.
pub fn icon_bounce_duration() -> Duration {
    ICON_SCALE_UP_DURATION + ICON_SETTLE_DURATION
}

/// The icon scale at `delta` (`0..=1`) of the bounce.
pub fn icon_scale_at(delta: f32) -> f32 {
    let total = icon_bounce_duration().as_secs_f32();
    let split = ICON_SCALE_UP_DURATION.as_secs_f32() / total;
    let delta = delta.clamp(0., 1.);

    if delta < split {
        // Critically damped spring, close enough to an ease-out.
        let t = ease_out(delta / split);
        1. + (ICON_SCALE_PEAK - 1.) * t
    } else {
        let t = (delta - split) / (1. - split);
        ICON_SCALE_PEAK - (ICON_SCALE_PEAK - 1.) * t
    }
}

/// Interpolate between `from` and `to`.
pub fn lerp(from: f32, to: f32, delta: f32) -> f32 {
    from + (to - from) * delta
}

fn ease_out(t: f32) -> f32 {
    1. - (1. - t) * (1. - t)
}

/// A cubic bezier easing function, same as the CSS `cubic-bezier(x1, y1, x2, y2)`.
pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> impl Fn(f32) -> f32 {
    move |t: f32| {
        let t = t.clamp(0., 1.);

        // Solve x(s) = t for s with Newton's method, fallback to bisection.
        let sample = |a1: f32, a2: f32, s: f32| {
            let inv = 1. - s;
            3. * inv * inv * s * a1 + 3. * inv * s * s * a2 + s * s * s
        };
        let slope = |a1: f32, a2: f32, s: f32| {
            let inv = 1. - s;
            3. * inv * inv * a1 + 6. * inv * s * (a2 - a1) + 3. * s * s * (1. - a2)
        };

        let mut s = t;
        for _ in 0..8 {
            let dx = sample(x1, x2, s) - t;
            if dx.abs() < 1e-5 {
                return sample(y1, y2, s);
            }
            let d = slope(x1, x2, s);
            if d.abs() < 1e-6 {
                break;
            }
            s -= dx / d;
        }

        let (mut lo, mut hi) = (0., 1.);
        s = t;
        for _ in 0..32 {
            let x = sample(x1, x2, s);
            if (x - t).abs() < 1e-5 {
                break;
            }
            if x < t {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.;
        }
        sample(y1, y2, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_default_options() {
        let options = AnimationOptions::default();
        assert!(options.contains(AnimationOptions::CIRCLE));
        assert!(options.contains(AnimationOptions::ICON_SCALE));
        assert!(!AnimationOptions::empty().contains(AnimationOptions::CIRCLE));
    }

    #[test]
    fn test_icon_scale_keyframes() {
        assert!(approx_eq(icon_scale_at(0.), 1.));
        assert!(approx_eq(icon_scale_at(2. / 3.), ICON_SCALE_PEAK));
        assert!(approx_eq(icon_scale_at(1.), 1.));
        assert!(icon_scale_at(0.3) > 1. && icon_scale_at(0.3) < ICON_SCALE_PEAK);
        assert!(icon_scale_at(0.9) < ICON_SCALE_PEAK);
        assert_eq!(icon_bounce_duration(), Duration::from_millis(300));
    }

    struct Options(AnimationOptions);

    impl AnimationTarget for Options {
        fn animation_options_mut(&mut self) -> &mut AnimationOptions {
            &mut self.0
        }
    }

    #[test]
    fn test_animate_scoped() {
        let mut target = Options(AnimationOptions::all());
        let seen = animate_scoped(&mut target, AnimationOptions::CIRCLE, |target| target.0);
        assert_eq!(seen, AnimationOptions::CIRCLE);
        assert_eq!(target.0, AnimationOptions::all());

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            animate_scoped(&mut target, AnimationOptions::empty(), |_| panic!("boom"));
        }));
        assert!(result.is_err());
        assert_eq!(target.0, AnimationOptions::all());
    }

    #[test]
    fn test_implicit_easing() {
        let ease = implicit_easing();
        assert!(approx_eq(ease(0.), 0.));
        assert!(approx_eq(ease(1.), 1.));
        assert!(ease(0.5) > 0.5);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.2, 0.6, 0.), 0.2);
        assert!(approx_eq(lerp(0.2, 0.6, 0.5), 0.4));
        assert_eq!(lerp(0.2, 0.6, 1.), 0.6);
    }

    #[test]
    fn test_cubic_bezier() {
        let linear = cubic_bezier(0., 0., 1., 1.);
        assert!(approx_eq(linear(0.5), 0.5));

        let ease = cubic_bezier(0.4, 0., 0.2, 1.);
        assert!(approx_eq(ease(0.), 0.));
        assert!(approx_eq(ease(1.), 1.));
        assert!(ease(0.5) > 0.5);
    }
}

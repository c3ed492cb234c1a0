//! Easing curves
//!
//! Maps linear progress `t` in `0.0..=1.0` to eased progress. Every curve
//! returns exactly `0.0` at `t = 0` and `1.0` at `t = 1`.

/// Easing function applied to timed animations
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    Linear,
    /// CSS `ease`: cubic-bezier(0.25, 0.1, 0.25, 1.0)
    Ease,
    /// CSS `ease-in`: cubic-bezier(0.42, 0, 1, 1)
    EaseIn,
    /// CSS `ease-out`: cubic-bezier(0, 0, 0.58, 1)
    EaseOut,
    /// CSS `ease-in-out`: cubic-bezier(0.42, 0, 0.58, 1)
    EaseInOut,
    /// `ease-in` compressed into the first half and point-mirrored into the
    /// second; steeper through the middle than [`Easing::EaseInOut`]
    MirroredEaseIn,
    EaseInQuad,
    EaseOutQuad,
    /// Default curve for timed animations
    #[default]
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    /// Arbitrary cubic bézier with control points (x1, y1, x2, y2)
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Apply the curve to linear progress `t`
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match *self {
            Easing::Linear => t,
            Easing::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Easing::MirroredEaseIn => {
                if t < 0.5 {
                    cubic_bezier(0.42, 0.0, 1.0, 1.0, 2.0 * t) * 0.5
                } else {
                    1.0 - cubic_bezier(0.42, 0.0, 1.0, 1.0, 2.0 * (1.0 - t)) * 0.5
                }
            }
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => t * (2.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = 2.0 * t - 2.0;
                    0.5 * u * u * u + 1.0
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(x1, y1, x2, y2, t),
        }
    }
}

/// Evaluate a CSS-style cubic bézier timing curve at x = `t`
///
/// Solves for the curve parameter with Newton-Raphson, falling back to
/// bisection when the slope is too flat.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    // Polynomial coefficients for B(s) = ((a*s + b)*s + c)*s
    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;
    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    let sample_x = |s: f32| ((ax * s + bx) * s + cx) * s;
    let sample_y = |s: f32| ((ay * s + by) * s + cy) * s;
    let slope_x = |s: f32| (3.0 * ax * s + 2.0 * bx) * s + cx;

    const EPSILON: f32 = 1e-6;

    let mut s = t;
    for _ in 0..8 {
        let error = sample_x(s) - t;
        if error.abs() < EPSILON {
            return sample_y(s);
        }
        let slope = slope_x(s);
        if slope.abs() < EPSILON {
            break;
        }
        s -= error / slope;
    }

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    s = t;
    for _ in 0..32 {
        let x = sample_x(s);
        if (x - t).abs() < EPSILON {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) * 0.5;
    }
    sample_y(s)
}

//! Easing curves for fixed-duration animations.

use serde::{Deserialize, Serialize};

/// Easing function for timing animations.
///
/// The input `t` is the linear progress of the animation from 0.0 to 1.0 and
/// the output is the eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing)
    Linear,
    /// Slow start, fast end
    EaseInCubic,
    /// Fast start, slow end. Used for card exits.
    #[default]
    EaseOutCubic,
    /// Slow start and end, fast middle
    EaseInOutCubic,
    /// Custom cubic bezier curve with control points (CSS-style)
    ///
    /// The four values are the x1, y1, x2, y2 control points of the curve.
    #[serde(rename = "cubic-bezier")]
    CubicBezier(f32, f32, f32, f32),
}

impl EasingFunction {
    /// Apply the easing function to a progress value.
    pub fn ease(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::EaseInCubic => t * t * t,
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
        }
    }

    /// CSS `ease-out` preset.
    pub fn css_ease_out() -> Self {
        Self::CubicBezier(0.0, 0.0, 0.58, 1.0)
    }
}

/// Solve the bezier for `t` at the given `x` with Newton-Raphson, then evaluate `y`.
fn cubic_bezier_ease(x: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let mut t = x;
    for _ in 0..8 {
        let dx = x - cubic_bezier(t, x1, x2);
        if dx.abs() < 1e-6 {
            break;
        }
        let derivative = cubic_bezier_derivative(t, x1, x2);
        if derivative.abs() < 1e-6 {
            break;
        }
        t = (t + dx / derivative).clamp(0.0, 1.0);
    }

    cubic_bezier(t, y1, y2)
}

// B(t) = 3(1-t)²t·P1 + 3(1-t)t²·P2 + t³ with P0 = 0 and P3 = 1
fn cubic_bezier(t: f32, p1: f32, p2: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

fn cubic_bezier_derivative(t: f32, p1: f32, p2: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

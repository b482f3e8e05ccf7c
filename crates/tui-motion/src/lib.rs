//! # tui-motion
//!
//! Animation primitives for memor's card interactions.
//!
//! ## Building blocks
//!
//! - [`EasingFunction`] - Shapes the progress of fixed-duration animations
//! - [`Timing`] - Interpolates between two values over a duration
//! - [`Spring`] - Damped spring integrator that carries velocity across retargets
//! - [`AnimatedValue`] - A scalar that is either at rest or driven by a timing or spring
//! - [`FrameClock`] - Produces bounded frame deltas from a monotonic clock
//! - [`MotionConfig`] - Durations, spring constants and speed settings loaded from TOML
//!
//! ## Architecture
//!
//! Nothing in this crate owns a timer or a callback. Callers advance values
//! explicitly with [`AnimatedValue::tick`] and read completion from its return
//! value, so the owner decides on which thread completions are handled.

mod clock;
mod config;
mod easing;
mod spring;
mod timing;
mod value;

pub use clock::FrameClock;
pub use config::{MotionConfig, SpringConfig};
pub use easing::EasingFunction;
pub use spring::Spring;
pub use timing::Timing;
pub use value::AnimatedValue;

/// Linearly map `value` from the input range onto the output range, clamping at both ends.
pub fn interpolate_clamped(value: f32, input: (f32, f32), output: (f32, f32)) -> f32 {
    let (in_lo, in_hi) = input;
    let (out_lo, out_hi) = output;
    if (in_hi - in_lo).abs() < f32::EPSILON {
        return if value < in_lo { out_lo } else { out_hi };
    }
    let t = ((value - in_lo) / (in_hi - in_lo)).clamp(0.0, 1.0);
    out_lo + (out_hi - out_lo) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_clamps() {
        assert_eq!(interpolate_clamped(-10.0, (0.0, 150.0), (0.0, 1.0)), 0.0);
        assert_eq!(interpolate_clamped(300.0, (0.0, 150.0), (0.0, 1.0)), 1.0);
        assert!((interpolate_clamped(75.0, (0.0, 150.0), (0.8, 1.1)) - 0.95).abs() < 1e-5);
    }

    #[test]
    fn test_interpolate_descending_output() {
        assert!((interpolate_clamped(25.0, (0.0, 50.0), (1.0, 0.0)) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_interpolate_degenerate_range() {
        assert_eq!(interpolate_clamped(1.0, (5.0, 5.0), (0.0, 1.0)), 0.0);
        assert_eq!(interpolate_clamped(9.0, (5.0, 5.0), (0.0, 1.0)), 1.0);
    }
}

//! Fixed-duration interpolation.

use crate::easing::EasingFunction;
use std::time::Duration;

/// A fixed-duration animation between two values.
#[derive(Debug, Clone)]
pub struct Timing {
    /// Starting value
    pub from: f32,
    /// Target value
    pub to: f32,
    /// Total duration
    pub duration: Duration,
    /// Time elapsed so far, never past `duration`
    pub elapsed: Duration,
    /// Easing function
    pub easing: EasingFunction,
}

impl Timing {
    /// Create a new timing animation.
    pub fn new(from: f32, to: f32, duration: Duration, easing: EasingFunction) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing,
        }
    }

    /// Advance by `dt` and return the current value.
    pub fn update(&mut self, dt: Duration) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.current_value()
    }

    /// Get the current value without advancing.
    pub fn current_value(&self) -> f32 {
        if self.duration.is_zero() {
            return self.to;
        }

        let progress = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.from + (self.to - self.from) * self.easing.ease(progress)
    }

    /// Check if the animation is complete.
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }
}

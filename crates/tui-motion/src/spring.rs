//! Damped spring integration.

use crate::config::SpringConfig;
use std::time::Duration;

/// Largest integration step. Frame deltas are split into steps of at most this size.
const MAX_STEP_SECS: f32 = 1.0 / 240.0;

/// A mass on a damped spring pulled toward `target`.
#[derive(Debug, Clone)]
pub struct Spring {
    /// Current position
    pub position: f32,
    /// Current velocity in units per second
    pub velocity: f32,
    /// Rest position
    pub target: f32,
    /// Physical constants
    pub config: SpringConfig,
    settled: bool,
}

impl Spring {
    /// Create a spring at `from` moving with `velocity` toward `target`.
    pub fn new(from: f32, velocity: f32, target: f32, config: SpringConfig) -> Self {
        let mut spring = Self {
            position: from,
            velocity,
            target,
            config,
            settled: false,
        };
        spring.settle_if_at_rest();
        spring
    }

    /// Advance the simulation by `dt` and return the new position.
    pub fn update(&mut self, dt: Duration) -> f32 {
        if self.settled {
            return self.position;
        }

        let mut remaining = dt.as_secs_f32();
        while remaining > 0.0 && !self.settled {
            let step = remaining.min(MAX_STEP_SECS);
            remaining -= step;

            // Semi-implicit Euler: velocity first, then position with the new velocity.
            let displacement = self.position - self.target;
            let force = -self.config.stiffness * displacement - self.config.damping * self.velocity;
            self.velocity += force / self.config.mass * step;
            self.position += self.velocity * step;

            self.settle_if_at_rest();
        }

        self.position
    }

    /// Check whether the spring has come to rest at its target.
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    fn settle_if_at_rest(&mut self) {
        let near = (self.position - self.target).abs() <= self.config.rest_displacement;
        let slow = self.velocity.abs() <= self.config.rest_speed;
        if near && slow {
            self.position = self.target;
            self.velocity = 0.0;
            self.settled = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run_until_settled(spring: &mut Spring, limit: Duration) -> Duration {
        let frame = Duration::from_millis(16);
        let mut elapsed = Duration::ZERO;
        while !spring.is_settled() && elapsed < limit {
            spring.update(frame);
            elapsed += frame;
        }
        elapsed
    }

    #[test]
    fn test_spring_settles_at_target() {
        let mut spring = Spring::new(120.0, 0.0, 0.0, SpringConfig::spring_back());
        let elapsed = run_until_settled(&mut spring, Duration::from_secs(3));
        assert!(spring.is_settled());
        assert_eq!(spring.position, 0.0);
        assert!(elapsed < Duration::from_secs(2));
    }

    #[test]
    fn test_already_at_rest() {
        let spring = Spring::new(1.0, 0.0, 1.0, SpringConfig::flip());
        assert!(spring.is_settled());
    }

    #[test]
    fn test_initial_velocity_carries() {
        // Moving away from the target first, it still has to come back.
        let mut spring = Spring::new(0.0, 500.0, 0.0, SpringConfig::spring_back());
        spring.update(Duration::from_millis(16));
        assert!(spring.position > 0.0);
        run_until_settled(&mut spring, Duration::from_secs(3));
        assert_eq!(spring.position, 0.0);
    }

    #[test]
    fn test_large_dt_is_stable() {
        let mut spring = Spring::new(300.0, 0.0, 0.0, SpringConfig::spring_back());
        spring.update(Duration::from_secs(5));
        assert!(spring.is_settled());
        assert_eq!(spring.position, 0.0);
    }

    proptest! {
        #[test]
        fn prop_spring_back_converges(from in -2000.0f32..2000.0, velocity in -3000.0f32..3000.0) {
            let mut spring = Spring::new(from, velocity, 0.0, SpringConfig::spring_back());
            run_until_settled(&mut spring, Duration::from_secs(10));
            prop_assert!(spring.is_settled());
            prop_assert_eq!(spring.position, 0.0);
        }
    }
}

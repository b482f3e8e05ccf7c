//! A scalar that can be set directly or driven by an animation.

use crate::config::SpringConfig;
use crate::easing::EasingFunction;
use crate::spring::Spring;
use crate::timing::Timing;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Driver {
    Timing(Timing),
    Spring(Spring),
}

/// An animatable scalar.
///
/// Starting a new animation always begins from the currently interpolated
/// value and replaces any running one; there is no queue.
#[derive(Debug, Clone, Default)]
pub struct AnimatedValue {
    value: f32,
    driver: Option<Driver>,
}

impl AnimatedValue {
    /// Create a value at rest.
    pub fn new(value: f32) -> Self {
        Self { value, driver: None }
    }

    /// Current value.
    pub fn get(&self) -> f32 {
        self.value
    }

    /// Set the value immediately, cancelling any running animation.
    pub fn set(&mut self, value: f32) {
        self.value = value;
        self.driver = None;
    }

    /// Freeze at the current value.
    pub fn stop(&mut self) {
        self.driver = None;
    }

    /// Where the value is heading: the animation target, or the value itself when at rest.
    pub fn target(&self) -> f32 {
        match &self.driver {
            Some(Driver::Timing(t)) => t.to,
            Some(Driver::Spring(s)) => s.target,
            None => self.value,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.driver.is_some()
    }

    /// Animate to `target` over `duration` along `easing`.
    pub fn timing_to(&mut self, target: f32, duration: Duration, easing: EasingFunction) {
        self.driver = Some(Driver::Timing(Timing::new(self.value, target, duration, easing)));
    }

    /// Spring to `target`. A running spring hands its velocity to the new one.
    pub fn spring_to(&mut self, target: f32, config: SpringConfig) {
        let velocity = match &self.driver {
            Some(Driver::Spring(s)) => s.velocity,
            _ => 0.0,
        };
        self.driver = Some(Driver::Spring(Spring::new(self.value, velocity, target, config)));
    }

    /// Reach `target` on the next tick, still reporting completion then.
    pub fn jump_to(&mut self, target: f32) {
        self.timing_to(target, Duration::ZERO, EasingFunction::Linear);
    }

    /// Advance the running animation by `dt`.
    ///
    /// Returns `true` exactly once, on the tick where the animation finishes.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let Some(driver) = &mut self.driver else {
            return false;
        };

        let finished = match driver {
            Driver::Timing(timing) => {
                self.value = timing.update(dt);
                timing.is_complete()
            }
            Driver::Spring(spring) => {
                self.value = spring.update(dt);
                spring.is_settled()
            }
        };

        if finished {
            self.driver = None;
        }
        finished
    }
}

//! Motion configuration.

use crate::easing::EasingFunction;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Physical constants of a spring animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    #[serde(default = "default_damping")]
    pub damping: f32,
    #[serde(default = "default_stiffness")]
    pub stiffness: f32,
    #[serde(default = "default_mass")]
    pub mass: f32,
    /// Distance from the target below which the spring may come to rest
    #[serde(default = "default_rest_displacement")]
    pub rest_displacement: f32,
    /// Speed below which the spring may come to rest
    #[serde(default = "default_rest_speed")]
    pub rest_speed: f32,
}

fn default_damping() -> f32 { 25.0 }
fn default_stiffness() -> f32 { 250.0 }
fn default_mass() -> f32 { 0.8 }
fn default_rest_displacement() -> f32 { 0.01 }
fn default_rest_speed() -> f32 { 2.0 }

impl Default for SpringConfig {
    fn default() -> Self {
        Self::spring_back()
    }
}

impl SpringConfig {
    /// Spring used to return a cancelled card to rest.
    pub fn spring_back() -> Self {
        Self {
            damping: 25.0,
            stiffness: 250.0,
            mass: 0.8,
            rest_displacement: 0.01,
            rest_speed: 2.0,
        }
    }

    /// Spring used to turn the card between its faces.
    pub fn flip() -> Self {
        Self {
            damping: 20.0,
            stiffness: 180.0,
            mass: 0.8,
            rest_displacement: 0.001,
            rest_speed: 0.01,
        }
    }

    /// Spring used to move preview cards forward in the stack.
    pub fn stack() -> Self {
        Self {
            damping: 22.0,
            stiffness: 300.0,
            mass: 1.0,
            rest_displacement: 0.001,
            rest_speed: 0.01,
        }
    }
}

/// Motion timing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Duration of the off-screen exit after a committed swipe
    #[serde(default = "default_exit_duration", with = "duration_ms")]
    pub exit_duration: Duration,
    /// Easing of the exit animation
    #[serde(default)]
    pub exit_easing: EasingFunction,
    /// Exit target as a multiple of the viewport dimension
    #[serde(default = "default_exit_distance_factor")]
    pub exit_distance_factor: f32,
    /// Whether animations are enabled. When disabled every animation completes on the next frame.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Speed multiplier (1.0 = normal, 2.0 = twice as fast)
    #[serde(default = "default_one")]
    pub speed_multiplier: f32,
    #[serde(default = "SpringConfig::spring_back")]
    pub spring_back: SpringConfig,
    #[serde(default = "SpringConfig::flip")]
    pub flip: SpringConfig,
    #[serde(default = "SpringConfig::stack")]
    pub stack: SpringConfig,
}

fn default_exit_duration() -> Duration { Duration::from_millis(400) }
fn default_exit_distance_factor() -> f32 { 1.3 }
fn default_true() -> bool { true }
fn default_one() -> f32 { 1.0 }

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            exit_duration: default_exit_duration(),
            exit_easing: EasingFunction::EaseOutCubic,
            exit_distance_factor: default_exit_distance_factor(),
            enabled: true,
            speed_multiplier: 1.0,
            spring_back: SpringConfig::spring_back(),
            flip: SpringConfig::flip(),
            stack: SpringConfig::stack(),
        }
    }
}

impl MotionConfig {
    /// Accepted bounds of `speed_multiplier`.
    pub const SPEED_RANGE: (f32, f32) = (0.1, 10.0);

    /// Create a config with animations disabled.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Create a config with reduced motion (slower, simpler animations).
    pub fn reduced_motion() -> Self {
        Self {
            exit_easing: EasingFunction::Linear,
            speed_multiplier: 0.5,
            ..Default::default()
        }
    }

    /// Scale a wall-clock frame delta into animation time.
    ///
    /// Non-finite or non-positive multipliers leave `dt` alone; others are clamped to
    /// [`MotionConfig::SPEED_RANGE`].
    pub fn scale(&self, dt: Duration) -> Duration {
        let speed = self.speed_multiplier;
        if !speed.is_finite() || speed <= 0.0 || speed == 1.0 {
            return dt;
        }
        let (lo, hi) = Self::SPEED_RANGE;
        dt.mul_f64(f64::from(speed.clamp(lo, hi)))
    }
}

/// Serde helper for Duration as milliseconds.
mod duration_ms {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(ms))
    }
}

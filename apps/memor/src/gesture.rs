//! Swipe recognition and four-way classification.
//!
//! Pointer input arrives as terminal cells and is converted to points with a
//! [`CellSize`]. A [`PanTracker`] turns the pointer stream into pan and tap
//! events, and [`classify`] turns the end of a pan into an [`Outcome`] or a
//! cancel. The dial helpers describe the in-progress drag for rendering only.

use crate::models::Outcome;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::ops::{Add, Mul, Sub};
use std::time::Duration;
use tui_motion::interpolate_clamped;

/// A position or displacement in points.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Length along the longer axis.
    pub fn max_abs(self) -> f32 {
        self.x.abs().max(self.y.abs())
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Size of one terminal cell in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSize {
    pub width: f32,
    pub height: f32,
}

impl Default for CellSize {
    fn default() -> Self {
        Self { width: 8.0, height: 16.0 }
    }
}

impl CellSize {
    /// Center of the cell at `column`, `row`.
    pub fn point(&self, column: u16, row: u16) -> Vec2 {
        Vec2::new(
            (f32::from(column) + 0.5) * self.width,
            (f32::from(row) + 0.5) * self.height,
        )
    }

    /// Convert a displacement in points to fractional cells.
    pub fn to_cells(&self, offset: Vec2) -> (f32, f32) {
        (offset.x / self.width, offset.y / self.height)
    }
}

/// Recognizer thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Travel along the dominant axis that commits a swipe
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: f32,
    /// Release speed along the dominant axis that commits a swipe
    #[serde(default = "default_velocity_threshold")]
    pub velocity_threshold: f32,
    /// Travel on either axis before a press becomes a pan
    #[serde(default = "default_activation_offset")]
    pub activation_offset: f32,
    /// Drag distance at which the dial is fully shown
    #[serde(default = "default_dial_max_distance")]
    pub dial_max_distance: f32,
    /// Trailing window used to estimate release velocity
    #[serde(default = "default_velocity_window_ms")]
    pub velocity_window_ms: u64,
    /// Longest press that still counts as a tap
    #[serde(default = "default_tap_max_ms")]
    pub tap_max_ms: u64,
}

fn default_distance_threshold() -> f32 { 100.0 }
fn default_velocity_threshold() -> f32 { 800.0 }
fn default_activation_offset() -> f32 { 8.0 }
fn default_dial_max_distance() -> f32 { 150.0 }
fn default_velocity_window_ms() -> u64 { 100 }
fn default_tap_max_ms() -> u64 { 500 }

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            distance_threshold: default_distance_threshold(),
            velocity_threshold: default_velocity_threshold(),
            activation_offset: default_activation_offset(),
            dial_max_distance: default_dial_max_distance(),
            velocity_window_ms: default_velocity_window_ms(),
            tap_max_ms: default_tap_max_ms(),
        }
    }
}

impl GestureConfig {
    pub fn velocity_window(&self) -> Duration {
        Duration::from_millis(self.velocity_window_ms)
    }

    pub fn tap_max(&self) -> Duration {
        Duration::from_millis(self.tap_max_ms)
    }
}

/// Swipe direction on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn outcome(self) -> Outcome {
        match self {
            Self::Left => Outcome::Again,
            Self::Down => Outcome::Hard,
            Self::Up => Outcome::Good,
            Self::Right => Outcome::Easy,
        }
    }

    pub fn from_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Again => Self::Left,
            Outcome::Hard => Self::Down,
            Outcome::Good => Self::Up,
            Outcome::Easy => Self::Right,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Unit vector in screen coordinates (y grows downward).
    pub fn unit(self) -> Vec2 {
        match self {
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
            Self::Up => Vec2::new(0.0, -1.0),
            Self::Down => Vec2::new(0.0, 1.0),
        }
    }

    /// A pan end that commits in this direction, used for keyboard flings.
    pub fn fling(self, config: &GestureConfig) -> PanEnd {
        PanEnd {
            translation: self.unit() * (config.distance_threshold + 1.0),
            velocity: self.unit() * (config.velocity_threshold + 1.0),
        }
    }
}

/// The dominant direction of a translation.
///
/// Ties go to the vertical axis. A zero translation has no direction.
pub fn dominant_direction(translation: Vec2) -> Option<Direction> {
    let abs_x = translation.x.abs();
    let abs_y = translation.y.abs();
    if abs_x == 0.0 && abs_y == 0.0 {
        return None;
    }

    let direction = if abs_x > abs_y {
        if translation.x > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if translation.y < 0.0 {
        Direction::Up
    } else {
        Direction::Down
    };
    Some(direction)
}

/// Cumulative translation and release velocity of a finished pan.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PanEnd {
    pub translation: Vec2,
    /// Points per second
    pub velocity: Vec2,
}

/// Result of classifying a finished pan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Commit(Outcome),
    Cancel,
}

/// Decide whether a finished pan commits, and to which outcome.
pub fn classify(end: &PanEnd, config: &GestureConfig) -> Classification {
    let Some(direction) = dominant_direction(end.translation) else {
        return Classification::Cancel;
    };

    let (distance, velocity) = if direction.is_horizontal() {
        (end.translation.x.abs(), end.velocity.x.abs())
    } else {
        (end.translation.y.abs(), end.velocity.y.abs())
    };

    if distance > config.distance_threshold || velocity > config.velocity_threshold {
        Classification::Commit(direction.outcome())
    } else {
        Classification::Cancel
    }
}

/// Visual feedback for an in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dial {
    /// 0 at rest, 1 at the configured max distance
    pub intensity: f32,
    pub scale: f32,
    /// The outcome the drag currently points at
    pub outcome: Option<Outcome>,
}

impl Dial {
    pub const REST: Dial = Dial {
        intensity: 0.0,
        scale: 0.8,
        outcome: None,
    };
}

pub fn dial(translation: Vec2, config: &GestureConfig) -> Dial {
    let distance = translation.max_abs();
    let range = (0.0, config.dial_max_distance);
    Dial {
        intensity: interpolate_clamped(distance, range, (0.0, 1.0)),
        scale: interpolate_clamped(distance, range, (0.8, 1.1)),
        outcome: dominant_direction(translation).map(Direction::outcome),
    }
}

/// Events recognized from a pointer stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanEvent {
    /// Travel crossed the activation offset. Carries the translation so far.
    Began(Vec2),
    Moved(Vec2),
    Ended(PanEnd),
    /// Press and release without activating a pan.
    Tap,
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    at: Duration,
    point: Vec2,
}

#[derive(Debug, Clone)]
struct Press {
    origin: Vec2,
    started: Duration,
    active: bool,
}

/// Turns pointer samples into pan and tap events.
///
/// Timestamps are offsets from any fixed origin and must not decrease.
#[derive(Debug, Clone)]
pub struct PanTracker {
    config: GestureConfig,
    press: Option<Press>,
    samples: VecDeque<Sample>,
}

impl PanTracker {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            press: None,
            samples: VecDeque::new(),
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    pub fn is_panning(&self) -> bool {
        self.press.as_ref().is_some_and(|p| p.active)
    }

    /// Start tracking at `point`. A press while already pressed restarts tracking.
    pub fn press(&mut self, point: Vec2, at: Duration) {
        self.samples.clear();
        self.samples.push_back(Sample { at, point });
        self.press = Some(Press {
            origin: point,
            started: at,
            active: false,
        });
    }

    pub fn moved(&mut self, point: Vec2, at: Duration) -> Option<PanEvent> {
        let press = self.press.as_mut()?;
        let translation = point - press.origin;
        self.samples.push_back(Sample { at, point });
        trim_window(&mut self.samples, self.config.velocity_window());

        if press.active {
            return Some(PanEvent::Moved(translation));
        }

        let offset = self.config.activation_offset;
        if translation.x.abs() > offset || translation.y.abs() > offset {
            press.active = true;
            Some(PanEvent::Began(translation))
        } else {
            None
        }
    }

    pub fn release(&mut self, point: Vec2, at: Duration) -> Option<PanEvent> {
        let press = self.press.take()?;
        self.samples.push_back(Sample { at, point });
        trim_window(&mut self.samples, self.config.velocity_window());
        let velocity = estimate_velocity(&self.samples);
        self.samples.clear();

        if press.active {
            return Some(PanEvent::Ended(PanEnd {
                translation: point - press.origin,
                velocity,
            }));
        }

        let held = at.saturating_sub(press.started);
        (held <= self.config.tap_max()).then_some(PanEvent::Tap)
    }

    /// Drop the current press without emitting anything.
    pub fn cancel(&mut self) {
        self.press = None;
        self.samples.clear();
    }
}

fn trim_window(samples: &mut VecDeque<Sample>, window: Duration) {
    let Some(newest) = samples.back().map(|s| s.at) else {
        return;
    };
    while samples.len() > 2 && newest.saturating_sub(samples[1].at) >= window {
        samples.pop_front();
    }
}

fn estimate_velocity(samples: &VecDeque<Sample>) -> Vec2 {
    let (Some(first), Some(last)) = (samples.front(), samples.back()) else {
        return Vec2::ZERO;
    };
    let dt = last.at.saturating_sub(first.at).as_secs_f32();
    if dt <= f32::EPSILON {
        return Vec2::ZERO;
    }
    (last.point - first.point) * (1.0 / dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn end(dx: f32, dy: f32, vx: f32, vy: f32) -> PanEnd {
        PanEnd {
            translation: Vec2::new(dx, dy),
            velocity: Vec2::new(vx, vy),
        }
    }

    #[test]
    fn test_directional_mapping() {
        let config = GestureConfig::default();
        assert_eq!(classify(&end(200.0, 0.0, 0.0, 0.0), &config), Classification::Commit(Outcome::Easy));
        assert_eq!(classify(&end(-200.0, 10.0, 0.0, 0.0), &config), Classification::Commit(Outcome::Again));
        assert_eq!(classify(&end(5.0, -200.0, 0.0, 0.0), &config), Classification::Commit(Outcome::Good));
        assert_eq!(classify(&end(0.0, 200.0, 0.0, 0.0), &config), Classification::Commit(Outcome::Hard));
    }

    #[test]
    fn test_short_slow_drag_cancels() {
        let config = GestureConfig::default();
        assert_eq!(classify(&end(-40.0, 0.0, -50.0, 0.0), &config), Classification::Cancel);
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        let config = GestureConfig::default();
        assert_eq!(classify(&end(100.0, 0.0, 800.0, 0.0), &config), Classification::Cancel);
        assert_eq!(classify(&end(100.5, 0.0, 0.0, 0.0), &config), Classification::Commit(Outcome::Easy));
    }

    #[test]
    fn test_fast_short_flick_commits() {
        let config = GestureConfig::default();
        assert_eq!(classify(&end(0.0, -20.0, 0.0, -900.0), &config), Classification::Commit(Outcome::Good));
    }

    #[test]
    fn test_velocity_only_counts_on_dominant_axis() {
        let config = GestureConfig::default();
        assert_eq!(classify(&end(30.0, 10.0, 0.0, 5000.0), &config), Classification::Cancel);
    }

    #[test]
    fn test_tie_goes_vertical() {
        let config = GestureConfig::default();
        assert_eq!(classify(&end(150.0, 150.0, 0.0, 0.0), &config), Classification::Commit(Outcome::Hard));
        assert_eq!(classify(&end(-150.0, -150.0, 0.0, 0.0), &config), Classification::Commit(Outcome::Good));
        assert_eq!(classify(&end(150.0, -150.0, 0.0, 0.0), &config), Classification::Commit(Outcome::Good));
    }

    #[test]
    fn test_zero_translation_cancels() {
        let config = GestureConfig::default();
        assert_eq!(classify(&end(0.0, 0.0, 5000.0, 0.0), &config), Classification::Cancel);
    }

    #[test]
    fn test_fling_commits_through_classifier() {
        let config = GestureConfig::default();
        for outcome in Outcome::ALL {
            let fling = Direction::from_outcome(outcome).fling(&config);
            assert_eq!(classify(&fling, &config), Classification::Commit(outcome));
        }
    }

    #[test]
    fn test_dial() {
        let config = GestureConfig::default();
        assert_eq!(dial(Vec2::ZERO, &config), Dial::REST);

        let half = dial(Vec2::new(-75.0, 20.0), &config);
        assert!((half.intensity - 0.5).abs() < 1e-5);
        assert!((half.scale - 0.95).abs() < 1e-5);
        assert_eq!(half.outcome, Some(Outcome::Again));

        let far = dial(Vec2::new(0.0, 400.0), &config);
        assert_eq!(far.intensity, 1.0);
        assert!((far.scale - 1.1).abs() < 1e-5);
        assert_eq!(far.outcome, Some(Outcome::Hard));
    }

    #[test]
    fn test_cell_size() {
        let cells = CellSize::default();
        assert_eq!(cells.point(0, 0), Vec2::new(4.0, 8.0));
        assert_eq!(cells.point(10, 2) - cells.point(0, 2), Vec2::new(80.0, 0.0));
        assert_eq!(cells.to_cells(Vec2::new(16.0, -32.0)), (2.0, -2.0));
    }

    #[test]
    fn test_tracker_tap() {
        let mut tracker = PanTracker::new(GestureConfig::default());
        tracker.press(Vec2::new(100.0, 100.0), ms(0));
        assert_eq!(tracker.moved(Vec2::new(104.0, 96.0), ms(20)), None);
        assert_eq!(tracker.release(Vec2::new(104.0, 96.0), ms(60)), Some(PanEvent::Tap));
        assert!(!tracker.is_pressed());
    }

    #[test]
    fn test_tracker_long_press_is_not_tap() {
        let mut tracker = PanTracker::new(GestureConfig::default());
        tracker.press(Vec2::new(100.0, 100.0), ms(0));
        assert_eq!(tracker.release(Vec2::new(100.0, 100.0), ms(900)), None);
    }

    #[test]
    fn test_tracker_activation() {
        let mut tracker = PanTracker::new(GestureConfig::default());
        tracker.press(Vec2::new(0.0, 0.0), ms(0));
        assert_eq!(tracker.moved(Vec2::new(8.0, 0.0), ms(10)), None);
        assert_eq!(
            tracker.moved(Vec2::new(16.0, 0.0), ms(20)),
            Some(PanEvent::Began(Vec2::new(16.0, 0.0)))
        );
        assert!(tracker.is_panning());
        assert_eq!(
            tracker.moved(Vec2::new(24.0, 0.0), ms(30)),
            Some(PanEvent::Moved(Vec2::new(24.0, 0.0)))
        );
    }

    #[test]
    fn test_tracker_release_velocity() {
        let mut tracker = PanTracker::new(GestureConfig::default());
        tracker.press(Vec2::new(0.0, 0.0), ms(0));
        for i in 1..=10u64 {
            tracker.moved(Vec2::new(i as f32 * 20.0, 0.0), ms(i * 10));
        }
        let Some(PanEvent::Ended(end)) = tracker.release(Vec2::new(200.0, 0.0), ms(100)) else {
            panic!("expected pan end");
        };
        assert_eq!(end.translation, Vec2::new(200.0, 0.0));
        assert!((end.velocity.x - 2000.0).abs() < 1.0, "{:?}", end.velocity);
        assert_eq!(end.velocity.y, 0.0);
    }

    #[test]
    fn test_tracker_pause_before_release_kills_velocity() {
        let mut tracker = PanTracker::new(GestureConfig::default());
        tracker.press(Vec2::new(0.0, 0.0), ms(0));
        tracker.moved(Vec2::new(-40.0, 0.0), ms(20));
        tracker.moved(Vec2::new(-40.0, 0.0), ms(400));
        let Some(PanEvent::Ended(end)) = tracker.release(Vec2::new(-40.0, 0.0), ms(500)) else {
            panic!("expected pan end");
        };
        assert_eq!(end.velocity, Vec2::ZERO);
        assert_eq!(classify(&end, &GestureConfig::default()), Classification::Cancel);
    }

    #[test]
    fn test_release_without_press() {
        let mut tracker = PanTracker::new(GestureConfig::default());
        assert_eq!(tracker.moved(Vec2::new(50.0, 0.0), ms(0)), None);
        assert_eq!(tracker.release(Vec2::new(50.0, 0.0), ms(0)), None);
    }

    fn expected(dx: f32, dy: f32) -> Outcome {
        if dx.abs() > dy.abs() {
            if dx > 0.0 { Outcome::Easy } else { Outcome::Again }
        } else if dy < 0.0 {
            Outcome::Good
        } else {
            Outcome::Hard
        }
    }

    proptest! {
        #[test]
        fn prop_mapping_exhaustive(dx in -1000.0f32..1000.0, dy in -1000.0f32..1000.0) {
            prop_assume!(dx != 0.0 || dy != 0.0);
            let direction = dominant_direction(Vec2::new(dx, dy));
            prop_assert_eq!(direction.map(Direction::outcome), Some(expected(dx, dy)));
        }

        #[test]
        fn prop_far_drag_commits(dx in -1000.0f32..1000.0, dy in -1000.0f32..1000.0) {
            prop_assume!(dx.abs().max(dy.abs()) > 100.0);
            let config = GestureConfig::default();
            prop_assert_eq!(
                classify(&end(dx, dy, 0.0, 0.0), &config),
                Classification::Commit(expected(dx, dy))
            );
        }

        #[test]
        fn prop_small_slow_drag_cancels(
            dx in -100.0f32..=100.0,
            dy in -100.0f32..=100.0,
            vx in -800.0f32..=800.0,
            vy in -800.0f32..=800.0,
        ) {
            let config = GestureConfig::default();
            prop_assert_eq!(classify(&end(dx, dy, vx, vy), &config), Classification::Cancel);
        }

        #[test]
        fn prop_dial_bounded(dx in -2000.0f32..2000.0, dy in -2000.0f32..2000.0) {
            let d = dial(Vec2::new(dx, dy), &GestureConfig::default());
            prop_assert!((0.0..=1.0).contains(&d.intensity));
            prop_assert!((0.8..=1.1 + 1e-6).contains(&d.scale));
        }
    }
}

//! Card animation controller.
//!
//! [`CardMotion`] owns every animated value of the active card and the two
//! preview cards under it. It never touches session state: [`CardMotion::tick`]
//! reports finished exits as [`MotionEvent`]s and the owner decides what to do.

use crate::gesture::{Direction, Vec2};
use crate::models::Outcome;
use std::f32::consts::PI;
use std::time::Duration;
use tui_motion::{interpolate_clamped, AnimatedValue, MotionConfig, SpringConfig};

/// Maximum in-plane rotation at a full-width drag, in degrees.
pub const ROTATION_MAX: f32 = 12.0;
/// Maximum tilt at a full-height drag, in degrees.
pub const TILT_MAX: f32 = 8.0;
const ROTATION_DAMPING: f32 = 0.8;
const TILT_DAMPING: f32 = 0.6;

/// Preview cards rendered under the active one.
pub const PREVIEW_CARDS: usize = 2;
const SCALE_STEP: f32 = 0.06;
const LIFT_STEP: f32 = 9.0;
const OPACITY_STEP: f32 = 0.35;

/// Drag distance over which the Q/A indicator fades out.
const INDICATOR_FADE_DISTANCE: f32 = 50.0;

/// Screen size in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(640.0, 384.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPhase {
    Resting,
    Dragging,
    Exiting(Outcome),
    SpringingBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionEvent {
    /// The exit animation for a committed swipe reached its target.
    ExitCompleted(Outcome),
    /// A cancelled swipe returned to rest.
    Settled,
}

/// How one card of the stack is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackLayer {
    pub scale: f32,
    /// Downward offset in points
    pub lift: f32,
    pub opacity: f32,
}

impl StackLayer {
    /// Baseline for a card `depth` positions below the top. Fractional depths interpolate.
    pub fn at_depth(depth: f32) -> Self {
        Self {
            scale: 1.0 - SCALE_STEP * depth,
            lift: LIFT_STEP * depth,
            opacity: (1.0 - OPACITY_STEP * depth).clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CardMotion {
    config: MotionConfig,
    viewport: Viewport,
    phase: CardPhase,
    drag_origin: Vec2,
    x: AnimatedValue,
    y: AnimatedValue,
    rot_z: AnimatedValue,
    rot_x: AnimatedValue,
    flip: AnimatedValue,
    /// Depth of the active card followed by each preview card.
    depths: [AnimatedValue; PREVIEW_CARDS + 1],
}

impl CardMotion {
    pub fn new(config: MotionConfig, viewport: Viewport) -> Self {
        Self {
            config,
            viewport,
            phase: CardPhase::Resting,
            drag_origin: Vec2::ZERO,
            x: AnimatedValue::new(0.0),
            y: AnimatedValue::new(0.0),
            rot_z: AnimatedValue::new(0.0),
            rot_x: AnimatedValue::new(0.0),
            flip: AnimatedValue::new(0.0),
            depths: std::array::from_fn(|d| AnimatedValue::new(d as f32)),
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn phase(&self) -> CardPhase {
        self.phase
    }

    pub fn is_exiting(&self) -> bool {
        matches!(self.phase, CardPhase::Exiting(_))
    }

    /// Whether nothing is moving, so the owner can stop redrawing.
    pub fn is_idle(&self) -> bool {
        self.phase == CardPhase::Resting
            && !self.flip.is_animating()
            && self.depths.iter().all(|d| !d.is_animating())
    }

    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.x.get(), self.y.get())
    }

    /// In-plane rotation in degrees.
    pub fn rot_z(&self) -> f32 {
        self.rot_z.get()
    }

    /// Tilt toward the viewer in degrees.
    pub fn rot_x(&self) -> f32 {
        self.rot_x.get()
    }

    /// Flip progress: 0 shows the question, 1 the answer.
    pub fn flip(&self) -> f32 {
        self.flip.get()
    }

    pub fn is_showing_answer(&self) -> bool {
        self.flip.get() >= 0.5
    }

    /// Horizontal squeeze of the card face while it turns over.
    pub fn flip_squeeze(&self) -> f32 {
        (self.flip.get() * PI).cos().abs()
    }

    pub fn question_opacity(&self) -> f32 {
        interpolate_clamped(self.flip.get(), (0.0, 0.5), (1.0, 0.0))
    }

    pub fn answer_opacity(&self) -> f32 {
        interpolate_clamped(self.flip.get(), (0.5, 1.0), (0.0, 1.0))
    }

    /// Opacity of the Q/A indicator, fading out as the card moves away.
    pub fn indicator_opacity(&self) -> f32 {
        let travel = self.x.get().abs() + self.y.get().abs();
        interpolate_clamped(travel, (0.0, INDICATOR_FADE_DISTANCE), (1.0, 0.0))
    }

    /// Layer 0 is the active card, 1 and 2 the preview cards under it.
    pub fn layer(&self, index: usize) -> Option<StackLayer> {
        self.depths.get(index).map(|d| StackLayer::at_depth(d.get()))
    }

    /// Start following a drag from wherever the card is now.
    ///
    /// Returns false while an exit is running.
    pub fn begin_drag(&mut self) -> bool {
        if self.is_exiting() {
            return false;
        }
        for value in [&mut self.x, &mut self.y, &mut self.rot_z, &mut self.rot_x] {
            value.stop();
        }
        self.drag_origin = self.offset();
        self.phase = CardPhase::Dragging;
        true
    }

    /// Track the drag's translation 1:1 and tilt with it.
    pub fn drag_update(&mut self, translation: Vec2) {
        if self.phase != CardPhase::Dragging {
            return;
        }
        let offset = self.drag_origin + translation;
        self.x.set(offset.x);
        self.y.set(offset.y);
        self.rot_z.set(offset.x / self.viewport.width * ROTATION_MAX * ROTATION_DAMPING);
        self.rot_x.set(offset.y / self.viewport.height * TILT_MAX * TILT_DAMPING);
    }

    /// Send the card off-screen in the direction of `outcome`.
    ///
    /// Returns false if an exit is already running; at most one exit runs per card.
    pub fn commit(&mut self, outcome: Outcome) -> bool {
        if self.is_exiting() {
            return false;
        }
        let unit = Direction::from_outcome(outcome).unit();
        let factor = self.config.exit_distance_factor;
        let target = Vec2::new(
            unit.x * self.viewport.width * factor,
            unit.y * self.viewport.height * factor,
        );

        self.phase = CardPhase::Exiting(outcome);
        self.animate_timing(Axis::X, target.x);
        self.animate_timing(Axis::Y, target.y);
        true
    }

    /// Return the card to rest after a cancelled swipe.
    pub fn spring_back(&mut self) {
        if self.is_exiting() {
            return;
        }
        self.phase = CardPhase::SpringingBack;
        let (config, enabled) = (self.config.spring_back, self.config.enabled);
        for value in [&mut self.x, &mut self.y, &mut self.rot_z, &mut self.rot_x] {
            animate_spring(value, 0.0, config, enabled);
        }
    }

    /// Turn the card over, or back.
    pub fn toggle_flip(&mut self) {
        let target = if self.flip.target() >= 0.5 { 0.0 } else { 1.0 };
        animate_spring(&mut self.flip, target, self.config.flip, self.config.enabled);
    }

    /// Put every per-card value back to baseline and move the stack forward one slot.
    pub fn reset_for_next_card(&mut self) {
        for value in [&mut self.x, &mut self.y, &mut self.rot_z, &mut self.rot_x, &mut self.flip] {
            value.set(0.0);
        }
        self.drag_origin = Vec2::ZERO;
        self.phase = CardPhase::Resting;

        let (config, enabled) = (self.config.stack, self.config.enabled);
        for (depth, value) in self.depths.iter_mut().enumerate() {
            let depth = depth as f32;
            value.set(depth + 1.0);
            animate_spring(value, depth, config, enabled);
        }
    }

    /// Advance all animations by a frame delta.
    pub fn tick(&mut self, dt: Duration) -> Option<MotionEvent> {
        let dt = self.config.scale(dt);
        for value in [&mut self.x, &mut self.y, &mut self.rot_z, &mut self.rot_x, &mut self.flip] {
            value.tick(dt);
        }
        for value in &mut self.depths {
            value.tick(dt);
        }

        match self.phase {
            CardPhase::Exiting(outcome) if !self.x.is_animating() && !self.y.is_animating() => {
                self.phase = CardPhase::Resting;
                Some(MotionEvent::ExitCompleted(outcome))
            }
            CardPhase::SpringingBack
                if [&self.x, &self.y, &self.rot_z, &self.rot_x]
                    .iter()
                    .all(|v| !v.is_animating()) =>
            {
                self.phase = CardPhase::Resting;
                Some(MotionEvent::Settled)
            }
            _ => None,
        }
    }

    fn animate_timing(&mut self, axis: Axis, target: f32) {
        let value = match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        };
        if self.config.enabled {
            value.timing_to(target, self.config.exit_duration, self.config.exit_easing);
        } else {
            value.jump_to(target);
        }
    }
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn animate_spring(value: &mut AnimatedValue, target: f32, config: SpringConfig, enabled: bool) {
    if enabled {
        value.spring_to(target, config);
    } else {
        value.jump_to(target);
    }
}

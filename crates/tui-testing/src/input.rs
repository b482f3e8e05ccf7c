//! Timed input simulation for testing.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use std::time::Duration;

/// An input event stamped with its offset from the start of the sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEvent {
    pub at: Duration,
    pub event: Event,
}

/// A sequence of input events with a virtual clock.
///
/// Every event is stamped with the clock's current offset. [`InputSequence::delay`]
/// and the timed drag helpers advance the clock, so gesture code that estimates
/// velocity from timestamps can be fed deterministic input.
#[derive(Debug, Clone, Default)]
pub struct InputSequence {
    events: Vec<TimedEvent>,
    clock: Duration,
}

impl InputSequence {
    /// Create a new empty input sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the virtual clock.
    pub fn delay(&mut self, ms: u64) -> &mut Self {
        self.clock += Duration::from_millis(ms);
        self
    }

    /// Add a key event.
    pub fn key(&mut self, key: KeyCode) -> &mut Self {
        self.key_mod(key, KeyModifiers::NONE)
    }

    /// Add a key event with modifiers.
    pub fn key_mod(&mut self, key: KeyCode, modifiers: KeyModifiers) -> &mut Self {
        self.push(Event::Key(KeyEvent::new(key, modifiers)))
    }

    /// Add a character key event.
    pub fn char(&mut self, c: char) -> &mut Self {
        self.key(KeyCode::Char(c))
    }

    /// Add a Ctrl+key event.
    pub fn ctrl(&mut self, c: char) -> &mut Self {
        self.key_mod(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn enter(&mut self) -> &mut Self {
        self.key(KeyCode::Enter)
    }

    pub fn esc(&mut self) -> &mut Self {
        self.key(KeyCode::Esc)
    }

    pub fn space(&mut self) -> &mut Self {
        self.key(KeyCode::Char(' '))
    }

    pub fn up(&mut self) -> &mut Self {
        self.key(KeyCode::Up)
    }

    pub fn down(&mut self) -> &mut Self {
        self.key(KeyCode::Down)
    }

    pub fn left(&mut self) -> &mut Self {
        self.key(KeyCode::Left)
    }

    pub fn right(&mut self) -> &mut Self {
        self.key(KeyCode::Right)
    }

    /// Press and release the left button in place.
    pub fn tap(&mut self, x: u16, y: u16) -> &mut Self {
        self.mouse_event(MouseEventKind::Down(MouseButton::Left), x, y);
        self.mouse_event(MouseEventKind::Up(MouseButton::Left), x, y)
    }

    /// Drag with the left button from `from` to `to`, one cell per event, without advancing time.
    pub fn drag(&mut self, from: (u16, u16), to: (u16, u16)) -> &mut Self {
        let steps = u32::from(from.0.abs_diff(to.0).max(from.1.abs_diff(to.1)));
        self.drag_over(from, to, steps.max(1), Duration::ZERO)
    }

    /// Drag with the left button from `from` to `to` in `steps` moves spread evenly over `duration`.
    ///
    /// The button is released at `to` at the end of `duration`.
    pub fn drag_over(&mut self, from: (u16, u16), to: (u16, u16), steps: u32, duration: Duration) -> &mut Self {
        let steps = steps.max(1);
        self.mouse_event(MouseEventKind::Down(MouseButton::Left), from.0, from.1);

        let step_time = duration / steps;
        for i in 1..=steps {
            let x = lerp_cell(from.0, to.0, i, steps);
            let y = lerp_cell(from.1, to.1, i, steps);
            self.clock += step_time;
            self.mouse_event(MouseEventKind::Drag(MouseButton::Left), x, y);
        }

        self.mouse_event(MouseEventKind::Up(MouseButton::Left), to.0, to.1)
    }

    fn mouse_event(&mut self, kind: MouseEventKind, x: u16, y: u16) -> &mut Self {
        self.push(Event::Mouse(MouseEvent {
            kind,
            column: x,
            row: y,
            modifiers: KeyModifiers::NONE,
        }))
    }

    fn push(&mut self, event: Event) -> &mut Self {
        self.events.push(TimedEvent { at: self.clock, event });
        self
    }

    /// All events in order, without timestamps.
    pub fn events(&self) -> Vec<Event> {
        self.events.iter().map(|e| e.event.clone()).collect()
    }

    /// All events with their offsets.
    pub fn timed_events(&self) -> &[TimedEvent] {
        &self.events
    }

    /// Offset of the virtual clock.
    pub fn elapsed(&self) -> Duration {
        self.clock
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

fn lerp_cell(from: u16, to: u16, i: u32, steps: u32) -> u16 {
    let from = i64::from(from);
    let to = i64::from(to);
    let value = from + (to - from) * i64::from(i) / i64::from(steps);
    value.clamp(0, i64::from(u16::MAX)) as u16
}

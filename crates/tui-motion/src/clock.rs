//! Frame clock for driving animations from an event loop.

use std::time::{Duration, Instant};

/// Produces the time since the previous frame, capped so that a stalled
/// loop does not make animations jump.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    max_step: Duration,
}

impl FrameClock {
    /// Default cap on a single frame delta.
    pub const DEFAULT_MAX_STEP: Duration = Duration::from_millis(64);

    pub fn new() -> Self {
        Self::with_max_step(Self::DEFAULT_MAX_STEP)
    }

    pub fn with_max_step(max_step: Duration) -> Self {
        Self {
            last: Instant::now(),
            max_step,
        }
    }

    /// Time since the previous call (or construction), at most `max_step`.
    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }

    /// Like [`FrameClock::tick`] with an explicit current instant.
    pub fn tick_at(&mut self, now: Instant) -> Duration {
        let dt = now.saturating_duration_since(self.last);
        self.last = now;
        dt.min(self.max_step)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

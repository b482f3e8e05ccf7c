//! Testing utilities for memor.
//!
//! - [`TestTerminal`] renders into a ratatui `TestBackend` and reads the buffer back
//! - [`InputSequence`] builds key, tap and timed mouse-drag events

pub mod input;
pub mod terminal;

pub use input::{InputSequence, TimedEvent};
pub use terminal::TestTerminal;

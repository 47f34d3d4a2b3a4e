//! # Signals
//!
//! Everything the engine can be asked to do is a `Signal`. The host maps
//! whatever physical input it has (D-pad, keyboard, touch) onto these six
//! values; the engine never sees a raw key code.
//!
//! ```text
//! Signal  →  SpatialNavigator::handle()  →  NavOutcome
//! ```
//!
//! `NavOutcome` tells the host what happened so it can redraw, log, or
//! leave. None of the outcomes are errors.

use crate::core::geometry::Direction;
use crate::core::history::BackOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Up,
    Down,
    Left,
    Right,
    Activate,
    Back,
}

impl Signal {
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Signal::Up => Some(Direction::Up),
            Signal::Down => Some(Direction::Down),
            Signal::Left => Some(Direction::Left),
            Signal::Right => Some(Direction::Right),
            Signal::Activate | Signal::Back => None,
        }
    }
}

impl From<Direction> for Signal {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Signal::Up,
            Direction::Down => Signal::Down,
            Direction::Left => Signal::Left,
            Direction::Right => Signal::Right,
        }
    }
}

/// Result of handling one signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// Focus moved to this id.
    Moved(String),
    /// Directional input had no eligible target; focus is unchanged.
    Stayed,
    /// The focused element's activation callback ran.
    Activated(String),
    /// Activate with nothing focused, or no callback registered.
    NothingToActivate,
    /// The root's own back handler consumed the signal.
    BackHandled,
    /// Back was forwarded to the view history.
    History(BackOutcome),
    /// The root is disabled.
    Ignored,
}

impl NavOutcome {
    /// True when the exit capability fired while handling this signal.
    pub fn is_exit(&self) -> bool {
        matches!(self, NavOutcome::History(BackOutcome::ExitRequested))
    }
}

//! Core types shared across the crate
//!
//! - `RecognizerState` - the recognizer state machine states
//! - `StateSet` - bit set for testing a state against a group of states
//! - `Direction` - movement direction bits carried on samples
//! - `RecognizerId` - stable identity of a recognizer
//! - `Point` - a 2D position

use std::cell::Cell;
use std::fmt;

// =============================================================================
// Recognizer State
// =============================================================================

/// State of a recognizer within the current session.
///
/// `Began`, `Changed` and `Ended` mean the recognizer is actively participating
/// and may claim focus. `Recognized`, `Cancelled` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecognizerState {
    #[default]
    Possible,
    Began,
    Changed,
    Ended,
    Recognized,
    Cancelled,
    Failed,
}

impl RecognizerState {
    /// The single bit this state occupies in a `StateSet`.
    pub fn bit(self) -> StateSet {
        match self {
            Self::Possible => StateSet::POSSIBLE,
            Self::Began => StateSet::BEGAN,
            Self::Changed => StateSet::CHANGED,
            Self::Ended => StateSet::ENDED,
            Self::Recognized => StateSet::RECOGNIZED,
            Self::Cancelled => StateSet::CANCELLED,
            Self::Failed => StateSet::FAILED,
        }
    }

    /// Check whether this state is one of `set`.
    pub fn is_in(self, set: StateSet) -> bool {
        set.contains(self.bit())
    }

    /// Began, Changed or Ended: eligible to hold focus.
    pub fn is_active(self) -> bool {
        self.is_in(StateSet::ACTIVE)
    }

    /// Recognized, Cancelled or Failed.
    pub fn is_terminal(self) -> bool {
        self.is_in(StateSet::TERMINAL)
    }

    /// Suffix appended to a recognizer's event name when emitting this state.
    pub fn event_suffix(self) -> &'static str {
        match self {
            Self::Began => "start",
            Self::Changed => "move",
            Self::Ended => "end",
            Self::Cancelled => "cancel",
            _ => "",
        }
    }
}

impl fmt::Display for RecognizerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Possible => "possible",
            Self::Began => "began",
            Self::Changed => "changed",
            Self::Ended => "ended",
            Self::Recognized => "recognized",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

bitflags::bitflags! {
    /// Groups of recognizer states.
    ///
    /// Combine with bitwise OR: `StateSet::BEGAN | StateSet::CHANGED`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StateSet: u8 {
        const POSSIBLE = 1 << 0;
        const BEGAN = 1 << 1;
        const CHANGED = 1 << 2;
        const ENDED = 1 << 3;
        const RECOGNIZED = 1 << 4;
        const CANCELLED = 1 << 5;
        const FAILED = 1 << 6;

        const ACTIVE = Self::BEGAN.bits() | Self::CHANGED.bits() | Self::ENDED.bits();
        const TERMINAL = Self::RECOGNIZED.bits() | Self::CANCELLED.bits() | Self::FAILED.bits();
    }
}

// =============================================================================
// Direction
// =============================================================================

bitflags::bitflags! {
    /// Direction of movement for a sample.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Direction: u8 {
        const NONE = 0;
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const UP = 1 << 2;
        const DOWN = 1 << 3;

        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        const VERTICAL = Self::UP.bits() | Self::DOWN.bits();
        const ALL = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();
    }
}

impl Direction {
    /// Dominant direction of a movement delta. Ties go to the horizontal axis.
    pub fn from_delta(dx: f64, dy: f64) -> Self {
        if dx == 0.0 && dy == 0.0 {
            Self::NONE
        } else if dx.abs() >= dy.abs() {
            if dx < 0.0 { Self::LEFT } else { Self::RIGHT }
        } else if dy < 0.0 {
            Self::UP
        } else {
            Self::DOWN
        }
    }
}

// =============================================================================
// Recognizer Identity
// =============================================================================

/// Stable identity of a recognizer, unique per thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecognizerId(u64);

thread_local! {
    static NEXT_RECOGNIZER_ID: Cell<u64> = const { Cell::new(1) };
}

impl RecognizerId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        NEXT_RECOGNIZER_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            Self(id)
        })
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecognizerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

// =============================================================================
// Point
// =============================================================================

/// A position in sample coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_and_terminal_groups() {
        assert!(RecognizerState::Began.is_active());
        assert!(RecognizerState::Changed.is_active());
        assert!(RecognizerState::Ended.is_active());
        assert!(!RecognizerState::Possible.is_active());
        assert!(!RecognizerState::Recognized.is_active());

        assert!(RecognizerState::Recognized.is_terminal());
        assert!(RecognizerState::Cancelled.is_terminal());
        assert!(RecognizerState::Failed.is_terminal());
        assert!(!RecognizerState::Ended.is_terminal());
    }

    #[test]
    fn test_is_in_custom_set() {
        let set = StateSet::POSSIBLE | StateSet::FAILED;
        assert!(RecognizerState::Possible.is_in(set));
        assert!(RecognizerState::Failed.is_in(set));
        assert!(!RecognizerState::Began.is_in(set));
    }

    #[test]
    fn test_event_suffix() {
        assert_eq!(RecognizerState::Began.event_suffix(), "start");
        assert_eq!(RecognizerState::Changed.event_suffix(), "move");
        assert_eq!(RecognizerState::Ended.event_suffix(), "end");
        assert_eq!(RecognizerState::Cancelled.event_suffix(), "cancel");
        assert_eq!(RecognizerState::Recognized.event_suffix(), "");
    }

    #[test]
    fn test_direction_from_delta() {
        assert_eq!(Direction::from_delta(0.0, 0.0), Direction::NONE);
        assert_eq!(Direction::from_delta(-5.0, 1.0), Direction::LEFT);
        assert_eq!(Direction::from_delta(5.0, 5.0), Direction::RIGHT);
        assert_eq!(Direction::from_delta(1.0, -3.0), Direction::UP);
        assert_eq!(Direction::from_delta(0.0, 2.0), Direction::DOWN);
        assert!(Direction::HORIZONTAL.contains(Direction::LEFT));
    }

    #[test]
    fn test_recognizer_ids_are_unique() {
        let a = RecognizerId::next();
        let b = RecognizerId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }
}

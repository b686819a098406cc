//! Normalized input samples.
//!
//! A sample is one observation of the pointers currently in contact, already
//! normalized by an input source. The manager only reads `is_first` (session
//! boundary); everything else is for gestures.

use crate::types::{Direction, Point};

/// Phase of the input stream this sample belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputPhase {
    #[default]
    Start,
    Move,
    End,
    Cancel,
}

/// One normalized input observation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputSample {
    /// Phase (start, move, end, cancel)
    pub phase: InputPhase,
    /// First sample of a new input session (no pointers were down before)
    pub is_first: bool,
    /// Last sample of the input session (all pointers released)
    pub is_final: bool,
    /// Number of pointers in contact
    pub pointers: usize,
    /// Center of all pointers
    pub center: Point,
    /// Movement since the first sample of the session
    pub delta: Point,
    /// Dominant direction of `delta`
    pub direction: Direction,
    /// Distance between the pointers relative to the session start
    pub scale: f64,
    /// Rotation in degrees relative to the session start
    pub rotation: f64,
    /// Milliseconds since an arbitrary epoch
    pub timestamp: u64,
    /// Milliseconds since the first sample of the session
    pub delta_time: u64,
}

impl InputSample {
    /// Create a sample with neutral scale.
    pub fn new(phase: InputPhase, center: Point) -> Self {
        Self {
            phase,
            is_first: phase == InputPhase::Start,
            is_final: matches!(phase, InputPhase::End | InputPhase::Cancel),
            pointers: if matches!(phase, InputPhase::End | InputPhase::Cancel) { 0 } else { 1 },
            center,
            scale: 1.0,
            ..Default::default()
        }
    }

    /// First contact of a session.
    pub fn start(x: f64, y: f64) -> Self {
        Self::new(InputPhase::Start, Point::new(x, y))
    }

    /// Pointer movement, `delta` measured from the session start.
    pub fn moved(x: f64, y: f64, dx: f64, dy: f64) -> Self {
        let mut sample = Self::new(InputPhase::Move, Point::new(x, y));
        sample.delta = Point::new(dx, dy);
        sample.direction = Direction::from_delta(dx, dy);
        sample
    }

    /// All pointers released.
    pub fn end(x: f64, y: f64) -> Self {
        Self::new(InputPhase::End, Point::new(x, y))
    }

    /// Input cancelled by the platform.
    pub fn cancel(x: f64, y: f64) -> Self {
        Self::new(InputPhase::Cancel, Point::new(x, y))
    }

    /// Set the pointer count.
    pub fn with_pointers(mut self, pointers: usize) -> Self {
        self.pointers = pointers;
        self
    }

    /// Set timing information.
    pub fn with_time(mut self, timestamp: u64, delta_time: u64) -> Self {
        self.timestamp = timestamp;
        self.delta_time = delta_time;
        self
    }

    /// Set multi-pointer transform data.
    pub fn with_transform(mut self, scale: f64, rotation: f64) -> Self {
        self.scale = scale;
        self.rotation = rotation;
        self
    }

    /// Euclidean length of `delta`.
    pub fn distance(&self) -> f64 {
        Point::default().distance_to(self.delta)
    }

    /// Velocity in units per millisecond over the whole session.
    pub fn velocity(&self) -> f64 {
        if self.delta_time == 0 {
            0.0
        } else {
            self.distance() / self.delta_time as f64
        }
    }
}

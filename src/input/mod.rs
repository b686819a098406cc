//! Input Module - Normalized samples and input sources
//!
//! Input sources translate platform events into `InputSample`s and feed them
//! to `Manager::recognize`, one at a time, in chronological order. The
//! translation itself lives outside this crate.
//!
//! # Example
//!
//! ```ignore
//! use spark_gestures::{InputSample, Manager, ManagerOptions};
//!
//! let mut manager = Manager::new(0usize, ManagerOptions::default())?;
//! manager.recognize(&InputSample::start(10.0, 10.0))?;
//! manager.recognize(&InputSample::moved(30.0, 10.0, 20.0, 0.0))?;
//! manager.recognize(&InputSample::end(30.0, 10.0))?;
//! ```

mod sample;

pub use sample::*;

/// A producer of samples attached to a manager.
///
/// The manager owns the attached source and calls `destroy` exactly once,
/// when the manager itself is destroyed.
pub trait InputSource {
    /// Unbind from the platform and release any resources.
    fn destroy(&mut self);
}

/// Something a manager can be bound to.
///
/// Supplies the touch-action directive declared on the target itself, used
/// when the manager options do not set one.
pub trait GestureTarget {
    fn touch_action(&self) -> Option<String> {
        None
    }
}

/// A component index carries no directive of its own.
impl GestureTarget for usize {}

impl GestureTarget for () {}

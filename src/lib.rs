//! # spark-gestures
//!
//! Gesture recognizer arbitration for Spark UIs.
//!
//! Several recognizers (pan, tap, pinch...) watch the same stream of
//! normalized input samples. The [`Manager`] decides, sample by sample, which
//! of them may run: the first recognizer to become active claims focus for the
//! session, recognizers declared compatible with it keep running, and every
//! other recognizer is reset until the focus holder has recognized its gesture.
//!
//! ```text
//! InputSource → Manager::recognize → TouchActionCoordinator::update
//!             → arbitration loop → Recognizer state → events
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Recognizer states, state sets, directions, ids
//! - [`input`] - Normalized samples, input source and target traits
//! - [`recognizer`] - Recognizer state machine and the `Gesture` contract
//! - [`manager`] - Collection, session and arbitration
//! - [`events`] - Event emitter and the manager back-reference
//! - [`touch_action`] - Touch-action coordinator contract

pub mod error;
pub mod events;
pub mod input;
pub mod manager;
pub mod recognizer;
pub mod touch_action;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{GestureError, GestureFault};

pub use events::{EventEmitter, GestureEvent, GestureHandler, HandlerId, ManagerHandle};

pub use input::{GestureTarget, InputPhase, InputSample, InputSource};

pub use manager::{
    Lookup, Manager, ManagerOptions, RecognizerDecl, RecognizerFactory, ResolvedOptions, Session,
};

pub use recognizer::{FnGesture, Gesture, Recognizer, RecognizerOptions};

pub use touch_action::{DirectiveTouchAction, TouchActionCoordinator, DEFAULT_TOUCH_ACTION};

//! Error types for manager and recognizer operations.
//!
//! Lookup misses are not errors: `get`/`remove` return `Ok(None)`.

use thiserror::Error;

use crate::types::RecognizerId;

/// Errors surfaced by the manager and recognizers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GestureError {
    /// An operation was invoked on a manager after `destroy()`.
    #[error("manager already destroyed, cannot {operation}")]
    Destroyed {
        /// The rejected operation.
        operation: &'static str,
    },

    /// A compatibility declaration named a recognizer that is not registered.
    #[error("no recognizer registered for {name:?}")]
    UnknownRecognizer {
        /// Event name or id that failed to resolve.
        name: String,
    },

    /// A gesture reported a fault while processing a sample.
    #[error("recognizer {id} ({event}) faulted: {source}")]
    Fault {
        id: RecognizerId,
        event: String,
        #[source]
        source: GestureFault,
    },
}

/// A fault reported by a `Gesture` implementation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GestureFault {
    /// The sample carried data the gesture cannot interpret.
    #[error("invalid sample: {reason}")]
    InvalidSample { reason: String },

    /// The gesture reached an internal state it cannot recover from.
    #[error("internal gesture error: {reason}")]
    Internal { reason: String },
}

impl GestureFault {
    pub fn invalid_sample(reason: impl Into<String>) -> Self {
        Self::InvalidSample { reason: reason.into() }
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal { reason: reason.into() }
    }
}

/// Result alias for manager operations.
pub type Result<T> = std::result::Result<T, GestureError>;

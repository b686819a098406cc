//! Recognizer Module - Recognizer state machine and gesture contract
//!
//! A `Recognizer` wraps a `Gesture` (the geometry, supplied by the caller)
//! with the state machine the manager arbitrates over:
//!
//! ```text
//! Possible -> Began -> Changed* -> Ended | Recognized | Cancelled
//!          \-> Recognized | Failed
//! ```
//!
//! `Recognized` returns to `Possible` on the next sample. `Cancelled` and
//! `Failed` stay inert until `reset()` or the first sample of a new session.
//!
//! # Example
//!
//! ```ignore
//! use spark_gestures::{Recognizer, RecognizerState};
//!
//! let tap = Recognizer::from_fn("tap", |sample, _state| {
//!     Ok(if sample.is_final { RecognizerState::Recognized } else { RecognizerState::Possible })
//! });
//! ```

use std::collections::HashSet;

use crate::error::{GestureError, GestureFault};
use crate::events::{GestureEvent, ManagerHandle};
use crate::input::InputSample;
use crate::types::{RecognizerId, RecognizerState, StateSet};

// =============================================================================
// GESTURE CONTRACT
// =============================================================================

/// Geometry of a single gesture type.
pub trait Gesture {
    /// Inspect `sample` and return the state the recognizer should move to.
    ///
    /// `state` is the recognizer's current state.
    fn process(
        &mut self,
        sample: &InputSample,
        state: RecognizerState,
    ) -> Result<RecognizerState, GestureFault>;

    /// Clear any tracking data accumulated for the current session.
    fn reset(&mut self) {}
}

/// Adapter running a closure as a `Gesture`. See `Recognizer::from_fn`.
pub struct FnGesture<F>(F);

impl<F> Gesture for FnGesture<F>
where
    F: FnMut(&InputSample, RecognizerState) -> Result<RecognizerState, GestureFault>,
{
    fn process(
        &mut self,
        sample: &InputSample,
        state: RecognizerState,
    ) -> Result<RecognizerState, GestureFault> {
        (self.0)(sample, state)
    }
}

// =============================================================================
// OPTIONS
// =============================================================================

/// Options common to every recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizerOptions {
    /// Event name, also used for lookup
    pub event: String,
    /// Disabled recognizers fail on every sample
    pub enable: bool,
}

impl RecognizerOptions {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            enable: true,
        }
    }

    pub fn with_enable(mut self, enable: bool) -> Self {
        self.enable = enable;
        self
    }
}

// =============================================================================
// RECOGNIZER
// =============================================================================

/// A stateful recognizer arbitrated by a `Manager`.
pub struct Recognizer {
    id: RecognizerId,
    options: RecognizerOptions,
    state: RecognizerState,
    simultaneous: HashSet<RecognizerId>,
    manager: Option<ManagerHandle>,
    gesture: Box<dyn Gesture>,
}

impl Recognizer {
    /// Create a recognizer emitting `event`.
    pub fn new(event: impl Into<String>, gesture: impl Gesture + 'static) -> Self {
        Self::with_options(RecognizerOptions::new(event), gesture)
    }

    /// Create a recognizer whose gesture is a closure with no tracking data.
    pub fn from_fn<F>(event: impl Into<String>, process: F) -> Self
    where
        F: FnMut(&InputSample, RecognizerState) -> Result<RecognizerState, GestureFault> + 'static,
    {
        Self::new(event, FnGesture(process))
    }

    pub fn with_options(options: RecognizerOptions, gesture: impl Gesture + 'static) -> Self {
        Self {
            id: RecognizerId::next(),
            options,
            state: RecognizerState::Possible,
            simultaneous: HashSet::new(),
            manager: None,
            gesture: Box::new(gesture),
        }
    }

    pub fn id(&self) -> RecognizerId {
        self.id
    }

    pub fn event(&self) -> &str {
        &self.options.event
    }

    pub fn options(&self) -> &RecognizerOptions {
        &self.options
    }

    /// Replace the options. The recognizer keeps its id and state.
    pub fn set_options(&mut self, options: RecognizerOptions) -> &mut Self {
        self.options = options;
        self
    }

    pub fn set_enable(&mut self, enable: bool) -> &mut Self {
        self.options.enable = enable;
        self
    }

    pub fn state(&self) -> RecognizerState {
        self.state
    }

    /// The owning manager, if attached.
    pub fn manager(&self) -> Option<&ManagerHandle> {
        self.manager.as_ref()
    }

    pub(crate) fn attach(&mut self, manager: ManagerHandle) {
        self.manager = Some(manager);
    }

    pub(crate) fn detach(&mut self) {
        self.manager = None;
    }

    // -------------------------------------------------------------------------
    // Compatibility
    // -------------------------------------------------------------------------

    /// Whether this recognizer may run while `other` holds focus.
    pub fn can_recognize_with(&self, other: RecognizerId) -> bool {
        self.simultaneous.contains(&other)
    }

    /// Allow this recognizer to run alongside `other`. One direction only;
    /// `Manager::recognize_with` links both.
    pub fn recognize_with(&mut self, other: RecognizerId) -> &mut Self {
        if other != self.id {
            self.simultaneous.insert(other);
        }
        self
    }

    pub fn drop_recognize_with(&mut self, other: RecognizerId) -> &mut Self {
        self.simultaneous.remove(&other);
        self
    }

    /// Ids this recognizer may run alongside.
    pub fn simultaneous(&self) -> impl Iterator<Item = RecognizerId> + '_ {
        self.simultaneous.iter().copied()
    }

    // -------------------------------------------------------------------------
    // State machine
    // -------------------------------------------------------------------------

    /// Run the gesture on one sample and emit for the resulting state.
    ///
    /// On a gesture fault the recognizer is reset before the error is returned.
    pub fn recognize(&mut self, sample: &InputSample) -> Result<(), GestureError> {
        if !self.options.enable {
            self.reset();
            self.state = RecognizerState::Failed;
            return Ok(());
        }

        match self.state {
            RecognizerState::Recognized => self.state = RecognizerState::Possible,
            RecognizerState::Cancelled | RecognizerState::Failed => {
                if !sample.is_first {
                    return Ok(());
                }
                self.reset();
            }
            _ => {}
        }

        match self.gesture.process(sample, self.state) {
            Ok(next) => self.state = next,
            Err(source) => {
                self.reset();
                return Err(GestureError::Fault {
                    id: self.id,
                    event: self.options.event.clone(),
                    source,
                });
            }
        }

        if self.state.is_in(StateSet::ACTIVE | StateSet::CANCELLED | StateSet::RECOGNIZED) {
            self.emit(sample);
        }
        Ok(())
    }

    /// Return to `Possible` and clear gesture tracking.
    pub fn reset(&mut self) {
        self.gesture.reset();
        self.state = RecognizerState::Possible;
    }

    fn emit(&self, sample: &InputSample) {
        let Some(manager) = &self.manager else {
            return;
        };

        let suffix = self.state.event_suffix();
        let make = |name: String| GestureEvent {
            name,
            recognizer: self.id,
            state: self.state,
            sample: sample.clone(),
        };
        let suffixed = || make(format!("{}{}", self.options.event, suffix));

        // start/move fire before the bare event, end/cancel after it
        if matches!(self.state, RecognizerState::Began | RecognizerState::Changed) {
            manager.emit(&suffixed());
        }
        manager.emit(&make(self.options.event.clone()));
        if matches!(self.state, RecognizerState::Ended | RecognizerState::Cancelled) {
            manager.emit(&suffixed());
        }
    }
}

impl From<&Recognizer> for RecognizerId {
    fn from(recognizer: &Recognizer) -> Self {
        recognizer.id
    }
}

impl std::fmt::Debug for Recognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recognizer")
            .field("id", &self.id)
            .field("event", &self.options.event)
            .field("enable", &self.options.enable)
            .field("state", &self.state)
            .field("simultaneous", &self.simultaneous)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventEmitter;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Gesture that replays a fixed list of states, one per sample.
    struct Scripted {
        states: Vec<RecognizerState>,
        next: usize,
        resets: Rc<Cell<usize>>,
    }

    impl Scripted {
        fn new(states: Vec<RecognizerState>) -> Self {
            Self { states, next: 0, resets: Rc::new(Cell::new(0)) }
        }
    }

    impl Gesture for Scripted {
        fn process(
            &mut self,
            _sample: &InputSample,
            state: RecognizerState,
        ) -> Result<RecognizerState, GestureFault> {
            let next = self.states.get(self.next).copied().unwrap_or(state);
            self.next += 1;
            Ok(next)
        }

        fn reset(&mut self) {
            self.resets.set(self.resets.get() + 1);
        }
    }

    fn moved() -> InputSample {
        InputSample::moved(10.0, 0.0, 10.0, 0.0)
    }

    #[test]
    fn test_initial_state() {
        let r = Recognizer::new("pan", Scripted::new(vec![]));
        assert_eq!(r.state(), RecognizerState::Possible);
        assert_eq!(r.event(), "pan");
        assert!(r.options().enable);
        assert!(r.manager().is_none());
    }

    #[test]
    fn test_follows_gesture_states() {
        use RecognizerState::*;
        let mut r = Recognizer::new("pan", Scripted::new(vec![Began, Changed, Ended]));

        r.recognize(&moved()).unwrap();
        assert_eq!(r.state(), Began);
        r.recognize(&moved()).unwrap();
        assert_eq!(r.state(), Changed);
        r.recognize(&moved()).unwrap();
        assert_eq!(r.state(), Ended);
    }

    #[test]
    fn test_disabled_recognizer_fails() {
        let gesture = Scripted::new(vec![RecognizerState::Began]);
        let resets = gesture.resets.clone();
        let mut r = Recognizer::new("pan", gesture);
        r.set_enable(false);

        r.recognize(&moved()).unwrap();
        assert_eq!(r.state(), RecognizerState::Failed);
        assert_eq!(resets.get(), 1);
    }

    #[test]
    fn test_recognized_returns_to_possible() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let mut r = Recognizer::from_fn("tap", move |_, state| {
            seen_clone.borrow_mut().push(state);
            Ok(RecognizerState::Recognized)
        });

        r.recognize(&moved()).unwrap();
        r.recognize(&moved()).unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![RecognizerState::Possible, RecognizerState::Possible]
        );
    }

    #[test]
    fn test_failed_is_inert_until_new_session() {
        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();
        let mut r = Recognizer::from_fn("press", move |_, _| {
            calls_clone.set(calls_clone.get() + 1);
            Ok(RecognizerState::Failed)
        });

        r.recognize(&moved()).unwrap();
        r.recognize(&moved()).unwrap();
        assert_eq!(calls.get(), 1);

        r.recognize(&InputSample::start(0.0, 0.0)).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut r = Recognizer::new("pan", Scripted::new(vec![RecognizerState::Changed]));
        r.reset();
        assert_eq!(r.state(), RecognizerState::Possible);

        r.recognize(&moved()).unwrap();
        r.reset();
        assert_eq!(r.state(), RecognizerState::Possible);
    }

    #[test]
    fn test_fault_resets_and_reports() {
        let mut r = Recognizer::from_fn("pinch", |_, state| match state {
            RecognizerState::Possible => Ok(RecognizerState::Began),
            _ => Err(GestureFault::internal("lost pointer")),
        });

        r.recognize(&moved()).unwrap();
        assert_eq!(r.state(), RecognizerState::Began);

        let err = r.recognize(&moved()).unwrap_err();
        assert!(matches!(err, GestureError::Fault { ref event, .. } if event == "pinch"));
        assert_eq!(r.state(), RecognizerState::Possible);
    }

    #[test]
    fn test_compatibility_is_one_directional() {
        let mut a = Recognizer::new("pan", Scripted::new(vec![]));
        let b = Recognizer::new("swipe", Scripted::new(vec![]));

        a.recognize_with(b.id());
        assert!(a.can_recognize_with(b.id()));
        assert!(!b.can_recognize_with(a.id()));

        a.drop_recognize_with(b.id());
        assert!(!a.can_recognize_with(b.id()));
    }

    #[test]
    fn test_cannot_recognize_with_itself() {
        let mut a = Recognizer::new("pan", Scripted::new(vec![]));
        let id = a.id();
        a.recognize_with(id);
        assert!(!a.can_recognize_with(id));
    }

    #[test]
    fn test_emits_suffixed_events_in_order() {
        use RecognizerState::*;
        let emitter = Rc::new(EventEmitter::default());
        let names = Rc::new(RefCell::new(Vec::new()));
        let names_clone = names.clone();
        emitter.on("pan panstart panmove panend", move |event| {
            names_clone.borrow_mut().push(event.name.clone());
        });

        let mut r = Recognizer::new("pan", Scripted::new(vec![Began, Changed, Ended]));
        r.attach(ManagerHandle::new(&emitter));
        for _ in 0..3 {
            r.recognize(&moved()).unwrap();
        }

        assert_eq!(
            *names.borrow(),
            vec!["panstart", "pan", "panmove", "pan", "pan", "panend"]
        );
    }

    #[test]
    fn test_no_emit_when_detached_or_possible() {
        let emitter = Rc::new(EventEmitter::default());
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        emitter.on("tap", move |_| count_clone.set(count_clone.get() + 1));

        let mut r = Recognizer::new("tap", Scripted::new(vec![
            RecognizerState::Possible,
            RecognizerState::Recognized,
            RecognizerState::Recognized,
        ]));
        r.attach(ManagerHandle::new(&emitter));
        r.recognize(&moved()).unwrap();
        assert_eq!(count.get(), 0);

        r.recognize(&moved()).unwrap();
        assert_eq!(count.get(), 1);

        r.detach();
        r.recognize(&moved()).unwrap();
        assert_eq!(count.get(), 1);
    }
}

//! Events Module - Gesture event emission and handler registry
//!
//! The manager owns an `EventEmitter`; recognizers reach it through a
//! non-owning `ManagerHandle` and emit as their state changes.
//!
//! # API
//!
//! - `on(events, handler)` - Subscribe to one or more space-separated events
//! - `off(events)` - Remove every handler for the named events
//! - `off_handler(id)` - Remove a single handler
//! - `emit(event)` - Deliver an event to its handlers (and the external sink)
//!
//! # Example
//!
//! ```ignore
//! let id = manager.on("panstart panmove", |event| {
//!     println!("{} at ({}, {})", event.name, event.sample.center.x, event.sample.center.y);
//! })?;
//! manager.off_handler(id)?;
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::input::InputSample;
use crate::types::{RecognizerId, RecognizerState};

// =============================================================================
// TYPES
// =============================================================================

/// An event emitted by a recognizer.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureEvent {
    /// Full event name, e.g. `"panstart"` or `"tap"`
    pub name: String,
    /// Recognizer that emitted the event
    pub recognizer: RecognizerId,
    /// Recognizer state at emission time
    pub state: RecognizerState,
    /// Sample that caused the transition
    pub sample: InputSample,
}

/// Handler for gesture events.
pub type GestureHandler = Rc<dyn Fn(&GestureEvent)>;

/// Identifies a registered handler for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(usize);

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

struct HandlerRegistry {
    handlers: HashMap<String, Vec<(usize, GestureHandler)>>,
    next_id: usize,
}

impl HandlerRegistry {
    fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

// =============================================================================
// EMITTER
// =============================================================================

/// Event emitter owned by a manager.
///
/// Uses interior mutability so handlers may subscribe or unsubscribe while an
/// event is being delivered.
pub struct EventEmitter {
    registry: RefCell<HandlerRegistry>,
    dom_events: Cell<bool>,
    sink: RefCell<Option<GestureHandler>>,
}

impl EventEmitter {
    pub fn new(dom_events: bool) -> Self {
        Self {
            registry: RefCell::new(HandlerRegistry::new()),
            dom_events: Cell::new(dom_events),
            sink: RefCell::new(None),
        }
    }

    /// Register `handler` for each space-separated name in `events`.
    pub fn on<F>(&self, events: &str, handler: F) -> HandlerId
    where
        F: Fn(&GestureEvent) + 'static,
    {
        let handler: GestureHandler = Rc::new(handler);
        let mut reg = self.registry.borrow_mut();
        let id = reg.next_id();
        for name in events.split_whitespace() {
            reg.handlers
                .entry(name.to_string())
                .or_default()
                .push((id, handler.clone()));
        }
        HandlerId(id)
    }

    /// Remove every handler for each space-separated name in `events`.
    pub fn off(&self, events: &str) {
        let mut reg = self.registry.borrow_mut();
        for name in events.split_whitespace() {
            reg.handlers.remove(name);
        }
    }

    /// Remove a single handler from every event it was registered for.
    pub fn off_handler(&self, id: HandlerId) {
        let mut reg = self.registry.borrow_mut();
        for list in reg.handlers.values_mut() {
            list.retain(|(handler_id, _)| *handler_id != id.0);
        }
        reg.handlers.retain(|_, list| !list.is_empty());
    }

    /// Number of handlers registered for `name`.
    pub fn handler_count(&self, name: &str) -> usize {
        self.registry
            .borrow()
            .handlers
            .get(name)
            .map_or(0, |list| list.len())
    }

    /// Deliver `event` to the external sink (when enabled) and its handlers.
    pub fn emit(&self, event: &GestureEvent) {
        if self.dom_events.get() {
            let sink = self.sink.borrow().clone();
            if let Some(sink) = sink {
                sink(event);
            }
        }

        // Snapshot so handlers can call on/off during delivery
        let handlers: Vec<GestureHandler> = self
            .registry
            .borrow()
            .handlers
            .get(&event.name)
            .map(|list| list.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();

        for handler in handlers {
            handler(event);
        }
    }

    /// Forward emitted events to `sink` while external events are enabled.
    pub fn set_sink<F>(&self, sink: F)
    where
        F: Fn(&GestureEvent) + 'static,
    {
        *self.sink.borrow_mut() = Some(Rc::new(sink));
    }

    pub fn set_dom_events(&self, enabled: bool) {
        self.dom_events.set(enabled);
    }

    pub fn dom_events(&self) -> bool {
        self.dom_events.get()
    }

    /// Drop every handler and the sink.
    pub fn clear(&self) {
        self.registry.borrow_mut().handlers.clear();
        *self.sink.borrow_mut() = None;
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new(false)
    }
}

// =============================================================================
// MANAGER HANDLE
// =============================================================================

/// Non-owning reference from a recognizer back to its manager.
#[derive(Clone)]
pub struct ManagerHandle {
    emitter: Weak<EventEmitter>,
}

impl ManagerHandle {
    pub(crate) fn new(emitter: &Rc<EventEmitter>) -> Self {
        Self {
            emitter: Rc::downgrade(emitter),
        }
    }

    /// Whether the manager is still alive.
    pub fn is_alive(&self) -> bool {
        self.emitter.strong_count() > 0
    }

    /// Emit through the manager. Returns false if the manager is gone.
    pub fn emit(&self, event: &GestureEvent) -> bool {
        match self.emitter.upgrade() {
            Some(emitter) => {
                emitter.emit(event);
                true
            }
            None => false,
        }
    }

    /// Check whether two handles point at the same manager.
    pub fn same_manager(&self, other: &ManagerHandle) -> bool {
        Weak::ptr_eq(&self.emitter, &other.emitter)
    }
}

impl std::fmt::Debug for ManagerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(name: &str) -> GestureEvent {
        GestureEvent {
            name: name.to_string(),
            recognizer: RecognizerId::next(),
            state: RecognizerState::Began,
            sample: InputSample::start(0.0, 0.0),
        }
    }

    #[test]
    fn test_on_multiple_names() {
        let emitter = EventEmitter::default();
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();

        emitter.on("panstart panend", move |_| {
            count_clone.set(count_clone.get() + 1);
        });

        emitter.emit(&event("panstart"));
        emitter.emit(&event("panmove"));
        emitter.emit(&event("panend"));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_off_removes_all_handlers_for_name() {
        let emitter = EventEmitter::default();
        emitter.on("tap", |_| {});
        emitter.on("tap", |_| {});
        assert_eq!(emitter.handler_count("tap"), 2);

        emitter.off("tap");
        assert_eq!(emitter.handler_count("tap"), 0);
    }

    #[test]
    fn test_off_handler_removes_only_that_handler() {
        let emitter = EventEmitter::default();
        let first = emitter.on("tap press", |_| {});
        emitter.on("tap", |_| {});

        emitter.off_handler(first);
        assert_eq!(emitter.handler_count("tap"), 1);
        assert_eq!(emitter.handler_count("press"), 0);
    }

    #[test]
    fn test_handler_may_unsubscribe_during_emit() {
        let emitter = Rc::new(EventEmitter::default());
        let weak = Rc::downgrade(&emitter);
        emitter.on("tap", move |_| {
            if let Some(emitter) = weak.upgrade() {
                emitter.off("tap");
            }
        });

        emitter.emit(&event("tap"));
        assert_eq!(emitter.handler_count("tap"), 0);
    }

    #[test]
    fn test_sink_only_when_dom_events_enabled() {
        let emitter = EventEmitter::new(false);
        let seen = Rc::new(Cell::new(0));
        let seen_clone = seen.clone();
        emitter.set_sink(move |_| seen_clone.set(seen_clone.get() + 1));

        emitter.emit(&event("pan"));
        assert_eq!(seen.get(), 0);

        emitter.set_dom_events(true);
        emitter.emit(&event("pan"));
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_handle_does_not_keep_manager_alive() {
        let emitter = Rc::new(EventEmitter::default());
        let handle = ManagerHandle::new(&emitter);
        assert!(handle.is_alive());
        assert!(handle.emit(&event("pan")));

        drop(emitter);
        assert!(!handle.is_alive());
        assert!(!handle.emit(&event("pan")));
    }
}

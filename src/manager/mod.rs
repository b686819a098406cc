//! Manager Module - Recognizer collection, session and arbitration
//!
//! The manager owns an ordered list of recognizers and decides, for every
//! sample, which of them may run:
//!
//! - With no focus holder, every recognizer runs. The first one (in collection
//!   order) to become active claims focus for the session.
//! - While a recognizer holds focus, only it and the recognizers declared
//!   compatible with it run. Every other recognizer is reset.
//! - Focus is released once the holder reaches `Recognized`.
//!
//! # API
//!
//! - `recognize(sample)` - Run arbitration for one sample
//! - `add` / `remove` / `get` / `get_mut` - Collection management
//! - `recognize_with` / `drop_recognize_with` - Symmetric compatibility
//! - `enable` / `stop` / `destroy` - Lifecycle
//! - `on` / `off` / `emit` - Event surface
//!
//! # Example
//!
//! ```ignore
//! use spark_gestures::{Manager, ManagerOptions, Recognizer};
//!
//! let mut manager = Manager::new(component_index, ManagerOptions::default())?;
//! let pan = manager.add(Recognizer::new("pan", PanGesture::default()))?.id();
//! let swipe = manager.add(Recognizer::new("swipe", SwipeGesture::default()))?.id();
//! manager.recognize_with(swipe, pan)?;
//!
//! manager.on("panstart", |event| println!("pan from {:?}", event.sample.center))?;
//! manager.recognize(&sample)?;
//! ```

mod options;

pub use options::*;

use std::rc::Rc;

use spark_signals::{signal, Signal};

use crate::error::{GestureError, Result};
use crate::events::{EventEmitter, GestureEvent, HandlerId, ManagerHandle};
use crate::input::{GestureTarget, InputSample, InputSource};
use crate::recognizer::Recognizer;
use crate::touch_action::{DirectiveTouchAction, TouchActionCoordinator};
use crate::types::{RecognizerId, RecognizerState};

// =============================================================================
// TYPES
// =============================================================================

/// Identifies a recognizer by id or by event name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Id(RecognizerId),
    Event(&'a str),
}

impl From<RecognizerId> for Lookup<'_> {
    fn from(id: RecognizerId) -> Self {
        Self::Id(id)
    }
}

impl From<&Recognizer> for Lookup<'_> {
    fn from(recognizer: &Recognizer) -> Self {
        Self::Id(recognizer.id())
    }
}

impl<'a> From<&'a str> for Lookup<'a> {
    fn from(event: &'a str) -> Self {
        Self::Event(event)
    }
}

impl<'a> From<&'a String> for Lookup<'a> {
    fn from(event: &'a String) -> Self {
        Self::Event(event.as_str())
    }
}

impl std::fmt::Display for Lookup<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Event(event) => f.write_str(event),
        }
    }
}

/// State of one continuous gesture interaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    /// Set by `stop()`; ignored samples until the next session
    pub stopped: bool,
    /// Recognizer holding focus, if any
    pub cur_recognizer: Option<RecognizerId>,
}

// =============================================================================
// MANAGER
// =============================================================================

/// Arbitrates a set of recognizers over a stream of samples.
///
/// Not thread-safe: all calls must come from the thread that created it.
pub struct Manager {
    enabled: Signal<bool>,
    focused: Signal<Option<RecognizerId>>,
    options: ResolvedOptions,
    recognizers: Vec<Recognizer>,
    session: Session,
    emitter: Rc<EventEmitter>,
    touch_action: Box<dyn TouchActionCoordinator>,
    input: Option<Box<dyn InputSource>>,
    target: Option<Box<dyn GestureTarget>>,
    destroyed: bool,
}

impl Manager {
    /// Create a manager bound to `target` using the stock touch-action
    /// coordinator.
    pub fn new(target: impl GestureTarget + 'static, options: ManagerOptions) -> Result<Self> {
        Self::with_touch_action(target, options, DirectiveTouchAction::new())
    }

    /// Create a manager with a custom touch-action coordinator.
    pub fn with_touch_action(
        target: impl GestureTarget + 'static,
        options: ManagerOptions,
        touch_action: impl TouchActionCoordinator + 'static,
    ) -> Result<Self> {
        let mut options = options;
        if options.touch_action.is_none() {
            options.touch_action = target.touch_action();
        }
        let options = options.merge(ManagerOptions::defaults());

        let resolved = ResolvedOptions {
            dom_events: options.dom_events.unwrap_or(false),
            touch_action: options
                .touch_action
                .unwrap_or_else(|| crate::touch_action::DEFAULT_TOUCH_ACTION.to_string()),
        };

        let mut manager = Self {
            enabled: signal(true),
            focused: signal(None),
            emitter: Rc::new(EventEmitter::new(resolved.dom_events)),
            options: resolved,
            recognizers: Vec::new(),
            session: Session::default(),
            touch_action: Box::new(touch_action),
            input: None,
            target: Some(Box::new(target)),
            destroyed: false,
        };
        manager.touch_action.set(&manager.options.touch_action);

        for decl in options.recognizers.unwrap_or_default() {
            let (recognizer, with) = decl.build();
            let id = manager.add(recognizer)?.id();
            if let Some(event) = with {
                manager.recognize_with(id, event.as_str())?;
            }
        }

        Ok(manager)
    }

    fn ensure_alive(&self, operation: &'static str) -> Result<()> {
        if self.destroyed {
            tracing::warn!(operation, "manager used after destroy");
            return Err(GestureError::Destroyed { operation });
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Reactive enabled flag.
    pub fn enabled_signal(&self) -> Signal<bool> {
        self.enabled.clone()
    }

    pub fn session(&self) -> Session {
        self.session
    }

    /// Recognizer currently holding focus.
    pub fn focused(&self) -> Option<RecognizerId> {
        self.session.cur_recognizer
    }

    /// Reactive mirror of `focused()`.
    pub fn focused_signal(&self) -> Signal<Option<RecognizerId>> {
        self.focused.clone()
    }

    /// The bound target, `None` once destroyed.
    pub fn target(&self) -> Option<&dyn GestureTarget> {
        self.target.as_deref()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn len(&self) -> usize {
        self.recognizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recognizers.is_empty()
    }

    /// Recognizers in arbitration order.
    pub fn recognizers(&self) -> impl Iterator<Item = &Recognizer> {
        self.recognizers.iter()
    }

    /// Handle recognizers use to reach this manager.
    pub fn handle(&self) -> ManagerHandle {
        ManagerHandle::new(&self.emitter)
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Enable or disable recognition. A disabled manager ignores samples.
    pub fn enable(&mut self, enable: bool) -> Result<()> {
        self.ensure_alive("enable")?;
        self.enabled.set(enable);
        Ok(())
    }

    /// Ignore every further sample of the current session.
    pub fn stop(&mut self) -> Result<()> {
        self.ensure_alive("stop")?;
        tracing::debug!("session stopped");
        self.session.stopped = true;
        Ok(())
    }

    /// Tear down: clear the session and handlers, release the input source and
    /// the target. Every later call fails with `GestureError::Destroyed`.
    pub fn destroy(&mut self) -> Result<()> {
        self.ensure_alive("destroy")?;
        tracing::debug!(recognizers = self.recognizers.len(), "destroying manager");

        self.emitter.clear();
        self.session = Session::default();
        self.set_focus(None);
        if let Some(mut input) = self.input.take() {
            input.destroy();
        }
        self.target = None;
        for recognizer in &mut self.recognizers {
            recognizer.detach();
        }
        self.destroyed = true;
        Ok(())
    }

    /// Attach the input source feeding this manager, destroying any previous one.
    pub fn set_input(&mut self, input: impl InputSource + 'static) -> Result<()> {
        self.ensure_alive("set_input")?;
        if let Some(mut previous) = self.input.replace(Box::new(input)) {
            previous.destroy();
        }
        Ok(())
    }

    /// Apply a new touch-action directive.
    pub fn set_touch_action(&mut self, directive: impl Into<String>) -> Result<()> {
        self.ensure_alive("set_touch_action")?;
        self.options.touch_action = directive.into();
        self.touch_action.set(&self.options.touch_action);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Arbitration
    // -------------------------------------------------------------------------

    fn begin_session(&mut self) {
        if self.session != Session::default() {
            tracing::trace!(session = ?self.session, "new session");
        }
        self.session = Session::default();
        self.set_focus(None);
    }

    fn set_focus(&mut self, focus: Option<RecognizerId>) {
        self.session.cur_recognizer = focus;
        if self.focused.get() != focus {
            self.focused.set(focus);
        }
    }

    /// Run every eligible recognizer on `sample`.
    ///
    /// A recognizer whose gesture faults is logged and reset; the remaining
    /// recognizers still run.
    pub fn recognize(&mut self, sample: &InputSample) -> Result<()> {
        self.ensure_alive("recognize")?;

        if sample.is_first {
            self.begin_session();
        }
        if !self.enabled.get() || self.session.stopped {
            return Ok(());
        }

        self.touch_action.update(sample);

        let mut focus = self.session.cur_recognizer;
        if let Some(id) = focus {
            let released = self
                .recognizers
                .iter()
                .find(|r| r.id() == id)
                .is_none_or(|r| r.state() == RecognizerState::Recognized);
            if released {
                tracing::debug!(recognizer = %id, "focus released");
                focus = None;
            }
        }

        for recognizer in &mut self.recognizers {
            let allowed = match focus {
                None => true,
                Some(holder) => recognizer.id() == holder || recognizer.can_recognize_with(holder),
            };

            if allowed {
                if let Err(err) = recognizer.recognize(sample) {
                    tracing::warn!(error = %err, "recognizer faulted, reset");
                    recognizer.reset();
                }
            } else {
                recognizer.reset();
            }

            if focus.is_none() && recognizer.state().is_active() {
                tracing::debug!(
                    recognizer = %recognizer.id(),
                    event = recognizer.event(),
                    "focus claimed"
                );
                focus = Some(recognizer.id());
            }
        }

        self.set_focus(focus);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Collection
    // -------------------------------------------------------------------------

    fn position(&self, lookup: Lookup<'_>) -> Option<usize> {
        match lookup {
            Lookup::Id(id) => self.recognizers.iter().position(|r| r.id() == id),
            Lookup::Event(event) => self.recognizers.iter().position(|r| r.event() == event),
        }
    }

    fn resolve(&self, lookup: Lookup<'_>) -> Result<RecognizerId> {
        self.position(lookup)
            .map(|index| self.recognizers[index].id())
            .ok_or_else(|| GestureError::UnknownRecognizer {
                name: lookup.to_string(),
            })
    }

    /// Find a recognizer by id or by event name (first match in order).
    pub fn get<'a>(&self, lookup: impl Into<Lookup<'a>>) -> Result<Option<&Recognizer>> {
        self.ensure_alive("get")?;
        Ok(self.position(lookup.into()).map(|index| &self.recognizers[index]))
    }

    pub fn get_mut<'a>(&mut self, lookup: impl Into<Lookup<'a>>) -> Result<Option<&mut Recognizer>> {
        self.ensure_alive("get_mut")?;
        Ok(self
            .position(lookup.into())
            .map(|index| &mut self.recognizers[index]))
    }

    /// Append a recognizer. No duplicate detection.
    pub fn add(&mut self, recognizer: Recognizer) -> Result<&mut Recognizer> {
        self.ensure_alive("add")?;
        let handle = self.handle();
        self.recognizers.push(recognizer);
        let index = self.recognizers.len() - 1;
        let added = &mut self.recognizers[index];
        added.attach(handle);
        Ok(added)
    }

    /// Remove and return a recognizer, or `None` if it is not registered.
    pub fn remove<'a>(&mut self, lookup: impl Into<Lookup<'a>>) -> Result<Option<Recognizer>> {
        self.ensure_alive("remove")?;
        let Some(index) = self.position(lookup.into()) else {
            return Ok(None);
        };

        let mut recognizer = self.recognizers.remove(index);
        recognizer.detach();
        if self.session.cur_recognizer == Some(recognizer.id()) {
            self.set_focus(None);
        }
        Ok(Some(recognizer))
    }

    /// Let `a` and `b` run alongside each other (both directions).
    pub fn recognize_with<'a, 'b>(
        &mut self,
        a: impl Into<Lookup<'a>>,
        b: impl Into<Lookup<'b>>,
    ) -> Result<()> {
        self.ensure_alive("recognize_with")?;
        let a = self.resolve(a.into())?;
        let b = self.resolve(b.into())?;
        self.link(a, b, true);
        Ok(())
    }

    /// Undo `recognize_with` (both directions).
    pub fn drop_recognize_with<'a, 'b>(
        &mut self,
        a: impl Into<Lookup<'a>>,
        b: impl Into<Lookup<'b>>,
    ) -> Result<()> {
        self.ensure_alive("drop_recognize_with")?;
        let a = self.resolve(a.into())?;
        let b = self.resolve(b.into())?;
        self.link(a, b, false);
        Ok(())
    }

    fn link(&mut self, a: RecognizerId, b: RecognizerId, on: bool) {
        for recognizer in &mut self.recognizers {
            let other = if recognizer.id() == a {
                b
            } else if recognizer.id() == b {
                a
            } else {
                continue;
            };
            if on {
                recognizer.recognize_with(other);
            } else {
                recognizer.drop_recognize_with(other);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Subscribe to one or more space-separated event names.
    pub fn on<F>(&self, events: &str, handler: F) -> Result<HandlerId>
    where
        F: Fn(&GestureEvent) + 'static,
    {
        self.ensure_alive("on")?;
        Ok(self.emitter.on(events, handler))
    }

    /// Remove every handler for the space-separated event names.
    pub fn off(&self, events: &str) -> Result<()> {
        self.ensure_alive("off")?;
        self.emitter.off(events);
        Ok(())
    }

    pub fn off_handler(&self, id: HandlerId) -> Result<()> {
        self.ensure_alive("off_handler")?;
        self.emitter.off_handler(id);
        Ok(())
    }

    pub fn emit(&self, event: &GestureEvent) -> Result<()> {
        self.ensure_alive("emit")?;
        self.emitter.emit(event);
        Ok(())
    }

    /// Receive every emitted event while `dom_events` is enabled.
    pub fn set_event_sink<F>(&self, sink: F) -> Result<()>
    where
        F: Fn(&GestureEvent) + 'static,
    {
        self.ensure_alive("set_event_sink")?;
        self.emitter.set_sink(sink);
        Ok(())
    }

    pub fn set_dom_events(&mut self, enabled: bool) -> Result<()> {
        self.ensure_alive("set_dom_events")?;
        self.options.dom_events = enabled;
        self.emitter.set_dom_events(enabled);
        Ok(())
    }
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("enabled", &self.enabled.get())
            .field("options", &self.options)
            .field("session", &self.session)
            .field("recognizers", &self.recognizers)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

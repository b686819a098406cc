//! Manager configuration.
//!
//! Every field is optional; `merge` fills the unset ones from another set of
//! options (normally `ManagerOptions::defaults()`).

use crate::recognizer::{Recognizer, RecognizerOptions};
use crate::touch_action::DEFAULT_TOUCH_ACTION;

/// Builds a recognizer for a declaration.
pub type RecognizerFactory = Box<dyn FnOnce() -> Recognizer>;

/// One entry of the initial recognizer set.
pub struct RecognizerDecl {
    pub factory: RecognizerFactory,
    /// Replaces the recognizer's own options after construction
    pub options: Option<RecognizerOptions>,
    /// Event name of an earlier declaration this one may run alongside
    pub recognize_with: Option<String>,
}

impl RecognizerDecl {
    pub fn new<F>(factory: F) -> Self
    where
        F: FnOnce() -> Recognizer + 'static,
    {
        Self {
            factory: Box::new(factory),
            options: None,
            recognize_with: None,
        }
    }

    pub fn with_options(mut self, options: RecognizerOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn recognize_with(mut self, event: impl Into<String>) -> Self {
        self.recognize_with = Some(event.into());
        self
    }

    /// Construct the recognizer, applying option overrides.
    pub(crate) fn build(self) -> (Recognizer, Option<String>) {
        let mut recognizer = (self.factory)();
        if let Some(options) = self.options {
            recognizer.set_options(options);
        }
        (recognizer, self.recognize_with)
    }
}

impl std::fmt::Debug for RecognizerDecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecognizerDecl")
            .field("options", &self.options)
            .field("recognize_with", &self.recognize_with)
            .finish_non_exhaustive()
    }
}

/// Options accepted by `Manager::new`.
#[derive(Debug, Default)]
pub struct ManagerOptions {
    /// Forward emitted events to the external sink
    pub dom_events: Option<bool>,
    /// Touch-action directive; falls back to the target's, then the default
    pub touch_action: Option<String>,
    /// Initial recognizers, added in order
    pub recognizers: Option<Vec<RecognizerDecl>>,
}

impl ManagerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in defaults: no external events, no recognizers, `"pan-y"`.
    pub fn defaults() -> Self {
        Self {
            dom_events: Some(false),
            touch_action: Some(DEFAULT_TOUCH_ACTION.to_string()),
            recognizers: Some(Vec::new()),
        }
    }

    pub fn with_dom_events(mut self, enabled: bool) -> Self {
        self.dom_events = Some(enabled);
        self
    }

    pub fn with_touch_action(mut self, directive: impl Into<String>) -> Self {
        self.touch_action = Some(directive.into());
        self
    }

    pub fn with_recognizer(mut self, decl: RecognizerDecl) -> Self {
        self.recognizers.get_or_insert_with(Vec::new).push(decl);
        self
    }

    /// Fill every unset field from `fallback`.
    pub fn merge(self, fallback: ManagerOptions) -> Self {
        Self {
            dom_events: self.dom_events.or(fallback.dom_events),
            touch_action: self.touch_action.or(fallback.touch_action),
            recognizers: self.recognizers.or(fallback.recognizers),
        }
    }
}

/// Options after merging, as held by a live manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub dom_events: bool,
    pub touch_action: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecognizerState;

    #[test]
    fn test_merge_keeps_explicit_values() {
        let merged = ManagerOptions::new()
            .with_touch_action("none")
            .merge(ManagerOptions::defaults());

        assert_eq!(merged.touch_action.as_deref(), Some("none"));
        assert_eq!(merged.dom_events, Some(false));
        assert!(merged.recognizers.is_some_and(|r| r.is_empty()));
    }

    #[test]
    fn test_merge_leaves_unset_when_fallback_unset() {
        let merged = ManagerOptions::new().merge(ManagerOptions::new());
        assert!(merged.touch_action.is_none());
        assert!(merged.dom_events.is_none());
    }

    #[test]
    fn test_decl_applies_option_override() {
        let decl = RecognizerDecl::new(|| {
            Recognizer::from_fn("tap", |_, _| Ok(RecognizerState::Possible))
        })
        .with_options(RecognizerOptions::new("doubletap"))
        .recognize_with("tap");

        let (recognizer, with) = decl.build();
        assert_eq!(recognizer.event(), "doubletap");
        assert_eq!(with.as_deref(), Some("tap"));
    }
}

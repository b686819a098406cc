//! Touch-action coordination
//!
//! The coordinator receives the resolved directive once at construction and
//! then sees every dispatched sample so it can enforce platform scroll/zoom
//! constraints. How it does that is up to the host.

use crate::input::InputSample;

/// Directive used when neither the options nor the target declare one.
pub const DEFAULT_TOUCH_ACTION: &str = "pan-y";

/// Collaborator notified of the touch-action directive and of every sample.
pub trait TouchActionCoordinator {
    /// Apply a directive (e.g. `"pan-y"`, `"none"`, `"manipulation"`).
    fn set(&mut self, directive: &str);

    /// Observe a sample before any recognizer runs.
    fn update(&mut self, sample: &InputSample);
}

/// Coordinator that records the directive and counts samples.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveTouchAction {
    directive: String,
    updates: usize,
}

impl DirectiveTouchAction {
    pub fn new() -> Self {
        Self::default()
    }

    /// The directive last applied.
    pub fn directive(&self) -> &str {
        &self.directive
    }

    /// Number of samples observed.
    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl TouchActionCoordinator for DirectiveTouchAction {
    fn set(&mut self, directive: &str) {
        tracing::debug!(directive, "touch-action set");
        self.directive = directive.trim().to_lowercase();
    }

    fn update(&mut self, _sample: &InputSample) {
        self.updates += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_is_normalized() {
        let mut coordinator = DirectiveTouchAction::new();
        coordinator.set("  PAN-X ");
        assert_eq!(coordinator.directive(), "pan-x");
    }

    #[test]
    fn test_update_counts_samples() {
        let mut coordinator = DirectiveTouchAction::new();
        coordinator.update(&InputSample::start(0.0, 0.0));
        coordinator.update(&InputSample::end(0.0, 0.0));
        assert_eq!(coordinator.updates(), 2);
    }
}

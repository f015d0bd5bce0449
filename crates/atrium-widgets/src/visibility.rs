//! Viewport and document visibility gating.
//!
//! Off-screen or hidden-tab animation is wasted work, so continuous widgets
//! only run while their element intersects the viewport *and* the document
//! is visible. When the host cannot observe either signal the gate assumes
//! the document is visible and the element is not in view.

use tracing::trace;

/// Host document visibility, as reported by the page-visibility signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentVisibility {
    #[default]
    Visible,
    Hidden,
}

impl DocumentVisibility {
    /// Map an optional "document hidden" observation, defaulting to visible.
    #[must_use]
    pub fn from_hidden(hidden: Option<bool>) -> Self {
        match hidden {
            Some(true) => Self::Hidden,
            Some(false) | None => Self::Visible,
        }
    }
}

/// Combined in-view and document-visible signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewGate {
    in_view: bool,
    document: DocumentVisibility,
}

impl ViewGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a gate from environment probes that may be unavailable.
    #[must_use]
    pub fn from_environment(intersecting: Option<bool>, document_hidden: Option<bool>) -> Self {
        Self {
            in_view: intersecting.unwrap_or(false),
            document: DocumentVisibility::from_hidden(document_hidden),
        }
    }

    /// Record an intersection change. Returns whether [`is_open`](Self::is_open) changed.
    pub fn set_intersecting(&mut self, in_view: bool) -> bool {
        let before = self.is_open();
        self.in_view = in_view;
        self.report(before)
    }

    /// Record a visibility change. Returns whether [`is_open`](Self::is_open) changed.
    pub fn set_document_visibility(&mut self, document: DocumentVisibility) -> bool {
        let before = self.is_open();
        self.document = document;
        self.report(before)
    }

    #[must_use]
    pub fn in_view(&self) -> bool {
        self.in_view
    }

    #[must_use]
    pub fn document(&self) -> DocumentVisibility {
        self.document
    }

    /// Whether animation may run.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.in_view && self.document == DocumentVisibility::Visible
    }

    fn report(&self, before: bool) -> bool {
        let after = self.is_open();
        if before != after {
            trace!(in_view = self.in_view, document = ?self.document, open = after, "view gate changed");
        }
        before != after
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_environment_defaults_to_visible_not_in_view() {
        let gate = ViewGate::from_environment(None, None);
        assert!(!gate.in_view());
        assert_eq!(gate.document(), DocumentVisibility::Visible);
        assert!(!gate.is_open());
    }

    #[test]
    fn needs_both_signals() {
        let mut gate = ViewGate::new();
        assert!(gate.set_intersecting(true));
        assert!(gate.is_open());
        assert!(gate.set_document_visibility(DocumentVisibility::Hidden));
        assert!(!gate.is_open());
        assert!(!gate.set_intersecting(false));
        assert!(!gate.set_document_visibility(DocumentVisibility::Visible));
        assert!(!gate.is_open());
    }

    #[test]
    fn repeated_signal_reports_no_change() {
        let mut gate = ViewGate::from_environment(Some(true), Some(false));
        assert!(gate.is_open());
        assert!(!gate.set_intersecting(true));
    }
}

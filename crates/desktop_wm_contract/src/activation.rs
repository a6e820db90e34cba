//! Read-only "window activated" broadcast.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Snapshot of a window at the moment it became active.
///
/// Observers receive this by shared reference and cannot reach back into manager state.
pub struct WindowActivation {
    /// Stable window id.
    pub window_id: String,
    /// Window title as shown in the title bar and taskbar.
    pub title: String,
    /// Icon reference shared with the taskbar button.
    pub icon_ref: String,
    /// Z-index assigned by this activation.
    pub z_index: u32,
}

/// Subscriber to window activation notifications.
pub trait ActivationObserver {
    /// Called after the window manager finished activating a window.
    fn window_activated(&self, activation: &WindowActivation);
}

#[derive(Debug, Default)]
/// Observer that records activations in order.
pub struct RecordingActivationObserver {
    seen: RefCell<Vec<WindowActivation>>,
}

impl RecordingActivationObserver {
    /// Returns the ids of activated windows, oldest first.
    pub fn window_ids(&self) -> Vec<String> {
        self.seen
            .borrow()
            .iter()
            .map(|activation| activation.window_id.clone())
            .collect()
    }

    /// Returns the most recent activation, if any.
    pub fn last(&self) -> Option<WindowActivation> {
        self.seen.borrow().last().cloned()
    }
}

impl ActivationObserver for RecordingActivationObserver {
    fn window_activated(&self, activation: &WindowActivation) {
        self.seen.borrow_mut().push(activation.clone());
    }
}

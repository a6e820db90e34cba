//! Collaborator contracts between the desktop window manager and the services around it.
//!
//! The window manager never depends on concrete sound players, scripted assistants, or window
//! content. It calls out through the narrow traits in this crate, and every trait ships a no-op
//! adapter so a collaborator can always be absent.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod activation;
pub mod fs;
pub mod sound;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use activation::{ActivationObserver, RecordingActivationObserver, WindowActivation};
pub use fs::{FileSystemService, FsEntry, FsEntryKind, MemoryFileSystem, NoopFileSystemService};
pub use sound::{NoopSoundService, RecordingSoundService, SoundEffect, SoundService};

/// An action handed to an external collaborator instead of the window manager.
///
/// Specially flagged desktop icons and start-menu entries resolve to one of these rather than
/// to a window id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaboratorAction {
    /// Stable action name, for example `empty-recycle-bin`.
    pub name: String,
    /// Optional action payload.
    #[serde(default)]
    pub payload: Value,
}

impl CollaboratorAction {
    /// Creates an action without payload.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: Value::Null,
        }
    }
}

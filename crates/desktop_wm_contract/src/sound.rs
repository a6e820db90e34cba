//! Sound-effect hook and adapters.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Window lifecycle points that may play a sound.
pub enum SoundEffect {
    /// A window was minimized.
    Minimize,
    /// A window was maximized.
    Maximize,
    /// A window came back from minimized or maximized.
    Restore,
    /// A window was closed.
    Close,
    /// A user action was refused.
    Error,
}

impl SoundEffect {
    /// Returns a stable string token for asset lookup and debugging hooks.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Minimize => "minimize",
            Self::Maximize => "maximize",
            Self::Restore => "restore",
            Self::Close => "close",
            Self::Error => "error",
        }
    }
}

/// Host service that plays UI sound effects.
pub trait SoundService {
    /// Plays the effect. Failures are reported to the caller, which ignores them.
    fn play_sound_effect(&self, effect: SoundEffect) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op sound service for muted or unsupported targets.
pub struct NoopSoundService;

impl SoundService for NoopSoundService {
    fn play_sound_effect(&self, _effect: SoundEffect) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Default)]
/// Sound service that records every requested effect; used by tests and diagnostics.
pub struct RecordingSoundService {
    played: RefCell<Vec<SoundEffect>>,
}

impl RecordingSoundService {
    /// Returns the effects played so far, oldest first.
    pub fn played(&self) -> Vec<SoundEffect> {
        self.played.borrow().clone()
    }
}

impl SoundService for RecordingSoundService {
    fn play_sound_effect(&self, effect: SoundEffect) -> Result<(), String> {
        self.played.borrow_mut().push(effect);
        Ok(())
    }
}

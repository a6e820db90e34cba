//! Per-window system menu opened with Alt+Space.

use crate::model::{WindowId, WindowState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMenuCommand {
    Restore,
    Minimize,
    Maximize,
    Close,
}

impl WindowMenuCommand {
    pub const ALL: [Self; 4] = [Self::Restore, Self::Minimize, Self::Maximize, Self::Close];

    pub fn label(self) -> &'static str {
        match self {
            Self::Restore => "Restore",
            Self::Minimize => "Minimize",
            Self::Maximize => "Maximize",
            Self::Close => "Close",
        }
    }

    /// Whether the command applies to a window in `state`.
    pub fn is_enabled(self, state: WindowState) -> bool {
        match self {
            Self::Restore => matches!(state, WindowState::Maximized | WindowState::Minimized),
            Self::Minimize => matches!(state, WindowState::Normal | WindowState::Maximized),
            Self::Maximize => state == WindowState::Normal,
            Self::Close => state.is_open(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowMenuItem {
    pub command: WindowMenuCommand,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowMenu {
    pub window_id: WindowId,
}

impl WindowMenu {
    pub fn new(window_id: WindowId) -> Self {
        Self { window_id }
    }

    pub fn items(&self, state: WindowState) -> Vec<WindowMenuItem> {
        WindowMenuCommand::ALL
            .into_iter()
            .map(|command| WindowMenuItem {
                command,
                enabled: command.is_enabled(state),
            })
            .collect()
    }
}

//! Taskbar buttons derived from the window manager.

use thiserror::Error;

use crate::model::{WindowId, WindowRecord, WindowState};
use crate::window_manager::WindowManager;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskbarError {
    #[error("no taskbar button for window `{0}`")]
    NoButton(WindowId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonVisual {
    Active,
    Inactive,
    Minimized,
}

impl ButtonVisual {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Active => "taskbar-button active",
            Self::Inactive => "taskbar-button",
            Self::Minimized => "taskbar-button minimized",
        }
    }
}

/// Pressed/unpressed styling of a button from its window state and the active pointer.
pub fn button_visual(state: WindowState, is_active: bool) -> ButtonVisual {
    match state {
        WindowState::Minimized | WindowState::Closed => ButtonVisual::Minimized,
        WindowState::Normal | WindowState::Maximized if is_active => ButtonVisual::Active,
        WindowState::Normal | WindowState::Maximized => ButtonVisual::Inactive,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarButton {
    pub window_id: WindowId,
    pub title: String,
    pub icon_ref: String,
    pub visual: ButtonVisual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Window-manager operation chosen by a button click.
pub enum TaskbarCommand {
    Open(WindowId),
    Minimize(WindowId),
    Activate(WindowId),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// One button per open window, in the order the windows were first opened.
pub struct Taskbar {
    buttons: Vec<TaskbarButton>,
}

impl Taskbar {
    pub fn buttons(&self) -> &[TaskbarButton] {
        &self.buttons
    }

    pub fn button(&self, window_id: &WindowId) -> Option<&TaskbarButton> {
        self.buttons.iter().find(|b| &b.window_id == window_id)
    }

    /// Brings the buttons in line with the manager: drops closed windows, appends newly opened
    /// ones, and recomputes every visual.
    pub fn sync(&mut self, manager: &WindowManager) {
        self.buttons.retain(|button| {
            manager
                .window(&button.window_id)
                .is_some_and(WindowRecord::is_open)
        });

        for record in manager.open_windows() {
            let visual = button_visual(record.state, manager.is_active(&record.id));
            match self.buttons.iter().position(|b| b.window_id == record.id) {
                Some(index) => {
                    let button = &mut self.buttons[index];
                    button.title.clone_from(&record.title);
                    button.icon_ref.clone_from(&record.icon_ref);
                    button.visual = visual;
                }
                None => self.buttons.push(TaskbarButton {
                    window_id: record.id.clone(),
                    title: record.title.clone(),
                    icon_ref: record.icon_ref.clone(),
                    visual,
                }),
            }
        }
    }

    /// Hidden window: open it. Active window: minimize it. Anything else: activate it.
    pub fn click_command(
        &self,
        manager: &WindowManager,
        window_id: &WindowId,
    ) -> Result<TaskbarCommand, TaskbarError> {
        let no_button = || TaskbarError::NoButton(window_id.clone());
        self.button(window_id).ok_or_else(no_button)?;
        let record = manager.window(window_id).ok_or_else(no_button)?;

        Ok(if !record.is_visible() {
            TaskbarCommand::Open(window_id.clone())
        } else if manager.is_active(window_id) {
            TaskbarCommand::Minimize(window_id.clone())
        } else {
            TaskbarCommand::Activate(window_id.clone())
        })
    }
}

/// Label for a taskbar button, e.g. `Notepad, active, maximized`.
pub fn button_label(button: &TaskbarButton, state: WindowState) -> String {
    let mut parts = vec![button.title.clone()];
    match button.visual {
        ButtonVisual::Active => parts.push("active".to_string()),
        ButtonVisual::Minimized => parts.push("minimized".to_string()),
        ButtonVisual::Inactive => {}
    }
    if state == WindowState::Maximized {
        parts.push("maximized".to_string());
    }
    parts.join(", ")
}

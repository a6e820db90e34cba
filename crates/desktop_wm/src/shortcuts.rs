//! Global keyboard shortcut table.

use crate::desktop_icons::NavDirection;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// A key press with its modifier state. `key` follows DOM `KeyboardEvent.key` values.
pub struct KeyChord {
    pub key: String,
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyChord {
    pub fn plain(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Self::default()
        }
    }

    pub fn alt(key: &str) -> Self {
        Self {
            alt: true,
            ..Self::plain(key)
        }
    }

    pub fn ctrl(key: &str) -> Self {
        Self {
            ctrl: true,
            ..Self::plain(key)
        }
    }

    fn only_alt(&self) -> bool {
        self.alt && !self.ctrl && !self.meta
    }

    fn no_modifiers(&self) -> bool {
        !self.alt && !self.ctrl && !self.meta && !self.shift
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutCommand {
    CycleWindows,
    CloseActiveWindow,
    OpenWindowMenu,
    ToggleStartMenu,
    DismissMenus,
    NavigateIcons(NavDirection),
    ActivateSelectedIcon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Desktop state a shortcut depends on.
pub struct ShortcutContext {
    /// The desktop surface (not a window) holds keyboard focus.
    pub desktop_focused: bool,
    /// The start menu or a window menu is showing.
    pub menu_open: bool,
}

/// Maps a key chord to a desktop command, or `None` when the key belongs to window content.
pub fn resolve_shortcut(chord: &KeyChord, context: ShortcutContext) -> Option<ShortcutCommand> {
    let key = chord.key.as_str();

    if chord.only_alt() {
        match key {
            "Tab" => return Some(ShortcutCommand::CycleWindows),
            "F4" => return Some(ShortcutCommand::CloseActiveWindow),
            " " | "Spacebar" => return Some(ShortcutCommand::OpenWindowMenu),
            _ => {}
        }
    }

    if (chord.ctrl && !chord.alt && !chord.meta && key == "Escape")
        || (matches!(key, "Meta" | "OS") && !chord.alt && !chord.ctrl)
    {
        return Some(ShortcutCommand::ToggleStartMenu);
    }

    if key == "Escape" && context.menu_open {
        return Some(ShortcutCommand::DismissMenus);
    }

    if context.desktop_focused && !context.menu_open && chord.no_modifiers() {
        return match key {
            "ArrowUp" => Some(ShortcutCommand::NavigateIcons(NavDirection::Up)),
            "ArrowDown" => Some(ShortcutCommand::NavigateIcons(NavDirection::Down)),
            "ArrowLeft" => Some(ShortcutCommand::NavigateIcons(NavDirection::Left)),
            "ArrowRight" => Some(ShortcutCommand::NavigateIcons(NavDirection::Right)),
            "Enter" => Some(ShortcutCommand::ActivateSelectedIcon),
            _ => None,
        };
    }

    None
}

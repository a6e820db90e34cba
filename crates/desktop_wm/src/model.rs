use std::fmt;

use desktop_wm_contract::CollaboratorAction;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Stable window id from the catalog, for example `notepad-window`.
pub struct WindowId(pub String);

impl WindowId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn clamped_min(self, min_w: i32, min_h: i32) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }

    pub fn right(self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(self) -> i32 {
        self.y + self.h
    }

    pub fn contains(self, point: PointerPosition) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Lifecycle state of a managed window.
///
/// `Normal <-> Minimized`, `Normal <-> Maximized`, and any open state `-> Closed`. `Closed` has
/// no outgoing transitions; reopening the same id builds a fresh record.
pub enum WindowState {
    Normal,
    Minimized,
    Maximized,
    Closed,
}

impl WindowState {
    /// Drawn on the desktop.
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Normal | Self::Maximized)
    }

    /// Present on the taskbar.
    pub fn is_open(self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Minimized => "minimized",
            Self::Maximized => "maximized",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub title: String,
    pub icon_ref: String,
    pub bounds: WindowRect,
    pub z_index: u32,
    pub state: WindowState,
    /// Rectangle to restore on un-maximize or un-minimize.
    ///
    /// Maximizing snapshots the normal bounds here. Minimizing snapshots only when the window is
    /// not maximized, so a maximized-then-minimized window keeps its pre-maximize rectangle.
    pub prev_bounds: Option<WindowRect>,
}

impl WindowRecord {
    pub fn is_visible(&self) -> bool {
        self.state.is_visible()
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }
}

/// Activation recency, most recent last. Each id appears at most once.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FocusHistory(Vec<WindowId>);

impl FocusHistory {
    /// Moves `id` to the most-recent end.
    pub fn touch(&mut self, id: &WindowId) {
        self.remove(id);
        self.0.push(id.clone());
    }

    pub fn remove(&mut self, id: &WindowId) {
        self.0.retain(|entry| entry != id);
    }

    pub fn ids(&self) -> &[WindowId] {
        &self.0
    }

    /// Most recent first.
    pub fn iter_recent(&self) -> impl Iterator<Item = &WindowId> {
        self.0.iter().rev()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeEdge {
    /// Parses a resize affordance tag (`n`, `se`, ...).
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "n" => Some(Self::North),
            "s" => Some(Self::South),
            "e" => Some(Self::East),
            "w" => Some(Self::West),
            "ne" => Some(Self::NorthEast),
            "nw" => Some(Self::NorthWest),
            "se" => Some(Self::SouthEast),
            "sw" => Some(Self::SouthWest),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::North => "n",
            Self::South => "s",
            Self::East => "e",
            Self::West => "w",
            Self::NorthEast => "ne",
            Self::NorthWest => "nw",
            Self::SouthEast => "se",
            Self::SouthWest => "sw",
        }
    }

    pub(crate) fn moves_west_edge(self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }

    pub(crate) fn moves_north_edge(self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconId(pub String);

impl IconId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Window opened by this icon: `<name>-icon` links to `<name>-window`.
    pub fn linked_window_id(&self) -> WindowId {
        let stem = self.0.strip_suffix("-icon").unwrap_or(&self.0);
        WindowId(format!("{stem}-window"))
    }
}

impl fmt::Display for IconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IconId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopIconRecord {
    pub id: IconId,
    pub label: String,
    pub icon_ref: String,
    pub grid_cell: GridCell,
    pub linked_window_id: WindowId,
    /// Set for icons that trigger a collaborator instead of opening a window.
    pub collaborator: Option<CollaboratorAction>,
}

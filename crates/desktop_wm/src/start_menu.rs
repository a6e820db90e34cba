//! Hierarchical start menu: static tree, hover-opened submenus, leaf commands.

use desktop_wm_contract::CollaboratorAction;
use thiserror::Error;

use crate::catalog::MenuEntrySpec;
use crate::config::DesktopConfig;
use crate::model::{WindowId, WindowRect};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StartMenuError {
    #[error("start menu is closed")]
    Closed,
    #[error("unknown start menu item `{0}`")]
    UnknownItem(String),
    #[error("start menu item `{0}` is not on screen")]
    NotShown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuNodeId(usize);

const ROOT: MenuNodeId = MenuNodeId(0);

#[derive(Debug, Clone, PartialEq)]
pub enum MenuCommand {
    OpenWindow(WindowId),
    Collaborator(CollaboratorAction),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubMenuNode {
    pub id: String,
    pub label: String,
    pub icon_ref: Option<String>,
    pub parent: Option<MenuNodeId>,
    pub items: Vec<MenuNodeId>,
    /// Set on leaves only.
    pub command: Option<MenuCommand>,
}

impl SubMenuNode {
    pub fn has_children(&self) -> bool {
        !self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One on-screen menu column.
pub struct MenuPanel {
    pub node: MenuNodeId,
    pub rect: WindowRect,
    pub items: Vec<MenuNodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StartMenu {
    nodes: Vec<SubMenuNode>,
    is_open: bool,
    /// Chain of open submenus below the root, outermost first.
    open_path: Vec<MenuNodeId>,
    hovered: Option<MenuNodeId>,
}

impl StartMenu {
    pub fn from_entries(entries: &[MenuEntrySpec]) -> Self {
        let mut menu = Self {
            nodes: vec![SubMenuNode {
                id: "start".to_string(),
                label: "Start".to_string(),
                icon_ref: None,
                parent: None,
                items: Vec::new(),
                command: None,
            }],
            is_open: false,
            open_path: Vec::new(),
            hovered: None,
        };
        for entry in entries {
            menu.push_entry(entry, ROOT);
        }
        menu
    }

    fn push_entry(&mut self, entry: &MenuEntrySpec, parent: MenuNodeId) {
        let node_id = MenuNodeId(self.nodes.len());
        let command = if entry.items.is_empty() {
            entry
                .opens
                .clone()
                .map(MenuCommand::OpenWindow)
                .or_else(|| {
                    entry
                        .collaborator
                        .as_deref()
                        .map(|name| MenuCommand::Collaborator(CollaboratorAction::named(name)))
                })
        } else {
            None
        };
        self.nodes.push(SubMenuNode {
            id: entry.id.clone(),
            label: entry.label.clone(),
            icon_ref: entry.icon.clone(),
            parent: Some(parent),
            items: Vec::new(),
            command,
        });
        self.nodes[parent.0].items.push(node_id);
        for child in &entry.items {
            self.push_entry(child, node_id);
        }
    }

    pub fn root(&self) -> MenuNodeId {
        ROOT
    }

    pub fn node(&self, id: MenuNodeId) -> Option<&SubMenuNode> {
        self.nodes.get(id.0)
    }

    pub fn find(&self, key: &str) -> Option<MenuNodeId> {
        self.nodes
            .iter()
            .skip(1)
            .position(|node| node.id == key)
            .map(|index| MenuNodeId(index + 1))
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn open_path(&self) -> &[MenuNodeId] {
        &self.open_path
    }

    /// Ids of the open submenus, outermost first.
    pub fn open_submenu_keys(&self) -> Vec<&str> {
        self.open_path
            .iter()
            .filter_map(|id| self.node(*id))
            .map(|node| node.id.as_str())
            .collect()
    }

    pub fn hovered(&self) -> Option<MenuNodeId> {
        self.hovered
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Closes the whole tree.
    pub fn close(&mut self) {
        self.is_open = false;
        self.open_path.clear();
        self.hovered = None;
    }

    pub fn toggle(&mut self) {
        if self.is_open {
            self.close();
        } else {
            self.open();
        }
    }

    /// Hovering an item closes submenus of its siblings; hovering a submenu item also opens it.
    pub fn hover(&mut self, key: &str) -> Result<(), StartMenuError> {
        let id = self.shown_item(key)?;
        let parent = self.nodes[id.0].parent.unwrap_or(ROOT);
        if parent == ROOT {
            self.open_path.clear();
        } else if let Some(depth) = self.open_path.iter().position(|open| *open == parent) {
            self.open_path.truncate(depth + 1);
        }
        self.hovered = Some(id);
        if self.nodes[id.0].has_children() {
            self.open_path.push(id);
        }
        Ok(())
    }

    /// Clicking a leaf returns its command and closes the menu; clicking a submenu item opens it.
    pub fn click(&mut self, key: &str) -> Result<Option<MenuCommand>, StartMenuError> {
        let id = self.shown_item(key)?;
        if self.nodes[id.0].has_children() {
            self.hover(key)?;
            return Ok(None);
        }
        let command = self.nodes[id.0].command.clone();
        self.close();
        Ok(command)
    }

    /// Screen rectangles of the root panel and every open submenu.
    ///
    /// The root sits above the taskbar at the left edge. Submenus open to the right of their parent
    /// item, flip to the left when they would leave the viewport, and shift up to stay above the
    /// taskbar.
    pub fn panels(&self, config: &DesktopConfig) -> Vec<MenuPanel> {
        if !self.is_open {
            return Vec::new();
        }
        let area = config.desktop_area();
        let viewport = config.viewport_rect();
        let item_h = config.menu_item_height;
        let width = config.menu_width;

        let root_items = self.nodes[ROOT.0].items.clone();
        let root_h = root_items.len() as i32 * item_h;
        let mut panels = vec![MenuPanel {
            node: ROOT,
            rect: WindowRect {
                x: area.x,
                y: (area.bottom() - root_h).max(area.y),
                w: width,
                h: root_h,
            },
            items: root_items,
        }];

        for open in &self.open_path {
            let Some(parent_panel) = panels.last() else {
                break;
            };
            let index = parent_panel
                .items
                .iter()
                .position(|item| item == open)
                .unwrap_or(0) as i32;
            let items = self.nodes[open.0].items.clone();
            let h = items.len() as i32 * item_h;

            let mut x = parent_panel.rect.right();
            if x + width > viewport.right() {
                x = (parent_panel.rect.x - width).max(viewport.x);
            }
            let mut y = parent_panel.rect.y + index * item_h;
            if y + h > area.bottom() {
                y = (area.bottom() - h).max(area.y);
            }

            panels.push(MenuPanel {
                node: *open,
                rect: WindowRect { x, y, w: width, h },
                items,
            });
        }
        panels
    }

    fn shown_item(&self, key: &str) -> Result<MenuNodeId, StartMenuError> {
        if !self.is_open {
            return Err(StartMenuError::Closed);
        }
        let id = self
            .find(key)
            .ok_or_else(|| StartMenuError::UnknownItem(key.to_string()))?;
        let parent = self.nodes[id.0].parent.unwrap_or(ROOT);
        if parent == ROOT || self.open_path.contains(&parent) {
            Ok(id)
        } else {
            Err(StartMenuError::NotShown(key.to_string()))
        }
    }
}

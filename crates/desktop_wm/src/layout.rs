//! Pure `state -> visual layout` projection.
//!
//! Renderers draw exactly what [`project_layout`] returns and feed input back as actions; nothing
//! here reads or writes DOM state.

use crate::model::{IconId, PointerPosition, WindowId, WindowRect, WindowState};
use crate::reducer::DesktopState;
use crate::taskbar::{button_label, ButtonVisual};
use crate::window_menu::WindowMenuItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowLayout {
    pub id: WindowId,
    pub title: String,
    pub icon_ref: String,
    pub rect: WindowRect,
    pub z_index: u32,
    pub state: WindowState,
    pub visible: bool,
    pub active: bool,
}

impl WindowLayout {
    pub fn class_name(&self) -> String {
        let mut class = String::from("desktop-window");
        if self.active {
            class.push_str(" focused");
        }
        match self.state {
            WindowState::Minimized => class.push_str(" minimized"),
            WindowState::Maximized => class.push_str(" maximized"),
            WindowState::Normal | WindowState::Closed => {}
        }
        class
    }

    pub fn style(&self) -> String {
        format!(
            "left:{}px;top:{}px;width:{}px;height:{}px;z-index:{};",
            self.rect.x, self.rect.y, self.rect.w, self.rect.h, self.z_index
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarButtonLayout {
    pub window_id: WindowId,
    pub title: String,
    pub icon_ref: String,
    pub visual: ButtonVisual,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemLayout {
    pub id: String,
    pub label: String,
    pub icon_ref: Option<String>,
    pub has_submenu: bool,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuPanelLayout {
    pub rect: WindowRect,
    pub items: Vec<MenuItemLayout>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowMenuLayout {
    pub window_id: WindowId,
    pub position: PointerPosition,
    pub items: Vec<WindowMenuItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconLayout {
    pub id: IconId,
    pub label: String,
    pub icon_ref: String,
    pub position: PointerPosition,
    pub selected: bool,
    pub dragging: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopLayout {
    pub desktop: WindowRect,
    pub taskbar: WindowRect,
    /// Open windows in manager order; draw order comes from `z_index`.
    pub windows: Vec<WindowLayout>,
    pub taskbar_buttons: Vec<TaskbarButtonLayout>,
    pub start_menu_open: bool,
    /// Root panel first, then each open submenu.
    pub start_menu_panels: Vec<MenuPanelLayout>,
    pub window_menu: Option<WindowMenuLayout>,
    pub icons: Vec<IconLayout>,
}

pub fn project_layout(state: &DesktopState) -> DesktopLayout {
    let config = state.config();
    let desktop = config.desktop_area();
    let taskbar = WindowRect {
        x: 0,
        y: desktop.bottom(),
        w: config.viewport_width,
        h: config.taskbar_height,
    };
    let manager = &state.manager;

    let windows = manager
        .open_windows()
        .map(|record| WindowLayout {
            id: record.id.clone(),
            title: record.title.clone(),
            icon_ref: record.icon_ref.clone(),
            rect: record.bounds,
            z_index: record.z_index,
            state: record.state,
            visible: record.is_visible(),
            active: manager.is_active(&record.id),
        })
        .collect();

    let taskbar_buttons = state
        .taskbar
        .buttons()
        .iter()
        .map(|button| {
            let window_state = manager
                .window(&button.window_id)
                .map_or(WindowState::Closed, |record| record.state);
            TaskbarButtonLayout {
                window_id: button.window_id.clone(),
                title: button.title.clone(),
                icon_ref: button.icon_ref.clone(),
                visual: button.visual,
                label: button_label(button, window_state),
            }
        })
        .collect();

    let start_menu_panels = state
        .start_menu
        .panels(config)
        .into_iter()
        .map(|panel| MenuPanelLayout {
            rect: panel.rect,
            items: panel
                .items
                .iter()
                .filter_map(|item| {
                    let node = state.start_menu.node(*item)?;
                    Some(MenuItemLayout {
                        id: node.id.clone(),
                        label: node.label.clone(),
                        icon_ref: node.icon_ref.clone(),
                        has_submenu: node.has_children(),
                        highlighted: state.start_menu.hovered() == Some(*item)
                            || state.start_menu.open_path().contains(item),
                    })
                })
                .collect(),
        })
        .collect();

    let window_menu = state.window_menu.as_ref().and_then(|menu| {
        let record = manager.window(&menu.window_id)?;
        Some(WindowMenuLayout {
            window_id: menu.window_id.clone(),
            position: if record.is_visible() {
                PointerPosition {
                    x: record.bounds.x,
                    y: record.bounds.y,
                }
            } else {
                PointerPosition {
                    x: desktop.x,
                    y: desktop.bottom() - config.menu_item_height * 4,
                }
            },
            items: menu.items(record.state),
        })
    });

    let drag = state.icons.drag();
    let icons = state
        .icons
        .icons()
        .iter()
        .map(|icon| IconLayout {
            id: icon.id.clone(),
            label: icon.label.clone(),
            icon_ref: icon.icon_ref.clone(),
            position: state.icons.icon_position(icon),
            selected: state.icons.selected() == Some(&icon.id),
            dragging: drag.is_some_and(|drag| drag.icon_id == icon.id),
        })
        .collect();

    DesktopLayout {
        desktop,
        taskbar,
        windows,
        taskbar_buttons,
        start_menu_open: state.start_menu.is_open(),
        start_menu_panels,
        window_menu,
        icons,
    }
}

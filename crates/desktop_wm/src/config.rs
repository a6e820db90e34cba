//! Desktop layout configuration.

use serde::{Deserialize, Serialize};

use crate::model::WindowRect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Where freshly opened windows are placed.
pub enum PlacementPolicy {
    /// Step each new window diagonally from the desktop origin, wrapping after
    /// [`DesktopConfig::cascade_slots`] placements.
    #[default]
    Cascade,
    /// Center every new window in the desktop area.
    Centered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Geometry and behavior knobs for the whole desktop.
pub struct DesktopConfig {
    pub viewport_width: i32,
    pub viewport_height: i32,
    pub taskbar_height: i32,
    pub min_window_width: i32,
    pub min_window_height: i32,
    pub default_window_width: i32,
    pub default_window_height: i32,
    /// Pixels of a dragged window that must stay inside the desktop area.
    pub drag_min_visible: i32,
    pub placement: PlacementPolicy,
    pub cascade_origin_x: i32,
    pub cascade_origin_y: i32,
    pub cascade_step: i32,
    pub cascade_slots: u32,
    pub icon_cell_width: i32,
    pub icon_cell_height: i32,
    pub icon_grid_padding: i32,
    pub menu_width: i32,
    pub menu_item_height: i32,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280,
            viewport_height: 800,
            taskbar_height: 38,
            min_window_width: 220,
            min_window_height: 140,
            default_window_width: 480,
            default_window_height: 320,
            drag_min_visible: 48,
            placement: PlacementPolicy::Cascade,
            cascade_origin_x: 40,
            cascade_origin_y: 40,
            cascade_step: 24,
            cascade_slots: 8,
            icon_cell_width: 88,
            icon_cell_height: 96,
            icon_grid_padding: 8,
            menu_width: 200,
            menu_item_height: 32,
        }
    }
}

impl DesktopConfig {
    /// Full viewport, taskbar included.
    pub fn viewport_rect(&self) -> WindowRect {
        WindowRect {
            x: 0,
            y: 0,
            w: self.viewport_width.max(0),
            h: self.viewport_height.max(0),
        }
    }

    /// Area available to windows and icons: the viewport minus the taskbar strip at the bottom.
    pub fn desktop_area(&self) -> WindowRect {
        WindowRect {
            x: 0,
            y: 0,
            w: self.viewport_width.max(0),
            h: (self.viewport_height - self.taskbar_height).max(0),
        }
    }

    /// Offset of cascade slot `slot` from the desktop origin.
    pub fn cascade_position(&self, slot: u32) -> (i32, i32) {
        let slot = (slot % self.cascade_slots.max(1)) as i32;
        let area = self.desktop_area();
        (
            area.x + self.cascade_origin_x + slot * self.cascade_step,
            area.y + self.cascade_origin_y + slot * self.cascade_step,
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn desktop_area_excludes_taskbar() {
        let config = DesktopConfig::default();
        assert_eq!(
            config.desktop_area(),
            WindowRect {
                x: 0,
                y: 0,
                w: 1280,
                h: 762,
            }
        );
    }

    #[test]
    fn cascade_positions_wrap_after_slot_count() {
        let config = DesktopConfig::default();
        assert_eq!(config.cascade_position(0), (40, 40));
        assert_eq!(config.cascade_position(2), (88, 88));
        assert_eq!(config.cascade_position(8), config.cascade_position(0));
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: DesktopConfig =
            serde_json::from_str(r#"{ "viewport_width": 1024, "placement": "centered" }"#).unwrap();
        assert_eq!(config.viewport_width, 1024);
        assert_eq!(config.placement, PlacementPolicy::Centered);
        assert_eq!(config.taskbar_height, 38);
    }
}

//! Desktop icon grid: placement, selection, keyboard navigation, and drag-and-drop.
//!
//! The grid is sized once from the desktop area. Icons are placed column-major from the top-left
//! cell, the way a desktop fills its first column before starting the next.

use desktop_wm_contract::CollaboratorAction;
use leptos::logging;
use thiserror::Error;

use crate::catalog::DesktopIconSpec;
use crate::config::DesktopConfig;
use crate::model::{DesktopIconRecord, GridCell, IconId, PointerPosition, WindowId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IconError {
    #[error("unknown desktop icon `{0}`")]
    UnknownIcon(IconId),
    #[error("icon `{0}` is already being dragged")]
    DragInProgress(IconId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Fixed occupancy grid over the desktop area.
pub struct IconGrid {
    pub rows: usize,
    pub cols: usize,
    pub cell_width: i32,
    pub cell_height: i32,
    pub padding: i32,
}

impl IconGrid {
    pub fn from_config(config: &DesktopConfig) -> Self {
        let area = config.desktop_area();
        let cell_width = config.icon_cell_width.max(1);
        let cell_height = config.icon_cell_height.max(1);
        let padding = config.icon_grid_padding.max(0);
        let cols = ((area.w - 2 * padding) / cell_width).max(1) as usize;
        let rows = ((area.h - 2 * padding) / cell_height).max(1) as usize;
        Self {
            rows,
            cols,
            cell_width,
            cell_height,
            padding,
        }
    }

    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Top-left pixel of a cell.
    pub fn cell_origin(&self, cell: GridCell) -> PointerPosition {
        PointerPosition {
            x: self.padding + cell.col as i32 * self.cell_width,
            y: self.padding + cell.row as i32 * self.cell_height,
        }
    }

    /// Cell under a pixel, or `None` outside the grid.
    pub fn cell_at(&self, point: PointerPosition) -> Option<GridCell> {
        let x = point.x - self.padding;
        let y = point.y - self.padding;
        if x < 0 || y < 0 {
            return None;
        }
        let cell = GridCell {
            row: (y / self.cell_height) as usize,
            col: (x / self.cell_width) as usize,
        };
        self.contains(cell).then_some(cell)
    }

    fn nth_cell(&self, index: usize) -> GridCell {
        GridCell {
            row: index % self.rows,
            col: index / self.rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconDrag {
    pub icon_id: IconId,
    pub origin_cell: GridCell,
    pub pointer_start: PointerPosition,
    /// Current top-left pixel of the dragged icon.
    pub position: PointerPosition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Moved { icon_id: IconId, cell: GridCell },
    Reverted { icon_id: IconId, cell: GridCell },
}

#[derive(Debug, Clone, PartialEq)]
/// What activating an icon asks for.
pub enum IconActivation {
    OpenWindow(WindowId),
    Collaborator(CollaboratorAction),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IconManager {
    grid: IconGrid,
    icons: Vec<DesktopIconRecord>,
    selected: Option<IconId>,
    drag: Option<IconDrag>,
}

impl IconManager {
    /// Lays out `specs` on a grid sized from `config`. Icons beyond grid capacity are dropped.
    pub fn new(specs: &[DesktopIconSpec], config: &DesktopConfig) -> Self {
        let grid = IconGrid::from_config(config);
        if specs.len() > grid.capacity() {
            logging::warn!(
                "desktop icon grid holds {} icons; skipping {}",
                grid.capacity(),
                specs.len() - grid.capacity()
            );
        }
        let icons = specs
            .iter()
            .take(grid.capacity())
            .enumerate()
            .map(|(index, spec)| DesktopIconRecord {
                id: spec.id.clone(),
                label: spec.label.clone(),
                icon_ref: spec.icon.clone(),
                grid_cell: grid.nth_cell(index),
                linked_window_id: spec.id.linked_window_id(),
                collaborator: spec.collaborator.as_deref().map(CollaboratorAction::named),
            })
            .collect();
        Self {
            grid,
            icons,
            selected: None,
            drag: None,
        }
    }

    pub fn grid(&self) -> &IconGrid {
        &self.grid
    }

    pub fn icons(&self) -> &[DesktopIconRecord] {
        &self.icons
    }

    pub fn icon(&self, id: &IconId) -> Option<&DesktopIconRecord> {
        self.icons.iter().find(|icon| &icon.id == id)
    }

    pub fn icon_at(&self, cell: GridCell) -> Option<&DesktopIconRecord> {
        self.icons.iter().find(|icon| icon.grid_cell == cell)
    }

    pub fn selected(&self) -> Option<&IconId> {
        self.selected.as_ref()
    }

    pub fn drag(&self) -> Option<&IconDrag> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Pixel position of an icon, following the pointer while it is dragged.
    pub fn icon_position(&self, icon: &DesktopIconRecord) -> PointerPosition {
        match &self.drag {
            Some(drag) if drag.icon_id == icon.id => drag.position,
            _ => self.grid.cell_origin(icon.grid_cell),
        }
    }

    pub fn select(&mut self, id: &IconId) -> Result<(), IconError> {
        self.require(id)?;
        self.selected = Some(id.clone());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Moves the selection to the nearest occupied cell in `direction` along the same row or
    /// column. With nothing selected, selects the first icon. Returns the new selection.
    pub fn navigate(&mut self, direction: NavDirection) -> Option<&IconId> {
        let current = match self.selected.as_ref().and_then(|id| self.icon(id)) {
            Some(icon) => icon.grid_cell,
            None => {
                self.selected = self.icons.first().map(|icon| icon.id.clone());
                return self.selected.as_ref();
            }
        };

        let next = self
            .icons
            .iter()
            .filter(|icon| match direction {
                NavDirection::Up => icon.grid_cell.col == current.col && icon.grid_cell.row < current.row,
                NavDirection::Down => {
                    icon.grid_cell.col == current.col && icon.grid_cell.row > current.row
                }
                NavDirection::Left => {
                    icon.grid_cell.row == current.row && icon.grid_cell.col < current.col
                }
                NavDirection::Right => {
                    icon.grid_cell.row == current.row && icon.grid_cell.col > current.col
                }
            })
            .min_by_key(|icon| {
                icon.grid_cell.row.abs_diff(current.row) + icon.grid_cell.col.abs_diff(current.col)
            })
            .map(|icon| icon.id.clone());

        if next.is_some() {
            self.selected = next;
        }
        self.selected.as_ref()
    }

    pub fn begin_drag(&mut self, id: &IconId, pointer: PointerPosition) -> Result<(), IconError> {
        if let Some(drag) = &self.drag {
            return Err(IconError::DragInProgress(drag.icon_id.clone()));
        }
        let origin_cell = self.require(id)?.grid_cell;
        self.drag = Some(IconDrag {
            icon_id: id.clone(),
            origin_cell,
            pointer_start: pointer,
            position: self.grid.cell_origin(origin_cell),
        });
        Ok(())
    }

    /// Follows the pointer. Returns the icon's new pixel position, or `None` when not dragging.
    pub fn drag_move(&mut self, pointer: PointerPosition) -> Option<PointerPosition> {
        let origin = self.grid.cell_origin(self.drag.as_ref()?.origin_cell);
        let drag = self.drag.as_mut()?;
        drag.position = PointerPosition {
            x: origin.x + pointer.x - drag.pointer_start.x,
            y: origin.y + pointer.y - drag.pointer_start.y,
        };
        Some(drag.position)
    }

    /// Drops the dragged icon at the cell under its center. Occupied or off-grid cells revert it.
    pub fn end_drag(&mut self, pointer: PointerPosition) -> Option<DropOutcome> {
        self.drag_move(pointer)?;
        let drag = self.drag.take()?;
        let center = PointerPosition {
            x: drag.position.x + self.grid.cell_width / 2,
            y: drag.position.y + self.grid.cell_height / 2,
        };

        let target = self.grid.cell_at(center).filter(|cell| {
            self.icon_at(*cell)
                .map_or(true, |occupant| occupant.id == drag.icon_id)
        });

        Some(match target {
            Some(cell) => {
                if let Some(icon) = self.icons.iter_mut().find(|icon| icon.id == drag.icon_id) {
                    icon.grid_cell = cell;
                }
                DropOutcome::Moved {
                    icon_id: drag.icon_id,
                    cell,
                }
            }
            None => DropOutcome::Reverted {
                icon_id: drag.icon_id,
                cell: drag.origin_cell,
            },
        })
    }

    pub fn activation(&self, id: &IconId) -> Result<IconActivation, IconError> {
        let icon = self.require(id)?;
        Ok(match &icon.collaborator {
            Some(action) => IconActivation::Collaborator(action.clone()),
            None => IconActivation::OpenWindow(icon.linked_window_id.clone()),
        })
    }

    /// Activation of the selected icon, for Enter.
    pub fn selected_activation(&self) -> Option<IconActivation> {
        self.selected
            .as_ref()
            .and_then(|id| self.activation(id).ok())
    }

    fn require(&self, id: &IconId) -> Result<&DesktopIconRecord, IconError> {
        self.icon(id).ok_or_else(|| IconError::UnknownIcon(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::catalog::tests::test_catalog;

    fn manager() -> IconManager {
        let catalog = test_catalog();
        IconManager::new(&catalog.icons, &catalog.layout)
    }

    fn cell(row: usize, col: usize) -> GridCell {
        GridCell { row, col }
    }

    fn cell_of(icons: &IconManager, id: &str) -> GridCell {
        icons.icon(&IconId::from(id)).unwrap().grid_cell
    }

    #[test]
    fn grid_is_sized_from_desktop_area() {
        let icons = manager();
        // area 1000x700, padding 8, cells 88x96
        assert_eq!(icons.grid().cols, 11);
        assert_eq!(icons.grid().rows, 7);
        assert_eq!(icons.grid().cell_origin(cell(1, 2)), PointerPosition { x: 184, y: 104 });
    }

    #[test]
    fn icons_fill_first_column_top_down() {
        let icons = manager();
        assert_eq!(cell_of(&icons, "a-icon"), cell(0, 0));
        assert_eq!(cell_of(&icons, "b-icon"), cell(1, 0));
        assert_eq!(cell_of(&icons, "trash-icon"), cell(2, 0));
        assert_eq!(
            icons.icon(&IconId::from("a-icon")).unwrap().linked_window_id,
            WindowId::from("a-window")
        );
    }

    #[test]
    fn overflowing_icons_are_skipped() {
        let mut config = test_catalog().layout;
        config.viewport_width = 100;
        config.viewport_height = 140;
        let icons = IconManager::new(&test_catalog().icons, &config);
        assert_eq!(icons.icons().len(), 1);
    }

    #[test]
    fn drop_on_empty_cell_snaps_there() {
        let mut icons = manager();
        let a = IconId::from("a-icon");
        icons.begin_drag(&a, PointerPosition { x: 20, y: 20 }).unwrap();
        icons.drag_move(PointerPosition { x: 150, y: 30 });

        let outcome = icons.end_drag(PointerPosition { x: 200, y: 25 }).unwrap();

        assert_eq!(outcome, DropOutcome::Moved { icon_id: a.clone(), cell: cell(0, 2) });
        assert_eq!(cell_of(&icons, "a-icon"), cell(0, 2));
        assert!(!icons.is_dragging());
    }

    #[test]
    fn drop_on_occupied_cell_reverts_both_icons() {
        let mut icons = manager();
        let a = IconId::from("a-icon");
        icons.begin_drag(&a, PointerPosition { x: 20, y: 20 }).unwrap();

        let outcome = icons.end_drag(PointerPosition { x: 20, y: 116 }).unwrap();

        assert_eq!(outcome, DropOutcome::Reverted { icon_id: a, cell: cell(0, 0) });
        assert_eq!(cell_of(&icons, "a-icon"), cell(0, 0));
        assert_eq!(cell_of(&icons, "b-icon"), cell(1, 0));
    }

    #[test]
    fn drop_off_grid_reverts_and_own_cell_is_allowed() {
        let mut icons = manager();
        let b = IconId::from("b-icon");

        icons.begin_drag(&b, PointerPosition { x: 50, y: 150 }).unwrap();
        let off = icons.end_drag(PointerPosition { x: -400, y: 150 }).unwrap();
        assert!(matches!(off, DropOutcome::Reverted { .. }));

        icons.begin_drag(&b, PointerPosition { x: 50, y: 150 }).unwrap();
        let home = icons.end_drag(PointerPosition { x: 60, y: 160 }).unwrap();
        assert_eq!(home, DropOutcome::Moved { icon_id: b, cell: cell(1, 0) });
    }

    #[test]
    fn second_drag_is_refused() {
        let mut icons = manager();
        icons.begin_drag(&IconId::from("a-icon"), PointerPosition { x: 0, y: 0 }).unwrap();
        assert_eq!(
            icons.begin_drag(&IconId::from("b-icon"), PointerPosition { x: 0, y: 0 }),
            Err(IconError::DragInProgress(IconId::from("a-icon")))
        );
    }

    #[test]
    fn arrow_navigation_moves_to_adjacent_occupied_cell() {
        let mut icons = manager();

        assert_eq!(icons.navigate(NavDirection::Down), Some(&IconId::from("a-icon")));
        assert_eq!(icons.navigate(NavDirection::Down), Some(&IconId::from("b-icon")));
        assert_eq!(icons.navigate(NavDirection::Down), Some(&IconId::from("trash-icon")));
        assert_eq!(icons.navigate(NavDirection::Down), Some(&IconId::from("trash-icon")));
        assert_eq!(icons.navigate(NavDirection::Right), Some(&IconId::from("trash-icon")));
        assert_eq!(icons.navigate(NavDirection::Up), Some(&IconId::from("b-icon")));
    }

    #[test]
    fn activation_opens_linked_window_or_collaborator() {
        let mut icons = manager();
        assert_eq!(
            icons.activation(&IconId::from("b-icon")),
            Ok(IconActivation::OpenWindow(WindowId::from("b-window")))
        );
        assert_eq!(
            icons.activation(&IconId::from("trash-icon")),
            Ok(IconActivation::Collaborator(CollaboratorAction::named("open-trash")))
        );
        assert_eq!(icons.selected_activation(), None);

        icons.select(&IconId::from("a-icon")).unwrap();
        assert_eq!(
            icons.selected_activation(),
            Some(IconActivation::OpenWindow(WindowId::from("a-window")))
        );
        assert_eq!(
            icons.select(&IconId::from("nope")),
            Err(IconError::UnknownIcon(IconId::from("nope")))
        );
    }
}

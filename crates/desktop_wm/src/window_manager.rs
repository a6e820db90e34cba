//! Window lifecycle, stacking, and focus-successor rules.
//!
//! [`WindowManager`] is the only owner of [`WindowRecord`]s. Everything else reads records or
//! calls the operations here by id.

use thiserror::Error;

use crate::catalog::WindowSpec;
use crate::config::{DesktopConfig, PlacementPolicy};
use crate::model::{FocusHistory, WindowId, WindowRect, WindowRecord, WindowState};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Guarded failures of window-manager operations. Callers turn these into no-ops.
pub enum WindowManagerError {
    /// The id is not in the catalog.
    #[error("unknown window `{0}`")]
    UnknownWindow(WindowId),
    /// The window has never been opened or is closed.
    #[error("window `{0}` is not open")]
    NotOpen(WindowId),
    /// The window is minimized or closed.
    #[error("window `{0}` is not visible")]
    NotVisible(WindowId),
    /// Bounds can only be edited while the window is in the normal state.
    #[error("window `{0}` is maximized or hidden and cannot be moved")]
    NotMovable(WindowId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What an operation changed, in order.
pub enum WindowEvent {
    Opened(WindowId),
    Restored(WindowId),
    Minimized(WindowId),
    Maximized(WindowId),
    Unmaximized(WindowId),
    Closed(WindowId),
    Activated(WindowId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowManager {
    config: DesktopConfig,
    /// Catalog order. This is the stable "manager order" used by Alt+Tab and fallback promotion.
    definitions: Vec<WindowSpec>,
    /// Records for every window opened this session, kept in manager order.
    windows: Vec<WindowRecord>,
    active: Option<WindowId>,
    z_counter: u32,
    focus_history: FocusHistory,
    placements: u32,
}

impl WindowManager {
    pub fn new(config: DesktopConfig, definitions: Vec<WindowSpec>) -> Self {
        Self {
            config,
            definitions,
            windows: Vec::new(),
            active: None,
            z_counter: 0,
            focus_history: FocusHistory::default(),
            placements: 0,
        }
    }

    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    pub fn definitions(&self) -> &[WindowSpec] {
        &self.definitions
    }

    pub fn is_known(&self, id: &WindowId) -> bool {
        self.rank(id).is_some()
    }

    /// Every record created this session, closed ones included, in manager order.
    pub fn windows(&self) -> &[WindowRecord] {
        &self.windows
    }

    pub fn window(&self, id: &WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| &w.id == id)
    }

    pub fn open_windows(&self) -> impl Iterator<Item = &WindowRecord> {
        self.windows.iter().filter(|w| w.is_open())
    }

    pub fn visible_windows(&self) -> impl Iterator<Item = &WindowRecord> {
        self.windows.iter().filter(|w| w.is_visible())
    }

    pub fn active_window_id(&self) -> Option<&WindowId> {
        self.active.as_ref()
    }

    pub fn active_window(&self) -> Option<&WindowRecord> {
        self.active.as_ref().and_then(|id| self.window(id))
    }

    pub fn is_active(&self, id: &WindowId) -> bool {
        self.active.as_ref() == Some(id)
    }

    pub fn focus_history(&self) -> &FocusHistory {
        &self.focus_history
    }

    /// Last z-index handed out.
    pub fn z_counter(&self) -> u32 {
        self.z_counter
    }

    /// Opens `id`, restoring it when minimized, and activates it.
    ///
    /// A window that was never opened (or was closed) gets a fresh record with placement bounds.
    pub fn open_window(&mut self, id: &WindowId) -> Result<Vec<WindowEvent>, WindowManagerError> {
        let rank = self
            .rank(id)
            .ok_or_else(|| WindowManagerError::UnknownWindow(id.clone()))?;
        let mut events = Vec::new();

        match self.window(id).map(|w| w.state) {
            None | Some(WindowState::Closed) => {
                let record = self.fresh_record(rank);
                self.insert_record(record);
                events.push(WindowEvent::Opened(id.clone()));
            }
            Some(WindowState::Minimized) => {
                self.restore_from_minimized(id)?;
                events.push(WindowEvent::Restored(id.clone()));
            }
            Some(WindowState::Normal | WindowState::Maximized) => {}
        }

        events.extend(self.activate_window(id)?);
        Ok(events)
    }

    /// Closes `id`. Closed is terminal; a later open builds a new record.
    pub fn close_window(&mut self, id: &WindowId) -> Result<Vec<WindowEvent>, WindowManagerError> {
        let record = self.open_record_mut(id)?;
        record.state = WindowState::Closed;
        record.prev_bounds = None;
        self.focus_history.remove(id);

        let mut events = vec![WindowEvent::Closed(id.clone())];
        if self.is_active(id) {
            self.active = None;
            events.extend(self.promote_successor(id)?);
        }
        Ok(events)
    }

    /// Hides `id`. Minimizing a minimized window changes nothing.
    pub fn minimize_window(
        &mut self,
        id: &WindowId,
    ) -> Result<Vec<WindowEvent>, WindowManagerError> {
        let record = self.open_record_mut(id)?;
        match record.state {
            WindowState::Minimized => return Ok(Vec::new()),
            WindowState::Normal => record.prev_bounds = Some(record.bounds),
            WindowState::Maximized | WindowState::Closed => {}
        }
        record.state = WindowState::Minimized;

        let mut events = vec![WindowEvent::Minimized(id.clone())];
        if self.is_active(id) {
            self.active = None;
            events.extend(self.promote_successor(id)?);
        }
        Ok(events)
    }

    /// Maximizes a normal window or restores a maximized one, then activates it.
    ///
    /// A minimized window is first restored to normal and then maximized.
    pub fn toggle_maximize(
        &mut self,
        id: &WindowId,
    ) -> Result<Vec<WindowEvent>, WindowManagerError> {
        let area = self.config.desktop_area();
        let mut events = Vec::new();

        if self.open_record_mut(id)?.state == WindowState::Minimized {
            self.restore_from_minimized(id)?;
            events.push(WindowEvent::Restored(id.clone()));
        }

        let record = self.open_record_mut(id)?;
        if record.state == WindowState::Maximized {
            if let Some(prev) = record.prev_bounds.take() {
                record.bounds = prev;
            }
            record.state = WindowState::Normal;
            events.push(WindowEvent::Unmaximized(id.clone()));
        } else {
            record.prev_bounds = Some(record.bounds);
            record.bounds = area;
            record.state = WindowState::Maximized;
            events.push(WindowEvent::Maximized(id.clone()));
        }

        events.extend(self.activate_window(id)?);
        Ok(events)
    }

    /// Raises `id` to the top of the stack and makes it the active window.
    ///
    /// No-op when `id` is already active. Hidden windows cannot be activated; open them instead.
    pub fn activate_window(
        &mut self,
        id: &WindowId,
    ) -> Result<Vec<WindowEvent>, WindowManagerError> {
        if self.is_active(id) {
            return Ok(Vec::new());
        }

        let next_z = self.z_counter + 1;
        let record = self.visible_record_mut(id)?;
        record.z_index = next_z;
        self.z_counter = next_z;
        self.active = Some(id.clone());
        self.focus_history.touch(id);
        Ok(vec![WindowEvent::Activated(id.clone())])
    }

    /// Alt+Tab: activates the visible window after the active one in manager order, wrapping.
    pub fn switch_to_next_window(&mut self) -> Result<Vec<WindowEvent>, WindowManagerError> {
        let visible: Vec<WindowId> = self.visible_windows().map(|w| w.id.clone()).collect();
        if visible.len() <= 1 {
            return Ok(Vec::new());
        }

        let next = match self
            .active
            .as_ref()
            .and_then(|active| visible.iter().position(|id| id == active))
        {
            Some(position) => (position + 1) % visible.len(),
            None => 0,
        };
        self.activate_window(&visible[next])
    }

    /// Re-lays every visible normal window on the cascade diagonal in manager order.
    ///
    /// Stacking and the active window are left alone.
    pub fn cascade_windows(&mut self) -> usize {
        let area = self.config.desktop_area();
        let mut slot = 0;
        for index in 0..self.windows.len() {
            if self.windows[index].state != WindowState::Normal {
                continue;
            }
            let (x, y) = self.config.cascade_position(slot);
            let record = &mut self.windows[index];
            record.bounds = fit_within(
                WindowRect {
                    x,
                    y,
                    ..record.bounds
                },
                area,
            );
            slot += 1;
        }
        self.placements = slot;
        slot as usize
    }

    /// Replaces the bounds of a normal window (used by drag and resize gestures).
    pub fn set_window_bounds(
        &mut self,
        id: &WindowId,
        bounds: WindowRect,
    ) -> Result<(), WindowManagerError> {
        let record = self.open_record_mut(id)?;
        if record.state != WindowState::Normal {
            return Err(WindowManagerError::NotMovable(id.clone()));
        }
        record.bounds = bounds;
        Ok(())
    }

    /// Applies a new viewport size. Maximized windows follow the new desktop area.
    pub fn set_viewport(&mut self, width: i32, height: i32) {
        self.config.viewport_width = width.max(0);
        self.config.viewport_height = height.max(0);
        let area = self.config.desktop_area();
        for record in &mut self.windows {
            if record.state == WindowState::Maximized {
                record.bounds = area;
            }
        }
    }

    fn rank(&self, id: &WindowId) -> Option<usize> {
        self.definitions.iter().position(|spec| &spec.id == id)
    }

    fn fresh_record(&mut self, rank: usize) -> WindowRecord {
        let spec = &self.definitions[rank];
        let area = self.config.desktop_area();
        let size = WindowRect {
            x: 0,
            y: 0,
            w: spec.width.unwrap_or(self.config.default_window_width),
            h: spec.height.unwrap_or(self.config.default_window_height),
        }
        .clamped_min(self.config.min_window_width, self.config.min_window_height);

        let (x, y) = match self.config.placement {
            PlacementPolicy::Cascade => {
                let position = self.config.cascade_position(self.placements);
                self.placements = self.placements.wrapping_add(1);
                position
            }
            PlacementPolicy::Centered => (
                area.x + (area.w - size.w) / 2,
                area.y + (area.h - size.h) / 2,
            ),
        };

        WindowRecord {
            id: spec.id.clone(),
            title: spec.title.clone(),
            icon_ref: spec.icon.clone(),
            bounds: fit_within(WindowRect { x, y, ..size }, area),
            z_index: 0,
            state: WindowState::Normal,
            prev_bounds: None,
        }
    }

    fn insert_record(&mut self, record: WindowRecord) {
        if let Some(existing) = self.windows.iter_mut().find(|w| w.id == record.id) {
            *existing = record;
            return;
        }
        let rank = self.rank(&record.id);
        let position = self
            .windows
            .iter()
            .position(|w| self.rank(&w.id) > rank)
            .unwrap_or(self.windows.len());
        self.windows.insert(position, record);
    }

    fn restore_from_minimized(&mut self, id: &WindowId) -> Result<(), WindowManagerError> {
        let record = self.open_record_mut(id)?;
        if let Some(prev) = record.prev_bounds.take() {
            record.bounds = prev;
        }
        record.state = WindowState::Normal;
        Ok(())
    }

    /// Picks the next active window after `leaving` lost its visibility.
    ///
    /// Most recent visible entry of the focus history first, then the first visible window in
    /// manager order, else nothing stays active.
    fn promote_successor(
        &mut self,
        leaving: &WindowId,
    ) -> Result<Vec<WindowEvent>, WindowManagerError> {
        let from_history = self
            .focus_history
            .iter_recent()
            .find(|id| *id != leaving && self.window(id).is_some_and(|w| w.is_visible()))
            .cloned();
        let successor = from_history.or_else(|| {
            self.visible_windows()
                .find(|w| &w.id != leaving)
                .map(|w| w.id.clone())
        });

        match successor {
            Some(id) => self.activate_window(&id),
            None => Ok(Vec::new()),
        }
    }

    fn open_record_mut(&mut self, id: &WindowId) -> Result<&mut WindowRecord, WindowManagerError> {
        if !self.is_known(id) {
            return Err(WindowManagerError::UnknownWindow(id.clone()));
        }
        self.windows
            .iter_mut()
            .find(|w| &w.id == id && w.is_open())
            .ok_or_else(|| WindowManagerError::NotOpen(id.clone()))
    }

    fn visible_record_mut(
        &mut self,
        id: &WindowId,
    ) -> Result<&mut WindowRecord, WindowManagerError> {
        let record = self.open_record_mut(id)?;
        if record.is_visible() {
            Ok(record)
        } else {
            Err(WindowManagerError::NotVisible(id.clone()))
        }
    }
}

/// Shifts `rect` so it lies inside `area` where possible (top-left wins when too large).
pub(crate) fn fit_within(rect: WindowRect, area: WindowRect) -> WindowRect {
    let max_x = (area.right() - rect.w).max(area.x);
    let max_y = (area.bottom() - rect.h).max(area.y);
    WindowRect {
        x: rect.x.clamp(area.x, max_x),
        y: rect.y.clamp(area.y, max_y),
        ..rect
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::catalog::tests::test_catalog;

    fn manager() -> WindowManager {
        let catalog = test_catalog();
        WindowManager::new(catalog.layout, catalog.windows)
    }

    fn id(raw: &str) -> WindowId {
        WindowId::from(raw)
    }

    #[test]
    fn unknown_window_open_is_rejected_without_state_change() {
        let mut wm = manager();
        let before = wm.clone();

        let err = wm.open_window(&id("nope-window")).unwrap_err();

        assert_eq!(err, WindowManagerError::UnknownWindow(id("nope-window")));
        assert_eq!(wm, before);
    }

    #[test]
    fn open_creates_normal_record_and_activates_it() {
        let mut wm = manager();

        let events = wm.open_window(&id("a-window")).unwrap();

        assert_eq!(
            events,
            vec![
                WindowEvent::Opened(id("a-window")),
                WindowEvent::Activated(id("a-window"))
            ]
        );
        let record = wm.window(&id("a-window")).unwrap();
        assert_eq!(record.state, WindowState::Normal);
        assert_eq!(record.z_index, 1);
        assert_eq!(wm.active_window_id(), Some(&id("a-window")));
    }

    #[test]
    fn cascade_placement_offsets_consecutive_windows() {
        let mut wm = manager();
        wm.open_window(&id("a-window")).unwrap();
        wm.open_window(&id("b-window")).unwrap();

        let a = wm.window(&id("a-window")).unwrap().bounds;
        let b = wm.window(&id("b-window")).unwrap().bounds;
        assert_eq!((a.x, a.y), (40, 40));
        assert_eq!((b.x, b.y), (64, 64));
    }

    #[test]
    fn centered_placement_centers_in_desktop_area() {
        let mut catalog = test_catalog();
        catalog.layout.placement = PlacementPolicy::Centered;
        let mut wm = WindowManager::new(catalog.layout, catalog.windows);

        wm.open_window(&id("c-window")).unwrap();

        // desktop area is 1000x700, window is 300x200
        let bounds = wm.window(&id("c-window")).unwrap().bounds;
        assert_eq!(bounds, WindowRect { x: 350, y: 250, w: 300, h: 200 });
    }

    #[test]
    fn activating_the_active_window_is_a_noop() {
        let mut wm = manager();
        wm.open_window(&id("a-window")).unwrap();
        let before = wm.clone();

        let events = wm.activate_window(&id("a-window")).unwrap();

        assert!(events.is_empty());
        assert_eq!(wm, before);
    }

    #[test]
    fn closing_active_promotes_most_recent_in_history() {
        let mut wm = manager();
        for raw in ["a-window", "b-window", "c-window"] {
            wm.open_window(&id(raw)).unwrap();
        }

        wm.close_window(&id("c-window")).unwrap();
        assert_eq!(wm.active_window_id(), Some(&id("b-window")));

        wm.close_window(&id("b-window")).unwrap();
        assert_eq!(wm.active_window_id(), Some(&id("a-window")));

        wm.close_window(&id("a-window")).unwrap();
        assert_eq!(wm.active_window_id(), None);
        assert!(wm.focus_history().ids().is_empty());
    }

    #[test]
    fn closing_inactive_window_keeps_active_pointer() {
        let mut wm = manager();
        wm.open_window(&id("a-window")).unwrap();
        wm.open_window(&id("b-window")).unwrap();

        let events = wm.close_window(&id("a-window")).unwrap();

        assert_eq!(events, vec![WindowEvent::Closed(id("a-window"))]);
        assert_eq!(wm.active_window_id(), Some(&id("b-window")));
    }

    #[test]
    fn promotion_skips_minimized_history_entries() {
        let mut wm = manager();
        for raw in ["a-window", "b-window", "c-window"] {
            wm.open_window(&id(raw)).unwrap();
        }
        wm.minimize_window(&id("b-window")).unwrap();
        wm.activate_window(&id("c-window")).unwrap();

        wm.minimize_window(&id("c-window")).unwrap();

        assert_eq!(wm.active_window_id(), Some(&id("a-window")));
    }

    #[test]
    fn promotion_falls_back_to_manager_order() {
        let mut wm = manager();
        wm.open_window(&id("b-window")).unwrap();
        wm.open_window(&id("c-window")).unwrap();
        wm.close_window(&id("b-window")).unwrap();
        wm.open_window(&id("b-window")).unwrap();
        wm.open_window(&id("a-window")).unwrap();
        // leave only manager order to decide
        wm.focus_history.remove(&id("b-window"));
        wm.focus_history.remove(&id("c-window"));

        wm.close_window(&id("a-window")).unwrap();

        assert_eq!(wm.active_window_id(), Some(&id("b-window")));
    }

    #[test]
    fn toggle_maximize_round_trip_restores_exact_bounds() {
        let mut wm = manager();
        wm.open_window(&id("c-window")).unwrap();
        let before = wm.window(&id("c-window")).unwrap().bounds;

        wm.toggle_maximize(&id("c-window")).unwrap();
        let maximized = wm.window(&id("c-window")).unwrap();
        assert_eq!(maximized.state, WindowState::Maximized);
        assert_eq!(maximized.bounds, WindowRect { x: 0, y: 0, w: 1000, h: 700 });

        wm.toggle_maximize(&id("c-window")).unwrap();
        let restored = wm.window(&id("c-window")).unwrap();
        assert_eq!(restored.state, WindowState::Normal);
        assert_eq!(restored.bounds, before);
        assert_eq!(restored.prev_bounds, None);
    }

    #[test]
    fn minimize_after_maximize_keeps_pre_maximize_bounds() {
        let mut wm = manager();
        wm.open_window(&id("a-window")).unwrap();
        let original = wm.window(&id("a-window")).unwrap().bounds;

        wm.toggle_maximize(&id("a-window")).unwrap();
        wm.minimize_window(&id("a-window")).unwrap();
        let minimized = wm.window(&id("a-window")).unwrap();
        assert_eq!(minimized.state, WindowState::Minimized);
        assert_eq!(minimized.prev_bounds, Some(original));
        assert_eq!(wm.active_window_id(), None);

        let events = wm.open_window(&id("a-window")).unwrap();
        assert_eq!(
            events,
            vec![
                WindowEvent::Restored(id("a-window")),
                WindowEvent::Activated(id("a-window"))
            ]
        );
        let reopened = wm.window(&id("a-window")).unwrap();
        assert_eq!(reopened.state, WindowState::Normal);
        assert_eq!(reopened.bounds, original);
    }

    #[test]
    fn toggle_maximize_on_minimized_window_restores_then_maximizes() {
        let mut wm = manager();
        wm.open_window(&id("a-window")).unwrap();
        let original = wm.window(&id("a-window")).unwrap().bounds;
        wm.minimize_window(&id("a-window")).unwrap();

        wm.toggle_maximize(&id("a-window")).unwrap();

        let record = wm.window(&id("a-window")).unwrap();
        assert_eq!(record.state, WindowState::Maximized);
        assert_eq!(record.prev_bounds, Some(original));
        assert!(wm.is_active(&id("a-window")));
    }

    #[test]
    fn closed_window_reopens_fresh() {
        let mut wm = manager();
        wm.open_window(&id("a-window")).unwrap();
        wm.toggle_maximize(&id("a-window")).unwrap();
        wm.close_window(&id("a-window")).unwrap();

        assert_eq!(
            wm.minimize_window(&id("a-window")),
            Err(WindowManagerError::NotOpen(id("a-window")))
        );

        let events = wm.open_window(&id("a-window")).unwrap();
        assert_eq!(events[0], WindowEvent::Opened(id("a-window")));
        let record = wm.window(&id("a-window")).unwrap();
        assert_eq!(record.state, WindowState::Normal);
        assert_eq!(record.prev_bounds, None);
        assert_eq!(wm.windows().len(), 1);
    }

    #[test]
    fn alt_tab_uses_manager_order_and_wraps() {
        let mut wm = manager();
        wm.open_window(&id("c-window")).unwrap();
        wm.open_window(&id("a-window")).unwrap();
        wm.open_window(&id("b-window")).unwrap();
        wm.activate_window(&id("c-window")).unwrap();

        wm.switch_to_next_window().unwrap();
        assert_eq!(wm.active_window_id(), Some(&id("a-window")));
        wm.switch_to_next_window().unwrap();
        assert_eq!(wm.active_window_id(), Some(&id("b-window")));
    }

    #[test]
    fn alt_tab_with_single_visible_window_is_noop() {
        let mut wm = manager();
        wm.open_window(&id("a-window")).unwrap();
        wm.open_window(&id("b-window")).unwrap();
        wm.minimize_window(&id("a-window")).unwrap();
        let before = wm.clone();

        assert!(wm.switch_to_next_window().unwrap().is_empty());
        assert_eq!(wm, before);
    }

    #[test]
    fn hidden_windows_cannot_be_activated_or_moved() {
        let mut wm = manager();
        wm.open_window(&id("a-window")).unwrap();
        wm.minimize_window(&id("a-window")).unwrap();

        assert_eq!(
            wm.activate_window(&id("a-window")),
            Err(WindowManagerError::NotVisible(id("a-window")))
        );
        assert_eq!(
            wm.set_window_bounds(&id("a-window"), WindowRect { x: 0, y: 0, w: 300, h: 300 }),
            Err(WindowManagerError::NotMovable(id("a-window")))
        );
    }

    #[test]
    fn cascade_windows_relays_normal_windows_only() {
        let mut wm = manager();
        for raw in ["a-window", "b-window", "c-window"] {
            wm.open_window(&id(raw)).unwrap();
        }
        wm.set_window_bounds(&id("a-window"), WindowRect { x: 500, y: 400, w: 300, h: 200 })
            .unwrap();
        wm.toggle_maximize(&id("b-window")).unwrap();
        let active = wm.active_window_id().cloned();

        assert_eq!(wm.cascade_windows(), 2);

        let a = wm.window(&id("a-window")).unwrap().bounds;
        let c = wm.window(&id("c-window")).unwrap().bounds;
        assert_eq!((a.x, a.y), (40, 40));
        assert_eq!((c.x, c.y), (64, 64));
        assert_eq!(wm.window(&id("b-window")).unwrap().state, WindowState::Maximized);
        assert_eq!(wm.active_window_id().cloned(), active);
    }

    #[test]
    fn viewport_change_refits_maximized_windows() {
        let mut wm = manager();
        wm.open_window(&id("a-window")).unwrap();
        wm.toggle_maximize(&id("a-window")).unwrap();

        wm.set_viewport(800, 600);

        assert_eq!(
            wm.window(&id("a-window")).unwrap().bounds,
            WindowRect { x: 0, y: 0, w: 800, h: 560 }
        );
    }
}

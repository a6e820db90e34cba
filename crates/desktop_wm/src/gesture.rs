//! Drag and resize gesture state machine.
//!
//! One controller serves both gestures, so at most one can be active. Entering a gesture returns
//! [`PointerHook::Subscribe`] and leaving it returns [`PointerHook::Unsubscribe`], exactly once
//! each; the host binds and unbinds its pointer-move/up listeners on those hooks only.

use thiserror::Error;

use crate::config::DesktopConfig;
use crate::model::{PointerPosition, ResizeEdge, WindowId, WindowRecord, WindowRect, WindowState};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GestureError {
    #[error("a {0} gesture is already in progress")]
    Busy(&'static str),
    #[error("window `{0}` is maximized and cannot be dragged or resized")]
    Maximized(WindowId),
    #[error("window `{0}` is not visible")]
    NotVisible(WindowId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub edge: ResizeEdge,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging(DragSession),
    Resizing(ResizeSession),
}

impl Gesture {
    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging(_) => "drag",
            Self::Resizing(_) => "resize",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Enter/exit actions of a gesture.
pub enum PointerHook {
    Subscribe { window_id: WindowId },
    Unsubscribe { window_id: WindowId },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GestureController {
    gesture: Gesture,
}

impl GestureController {
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, Gesture::Idle)
    }

    /// Window targeted by the running gesture.
    pub fn window_id(&self) -> Option<&WindowId> {
        match &self.gesture {
            Gesture::Idle => None,
            Gesture::Dragging(session) => Some(&session.window_id),
            Gesture::Resizing(session) => Some(&session.window_id),
        }
    }

    pub fn begin_drag(
        &mut self,
        window: &WindowRecord,
        pointer: PointerPosition,
    ) -> Result<PointerHook, GestureError> {
        self.check_entry(window)?;
        self.gesture = Gesture::Dragging(DragSession {
            window_id: window.id.clone(),
            pointer_start: pointer,
            rect_start: window.bounds,
        });
        Ok(PointerHook::Subscribe {
            window_id: window.id.clone(),
        })
    }

    pub fn begin_resize(
        &mut self,
        window: &WindowRecord,
        edge: ResizeEdge,
        pointer: PointerPosition,
    ) -> Result<PointerHook, GestureError> {
        self.check_entry(window)?;
        self.gesture = Gesture::Resizing(ResizeSession {
            window_id: window.id.clone(),
            edge,
            pointer_start: pointer,
            rect_start: window.bounds,
        });
        Ok(PointerHook::Subscribe {
            window_id: window.id.clone(),
        })
    }

    /// Candidate bounds for the current pointer position, or `None` while idle.
    pub fn pointer_move(
        &self,
        pointer: PointerPosition,
        config: &DesktopConfig,
    ) -> Option<(WindowId, WindowRect)> {
        match &self.gesture {
            Gesture::Idle => None,
            Gesture::Dragging(session) => {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let moved = session.rect_start.offset(dx, dy);
                Some((
                    session.window_id.clone(),
                    clamp_drag(moved, config.desktop_area(), config.drag_min_visible),
                ))
            }
            Gesture::Resizing(session) => {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let resized = resize_rect(session.rect_start, session.edge, dx, dy);
                Some((
                    session.window_id.clone(),
                    clamp_resize(
                        resized,
                        session.rect_start,
                        session.edge,
                        config.min_window_width,
                        config.min_window_height,
                    ),
                ))
            }
        }
    }

    /// Pointer-up. Returns the exit hook, or `None` when nothing was running.
    pub fn end(&mut self) -> Option<PointerHook> {
        let window_id = self.window_id()?.clone();
        self.gesture = Gesture::Idle;
        Some(PointerHook::Unsubscribe { window_id })
    }

    fn check_entry(&self, window: &WindowRecord) -> Result<(), GestureError> {
        if !self.is_idle() {
            return Err(GestureError::Busy(self.gesture.name()));
        }
        match window.state {
            WindowState::Maximized => Err(GestureError::Maximized(window.id.clone())),
            WindowState::Minimized | WindowState::Closed => {
                Err(GestureError::NotVisible(window.id.clone()))
            }
            WindowState::Normal => Ok(()),
        }
    }
}

/// Applies resize deltas for a given edge/corner drag.
pub fn resize_rect(start: WindowRect, edge: ResizeEdge, dx: i32, dy: i32) -> WindowRect {
    match edge {
        ResizeEdge::East => WindowRect {
            w: start.w + dx,
            ..start
        },
        ResizeEdge::West => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            ..start
        },
        ResizeEdge::South => WindowRect {
            h: start.h + dy,
            ..start
        },
        ResizeEdge::North => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            ..start
        },
        ResizeEdge::NorthEast => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            w: start.w + dx,
            ..start
        },
        ResizeEdge::NorthWest => WindowRect {
            x: start.x + dx,
            y: start.y + dy,
            w: start.w - dx,
            h: start.h - dy,
        },
        ResizeEdge::SouthEast => WindowRect {
            w: start.w + dx,
            h: start.h + dy,
            ..start
        },
        ResizeEdge::SouthWest => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            h: start.h + dy,
            ..start
        },
    }
}

/// Enforces the minimum size while keeping the edge opposite the grabbed one fixed.
fn clamp_resize(
    rect: WindowRect,
    start: WindowRect,
    edge: ResizeEdge,
    min_w: i32,
    min_h: i32,
) -> WindowRect {
    let mut out = rect.clamped_min(min_w, min_h);
    if edge.moves_west_edge() {
        out.x = start.right() - out.w;
    }
    if edge.moves_north_edge() {
        out.y = start.bottom() - out.h;
    }
    out
}

/// Keeps at least `min_visible` pixels of the window inside `area` and the title bar below the
/// top edge.
fn clamp_drag(rect: WindowRect, area: WindowRect, min_visible: i32) -> WindowRect {
    let keep_w = min_visible.min(rect.w).max(1);
    let keep_h = min_visible.min(rect.h).max(1);
    let min_x = area.x - rect.w + keep_w;
    let max_x = (area.right() - keep_w).max(min_x);
    let max_y = (area.bottom() - keep_h).max(area.y);
    WindowRect {
        x: rect.x.clamp(min_x, max_x),
        y: rect.y.clamp(area.y, max_y),
        ..rect
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(state: WindowState) -> WindowRecord {
        WindowRecord {
            id: WindowId::from("a-window"),
            title: "A".to_string(),
            icon_ref: "a".to_string(),
            bounds: WindowRect { x: 100, y: 100, w: 400, h: 300 },
            z_index: 1,
            state,
            prev_bounds: None,
        }
    }

    fn at(x: i32, y: i32) -> PointerPosition {
        PointerPosition { x, y }
    }

    #[test]
    fn drag_moves_by_pointer_delta_and_hooks_are_symmetric() {
        let config = DesktopConfig::default();
        let mut controller = GestureController::default();

        let enter = controller.begin_drag(&record(WindowState::Normal), at(10, 10)).unwrap();
        assert_eq!(enter, PointerHook::Subscribe { window_id: WindowId::from("a-window") });

        let (_, moved) = controller.pointer_move(at(35, 50), &config).unwrap();
        assert_eq!(moved, WindowRect { x: 125, y: 140, w: 400, h: 300 });

        assert_eq!(
            controller.end(),
            Some(PointerHook::Unsubscribe { window_id: WindowId::from("a-window") })
        );
        assert_eq!(controller.end(), None);
        assert!(controller.is_idle());
    }

    #[test]
    fn second_gesture_is_refused_while_one_is_active() {
        let mut controller = GestureController::default();
        controller.begin_drag(&record(WindowState::Normal), at(0, 0)).unwrap();

        let err = controller
            .begin_resize(&record(WindowState::Normal), ResizeEdge::East, at(0, 0))
            .unwrap_err();

        assert_eq!(err, GestureError::Busy("drag"));
    }

    #[test]
    fn maximized_window_is_refused_at_entry() {
        let mut controller = GestureController::default();

        let err = controller.begin_drag(&record(WindowState::Maximized), at(0, 0)).unwrap_err();

        assert!(matches!(err, GestureError::Maximized(_)));
        assert!(controller.is_idle());
    }

    #[test]
    fn drag_keeps_window_partly_on_desktop() {
        let config = DesktopConfig::default();
        let mut controller = GestureController::default();
        controller.begin_drag(&record(WindowState::Normal), at(0, 0)).unwrap();

        let (_, far_left) = controller.pointer_move(at(-5000, -5000), &config).unwrap();
        assert_eq!(far_left.x, -400 + 48);
        assert_eq!(far_left.y, 0);

        let (_, far_right) = controller.pointer_move(at(5000, 5000), &config).unwrap();
        assert_eq!(far_right.x, 1280 - 48);
        assert_eq!(far_right.y, 762 - 48);
    }

    #[test]
    fn west_resize_respects_minimum_and_pins_right_edge() {
        let config = DesktopConfig::default();
        let mut controller = GestureController::default();
        controller
            .begin_resize(&record(WindowState::Normal), ResizeEdge::NorthWest, at(0, 0))
            .unwrap();

        let (_, resized) = controller.pointer_move(at(1000, 1000), &config).unwrap();

        assert_eq!(resized.w, config.min_window_width);
        assert_eq!(resized.h, config.min_window_height);
        assert_eq!(resized.right(), 500);
        assert_eq!(resized.bottom(), 400);
    }

    #[test]
    fn south_east_resize_grows_from_top_left() {
        let config = DesktopConfig::default();
        let mut controller = GestureController::default();
        controller
            .begin_resize(&record(WindowState::Normal), ResizeEdge::SouthEast, at(500, 400))
            .unwrap();

        let (_, resized) = controller.pointer_move(at(560, 430), &config).unwrap();

        assert_eq!(resized, WindowRect { x: 100, y: 100, w: 460, h: 330 });
    }
}

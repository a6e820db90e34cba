//! Desktop state transitions.
//!
//! [`reduce_desktop`] is the only function that changes a [`DesktopState`]. It returns the side
//! effects for the runtime to execute, or an error the runtime turns into a logged no-op.

use desktop_wm_contract::{CollaboratorAction, SoundEffect};
use leptos::logging;
use thiserror::Error;

use crate::catalog::DesktopCatalog;
use crate::config::DesktopConfig;
use crate::desktop_icons::{DropOutcome, IconActivation, IconError, IconManager};
use crate::gesture::{GestureController, GestureError, PointerHook};
use crate::model::{IconId, PointerPosition, ResizeEdge, WindowId, WindowRecord, WindowState};
use crate::shortcuts::{resolve_shortcut, KeyChord, ShortcutCommand, ShortcutContext};
use crate::start_menu::{MenuCommand, StartMenu, StartMenuError};
use crate::taskbar::{Taskbar, TaskbarCommand, TaskbarError};
use crate::window_manager::{WindowEvent, WindowManager, WindowManagerError};
use crate::window_menu::{WindowMenu, WindowMenuCommand};

#[derive(Debug, Clone, PartialEq)]
/// Everything the desktop knows. Components never reach into each other; the reducer wires them.
pub struct DesktopState {
    pub manager: WindowManager,
    pub taskbar: Taskbar,
    pub start_menu: StartMenu,
    pub icons: IconManager,
    pub gestures: GestureController,
    pub window_menu: Option<WindowMenu>,
    /// Keyboard focus is on the desktop surface rather than a window.
    pub desktop_focused: bool,
}

impl DesktopState {
    pub fn from_catalog(catalog: &DesktopCatalog) -> Self {
        Self {
            manager: WindowManager::new(catalog.layout.clone(), catalog.windows.clone()),
            taskbar: Taskbar::default(),
            start_menu: StartMenu::from_entries(&catalog.menu),
            icons: IconManager::new(&catalog.icons, &catalog.layout),
            gestures: GestureController::default(),
            window_menu: None,
            desktop_focused: false,
        }
    }

    pub fn config(&self) -> &DesktopConfig {
        self.manager.config()
    }

    /// True while the start menu or a window menu is showing.
    pub fn menu_open(&self) -> bool {
        self.start_menu.is_open() || self.window_menu.is_some()
    }

    /// True while any pointer gesture (window or icon) owns the pointer stream.
    pub fn pointer_captured(&self) -> bool {
        !self.gestures.is_idle() || self.icons.is_dragging()
    }

    fn dismiss_menus(&mut self) {
        self.start_menu.close();
        self.window_menu = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Owner of a pointer subscription.
pub enum PointerTarget {
    Window(WindowId),
    Icon(IconId),
}

#[derive(Debug, Clone, PartialEq)]
/// Input to [`reduce_desktop`].
pub enum DesktopAction {
    /// Open a window, or restore it when minimized.
    OpenWindow { window_id: WindowId },
    CloseWindow { window_id: WindowId },
    MinimizeWindow { window_id: WindowId },
    /// Maximize a normal window or restore a maximized one.
    ToggleMaximize { window_id: WindowId },
    /// Pointer-down anywhere on a window.
    ActivateWindow { window_id: WindowId },
    /// Alt+Tab.
    CycleWindows,
    CascadeWindows,
    TaskbarClick { window_id: WindowId },
    TitleBarDoubleClick { window_id: WindowId },
    BeginDrag {
        window_id: WindowId,
        pointer: PointerPosition,
    },
    BeginResize {
        window_id: WindowId,
        edge: ResizeEdge,
        pointer: PointerPosition,
    },
    PointerMove { pointer: PointerPosition },
    PointerUp { pointer: PointerPosition },
    IconPointerDown {
        icon_id: IconId,
        pointer: PointerPosition,
    },
    IconDoubleClick { icon_id: IconId },
    /// Click on empty desktop.
    DesktopClick,
    ToggleStartMenu,
    HoverStartMenuItem { item: String },
    ClickStartMenuItem { item: String },
    /// Click that landed outside every open menu.
    ClickOutsideMenus,
    OpenWindowMenu { window_id: WindowId },
    ChooseWindowMenuItem { command: WindowMenuCommand },
    KeyDown(KeyChord),
    SetViewport { width: i32, height: i32 },
}

#[derive(Debug, Clone, PartialEq)]
/// Side effects requested by the reducer, in execution order.
pub enum RuntimeEffect {
    PlaySound(SoundEffect),
    /// Broadcast to activation observers.
    WindowActivated(WindowId),
    /// Bind pointer-move/up listeners; emitted once when a gesture starts.
    SubscribePointer(PointerTarget),
    /// Unbind them; emitted once when the gesture ends.
    UnsubscribePointer(PointerTarget),
    /// Move keyboard focus into the window's content.
    FocusWindowInput(WindowId),
    InvokeCollaborator(CollaboratorAction),
}

#[derive(Debug, Error, Clone, PartialEq)]
/// Reasons an action was refused. None of them are faults; the runtime logs and ignores them.
pub enum ReducerError {
    #[error(transparent)]
    Window(#[from] WindowManagerError),
    #[error(transparent)]
    Gesture(#[from] GestureError),
    #[error(transparent)]
    Taskbar(#[from] TaskbarError),
    #[error(transparent)]
    StartMenu(#[from] StartMenuError),
    #[error(transparent)]
    Icon(#[from] IconError),
    #[error("pointer is captured by another gesture")]
    PointerCaptured,
    #[error("no window menu is open")]
    NoWindowMenu,
    #[error("window menu item `{}` is disabled", .0.label())]
    DisabledMenuItem(WindowMenuCommand),
}

impl ReducerError {
    /// Feedback sound for refusals the user can see, such as grabbing a maximized window.
    pub fn feedback_sound(&self) -> Option<SoundEffect> {
        match self {
            Self::Gesture(GestureError::Maximized(_)) | Self::DisabledMenuItem(_) => {
                Some(SoundEffect::Error)
            }
            _ => None,
        }
    }
}

/// Applies `action` to `state` and collects the resulting side effects.
///
/// After every accepted action the taskbar is re-synchronized with the window manager, a gesture
/// whose window left the normal state is ended, and keyboard focus leaves the desktop when a window
/// was activated.
///
/// # Errors
///
/// Returns a [`ReducerError`] when the action does not apply to the current state. `state` may be
/// partially modified in that case; callers discard it.
pub fn reduce_desktop(
    state: &mut DesktopState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();

    match action {
        DesktopAction::OpenWindow { window_id } => {
            state.dismiss_menus();
            let events = state.manager.open_window(&window_id)?;
            push_window_events(&mut effects, events);
        }
        DesktopAction::CloseWindow { window_id } => {
            state.dismiss_menus();
            let events = state.manager.close_window(&window_id)?;
            push_window_events(&mut effects, events);
        }
        DesktopAction::MinimizeWindow { window_id } => {
            state.dismiss_menus();
            let events = state.manager.minimize_window(&window_id)?;
            push_window_events(&mut effects, events);
        }
        DesktopAction::ToggleMaximize { window_id }
        | DesktopAction::TitleBarDoubleClick { window_id } => {
            state.dismiss_menus();
            let events = state.manager.toggle_maximize(&window_id)?;
            push_window_events(&mut effects, events);
        }
        DesktopAction::ActivateWindow { window_id } => {
            state.dismiss_menus();
            let events = state.manager.activate_window(&window_id)?;
            push_window_events(&mut effects, events);
        }
        DesktopAction::CycleWindows => {
            let events = state.manager.switch_to_next_window()?;
            push_window_events(&mut effects, events);
        }
        DesktopAction::CascadeWindows => {
            state.dismiss_menus();
            state.manager.cascade_windows();
        }
        DesktopAction::TaskbarClick { window_id } => {
            state.dismiss_menus();
            let events = match state.taskbar.click_command(&state.manager, &window_id)? {
                TaskbarCommand::Open(id) => state.manager.open_window(&id)?,
                TaskbarCommand::Minimize(id) => state.manager.minimize_window(&id)?,
                TaskbarCommand::Activate(id) => state.manager.activate_window(&id)?,
            };
            push_window_events(&mut effects, events);
        }
        DesktopAction::BeginDrag { window_id, pointer } => {
            if state.icons.is_dragging() {
                return Err(ReducerError::PointerCaptured);
            }
            let record = gesture_window(&state.manager, &window_id)?;
            let hook = state.gestures.begin_drag(record, pointer)?;
            state.dismiss_menus();
            effects.push(pointer_hook_effect(hook));
            let events = state.manager.activate_window(&window_id)?;
            push_window_events(&mut effects, events);
        }
        DesktopAction::BeginResize {
            window_id,
            edge,
            pointer,
        } => {
            if state.icons.is_dragging() {
                return Err(ReducerError::PointerCaptured);
            }
            let record = gesture_window(&state.manager, &window_id)?;
            let hook = state.gestures.begin_resize(record, edge, pointer)?;
            state.dismiss_menus();
            effects.push(pointer_hook_effect(hook));
            let events = state.manager.activate_window(&window_id)?;
            push_window_events(&mut effects, events);
        }
        DesktopAction::PointerMove { pointer } => {
            track_pointer(state, pointer)?;
        }
        DesktopAction::PointerUp { pointer } => {
            if state.icons.is_dragging() {
                if let Some(outcome) = state.icons.end_drag(pointer) {
                    let (DropOutcome::Moved { icon_id, .. } | DropOutcome::Reverted { icon_id, .. }) =
                        outcome;
                    effects.push(RuntimeEffect::UnsubscribePointer(PointerTarget::Icon(icon_id)));
                }
            } else if !state.gestures.is_idle() {
                if let Some((window_id, bounds)) =
                    state.gestures.pointer_move(pointer, state.manager.config())
                {
                    if let Err(err) = state.manager.set_window_bounds(&window_id, bounds) {
                        logging::warn!("final gesture bounds dropped: {err}");
                    }
                }
                // Pointer-up ends the gesture even when the last move cannot apply.
                if let Some(hook) = state.gestures.end() {
                    effects.push(pointer_hook_effect(hook));
                }
            }
        }
        DesktopAction::IconPointerDown { icon_id, pointer } => {
            if state.pointer_captured() {
                return Err(ReducerError::PointerCaptured);
            }
            state.icons.select(&icon_id)?;
            state.icons.begin_drag(&icon_id, pointer)?;
            state.dismiss_menus();
            state.desktop_focused = true;
            effects.push(RuntimeEffect::SubscribePointer(PointerTarget::Icon(icon_id)));
        }
        DesktopAction::IconDoubleClick { icon_id } => {
            state.dismiss_menus();
            let activation = state.icons.activation(&icon_id)?;
            apply_icon_activation(state, activation, &mut effects)?;
        }
        DesktopAction::DesktopClick => {
            state.dismiss_menus();
            state.icons.clear_selection();
            state.desktop_focused = true;
        }
        DesktopAction::ToggleStartMenu => {
            state.window_menu = None;
            state.start_menu.toggle();
        }
        DesktopAction::HoverStartMenuItem { item } => {
            state.start_menu.hover(&item)?;
        }
        DesktopAction::ClickStartMenuItem { item } => match state.start_menu.click(&item)? {
            Some(MenuCommand::OpenWindow(window_id)) => {
                let events = state.manager.open_window(&window_id)?;
                push_window_events(&mut effects, events);
            }
            Some(MenuCommand::Collaborator(action)) => {
                effects.push(RuntimeEffect::InvokeCollaborator(action));
            }
            None => {}
        },
        DesktopAction::ClickOutsideMenus => {
            state.dismiss_menus();
        }
        DesktopAction::OpenWindowMenu { window_id } => {
            open_window_menu(state, window_id)?;
        }
        DesktopAction::ChooseWindowMenuItem { command } => {
            let menu = state.window_menu.take().ok_or(ReducerError::NoWindowMenu)?;
            let events = run_window_menu_command(&mut state.manager, &menu.window_id, command)?;
            push_window_events(&mut effects, events);
        }
        DesktopAction::KeyDown(chord) => {
            let context = ShortcutContext {
                desktop_focused: state.desktop_focused,
                menu_open: state.menu_open(),
            };
            if let Some(command) = resolve_shortcut(&chord, context) {
                run_shortcut(state, command, &mut effects)?;
            }
        }
        DesktopAction::SetViewport { width, height } => {
            state.manager.set_viewport(width, height);
        }
    }

    finish_transition(state, &mut effects);
    Ok(effects)
}

fn run_shortcut(
    state: &mut DesktopState,
    command: ShortcutCommand,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    match command {
        ShortcutCommand::CycleWindows => {
            let events = state.manager.switch_to_next_window()?;
            push_window_events(effects, events);
        }
        ShortcutCommand::CloseActiveWindow => {
            if let Some(active) = state.manager.active_window_id().cloned() {
                state.dismiss_menus();
                let events = state.manager.close_window(&active)?;
                push_window_events(effects, events);
            }
        }
        ShortcutCommand::OpenWindowMenu => {
            if let Some(active) = state.manager.active_window_id().cloned() {
                open_window_menu(state, active)?;
            }
        }
        ShortcutCommand::ToggleStartMenu => {
            state.window_menu = None;
            state.start_menu.toggle();
        }
        ShortcutCommand::DismissMenus => state.dismiss_menus(),
        ShortcutCommand::NavigateIcons(direction) => {
            state.icons.navigate(direction);
        }
        ShortcutCommand::ActivateSelectedIcon => {
            if let Some(activation) = state.icons.selected_activation() {
                apply_icon_activation(state, activation, effects)?;
            }
        }
    }
    Ok(())
}

fn open_window_menu(state: &mut DesktopState, window_id: WindowId) -> Result<(), ReducerError> {
    gesture_window(&state.manager, &window_id)?;
    state.start_menu.close();
    state.window_menu = Some(WindowMenu::new(window_id));
    Ok(())
}

fn run_window_menu_command(
    manager: &mut WindowManager,
    window_id: &WindowId,
    command: WindowMenuCommand,
) -> Result<Vec<WindowEvent>, ReducerError> {
    let record_state = manager
        .window(window_id)
        .map(|record| record.state)
        .ok_or_else(|| not_open(manager, window_id))?;
    if !command.is_enabled(record_state) {
        return Err(ReducerError::DisabledMenuItem(command));
    }

    let events = match (command, record_state) {
        (WindowMenuCommand::Restore, WindowState::Minimized) => manager.open_window(window_id)?,
        (WindowMenuCommand::Restore, _) | (WindowMenuCommand::Maximize, _) => {
            manager.toggle_maximize(window_id)?
        }
        (WindowMenuCommand::Minimize, _) => manager.minimize_window(window_id)?,
        (WindowMenuCommand::Close, _) => manager.close_window(window_id)?,
    };
    Ok(events)
}

fn apply_icon_activation(
    state: &mut DesktopState,
    activation: IconActivation,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    match activation {
        // Icons without a matching window do nothing.
        IconActivation::OpenWindow(window_id) if !state.manager.is_known(&window_id) => {}
        IconActivation::OpenWindow(window_id) => {
            let events = state.manager.open_window(&window_id)?;
            push_window_events(effects, events);
        }
        IconActivation::Collaborator(action) => {
            effects.push(RuntimeEffect::InvokeCollaborator(action));
        }
    }
    Ok(())
}

fn track_pointer(state: &mut DesktopState, pointer: PointerPosition) -> Result<(), ReducerError> {
    if state.icons.is_dragging() {
        state.icons.drag_move(pointer);
        return Ok(());
    }
    if let Some((window_id, bounds)) = state.gestures.pointer_move(pointer, state.manager.config())
    {
        state.manager.set_window_bounds(&window_id, bounds)?;
    }
    Ok(())
}

/// Open record for `window_id`.
fn gesture_window<'a>(
    manager: &'a WindowManager,
    window_id: &WindowId,
) -> Result<&'a WindowRecord, ReducerError> {
    manager
        .window(window_id)
        .filter(|record| record.is_open())
        .ok_or_else(|| not_open(manager, window_id))
}

fn not_open(manager: &WindowManager, window_id: &WindowId) -> ReducerError {
    if manager.is_known(window_id) {
        WindowManagerError::NotOpen(window_id.clone()).into()
    } else {
        WindowManagerError::UnknownWindow(window_id.clone()).into()
    }
}

fn pointer_hook_effect(hook: PointerHook) -> RuntimeEffect {
    match hook {
        PointerHook::Subscribe { window_id } => {
            RuntimeEffect::SubscribePointer(PointerTarget::Window(window_id))
        }
        PointerHook::Unsubscribe { window_id } => {
            RuntimeEffect::UnsubscribePointer(PointerTarget::Window(window_id))
        }
    }
}

fn push_window_events(effects: &mut Vec<RuntimeEffect>, events: Vec<WindowEvent>) {
    for event in events {
        match event {
            WindowEvent::Opened(_) => {}
            WindowEvent::Restored(_) | WindowEvent::Unmaximized(_) => {
                effects.push(RuntimeEffect::PlaySound(SoundEffect::Restore));
            }
            WindowEvent::Minimized(_) => effects.push(RuntimeEffect::PlaySound(SoundEffect::Minimize)),
            WindowEvent::Maximized(_) => effects.push(RuntimeEffect::PlaySound(SoundEffect::Maximize)),
            WindowEvent::Closed(_) => effects.push(RuntimeEffect::PlaySound(SoundEffect::Close)),
            WindowEvent::Activated(window_id) => {
                effects.push(RuntimeEffect::WindowActivated(window_id.clone()));
                effects.push(RuntimeEffect::FocusWindowInput(window_id));
            }
        }
    }
}

fn finish_transition(state: &mut DesktopState, effects: &mut Vec<RuntimeEffect>) {
    let gesture_orphaned = state
        .gestures
        .window_id()
        .is_some_and(|id| {
            !state
                .manager
                .window(id)
                .is_some_and(|w| w.state == WindowState::Normal)
        });
    if gesture_orphaned {
        if let Some(hook) = state.gestures.end() {
            effects.push(pointer_hook_effect(hook));
        }
    }

    let menu_orphaned = state
        .window_menu
        .as_ref()
        .is_some_and(|menu| !state.manager.window(&menu.window_id).is_some_and(|w| w.is_open()));
    if menu_orphaned {
        state.window_menu = None;
    }

    if effects
        .iter()
        .any(|effect| matches!(effect, RuntimeEffect::WindowActivated(_)))
    {
        state.desktop_focused = false;
    }

    state.taskbar.sync(&state.manager);
}

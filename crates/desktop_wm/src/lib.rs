//! Headless desktop window manager: window lifecycle and stacking, drag/resize gestures, taskbar,
//! start menu, desktop icons, and keyboard shortcuts.
//!
//! All state lives in one [`DesktopState`] changed only by [`reduce_desktop`]. [`DesktopRuntime`]
//! wraps it with collaborators and a transactional dispatch, and [`project_layout`] turns state
//! into what a renderer draws.

pub mod catalog;
pub mod config;
pub mod desktop_icons;
pub mod gesture;
pub mod input;
pub mod layout;
pub mod model;
pub mod reducer;
pub mod runtime;
pub mod shortcuts;
pub mod start_menu;
pub mod taskbar;
pub mod window_manager;
pub mod window_menu;

pub use catalog::{CatalogError, DesktopCatalog};
pub use config::{DesktopConfig, PlacementPolicy};
pub use layout::{project_layout, DesktopLayout};
pub use model::*;
pub use reducer::{
    reduce_desktop, DesktopAction, DesktopState, PointerTarget, ReducerError, RuntimeEffect,
};
pub use runtime::DesktopRuntime;
pub use shortcuts::KeyChord;
pub use window_manager::{WindowManager, WindowManagerError};

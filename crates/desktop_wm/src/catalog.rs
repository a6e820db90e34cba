//! Static desktop catalog: window definitions, start-menu tree, and desktop icons.
//!
//! The built-in catalog is generated from `desktop.toml` at build time and parsed on demand.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::DesktopConfig;
use crate::model::{IconId, WindowId};

include!(concat!(env!("OUT_DIR"), "/desktop_catalog_generated.rs"));

/// Catalog schema understood by this crate.
pub const DESKTOP_CATALOG_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
/// Errors raised while loading a desktop catalog.
pub enum CatalogError {
    #[error("desktop catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported desktop catalog schema version {0}")]
    SchemaVersion(u32),
    #[error("duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },
    #[error("menu item `{item}` opens unknown window `{window}`")]
    UnknownMenuTarget { item: String, window: WindowId },
    #[error("menu item `{0}` has neither children nor a command")]
    EmptyMenuItem(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A manageable window known to the desktop.
pub struct WindowSpec {
    pub id: WindowId,
    pub title: String,
    pub icon: String,
    #[serde(default)]
    pub width: Option<i32>,
    #[serde(default)]
    pub height: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Start-menu entry. Entries with `items` are submenus; the rest carry a command.
pub struct MenuEntrySpec {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub opens: Option<WindowId>,
    #[serde(default)]
    pub collaborator: Option<String>,
    #[serde(default)]
    pub items: Vec<MenuEntrySpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopIconSpec {
    pub id: IconId,
    pub label: String,
    pub icon: String,
    #[serde(default)]
    pub collaborator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopCatalog {
    pub schema_version: u32,
    #[serde(default)]
    pub layout: DesktopConfig,
    pub windows: Vec<WindowSpec>,
    #[serde(default)]
    pub menu: Vec<MenuEntrySpec>,
    #[serde(default)]
    pub icons: Vec<DesktopIconSpec>,
}

impl DesktopCatalog {
    /// Loads the catalog compiled in from `desktop.toml`.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(DESKTOP_CATALOG_JSON)
    }

    /// Parses and validates a catalog.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.schema_version != DESKTOP_CATALOG_SCHEMA_VERSION {
            return Err(CatalogError::SchemaVersion(self.schema_version));
        }

        let mut windows = HashSet::new();
        for window in &self.windows {
            if !windows.insert(&window.id) {
                return Err(CatalogError::DuplicateId {
                    kind: "window",
                    id: window.id.to_string(),
                });
            }
        }

        let mut menu_ids = HashSet::new();
        let mut pending: Vec<&MenuEntrySpec> = self.menu.iter().collect();
        while let Some(entry) = pending.pop() {
            if !menu_ids.insert(entry.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    kind: "menu",
                    id: entry.id.clone(),
                });
            }
            if let Some(target) = &entry.opens {
                if !windows.contains(target) {
                    return Err(CatalogError::UnknownMenuTarget {
                        item: entry.id.clone(),
                        window: target.clone(),
                    });
                }
            }
            if entry.items.is_empty() && entry.opens.is_none() && entry.collaborator.is_none() {
                return Err(CatalogError::EmptyMenuItem(entry.id.clone()));
            }
            pending.extend(entry.items.iter());
        }

        let mut icons = HashSet::new();
        for icon in &self.icons {
            if !icons.insert(&icon.id) {
                return Err(CatalogError::DuplicateId {
                    kind: "icon",
                    id: icon.id.to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn window(&self, id: &WindowId) -> Option<&WindowSpec> {
        self.windows.iter().find(|window| &window.id == id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Three plain windows `a`, `b`, `c`, one nested menu and three icons.
    pub(crate) const TEST_CATALOG_JSON: &str = r#"{
        "schema_version": 1,
        "layout": { "viewport_width": 1000, "viewport_height": 740, "taskbar_height": 40 },
        "windows": [
            { "id": "a-window", "title": "A", "icon": "a" },
            { "id": "b-window", "title": "B", "icon": "b" },
            { "id": "c-window", "title": "C", "icon": "c", "width": 300, "height": 200 }
        ],
        "menu": [
            { "id": "programs", "label": "Programs", "items": [
                { "id": "games", "label": "Games", "items": [
                    { "id": "open-c", "label": "C", "opens": "c-window" }
                ]},
                { "id": "open-b", "label": "B", "opens": "b-window" }
            ]},
            { "id": "open-a", "label": "A", "opens": "a-window" },
            { "id": "shutdown", "label": "Shut Down", "collaborator": "shutdown-screen" }
        ],
        "icons": [
            { "id": "a-icon", "label": "A", "icon": "a" },
            { "id": "b-icon", "label": "B", "icon": "b" },
            { "id": "trash-icon", "label": "Trash", "icon": "trash", "collaborator": "open-trash" }
        ]
    }"#;

    pub(crate) fn test_catalog() -> DesktopCatalog {
        DesktopCatalog::from_json(TEST_CATALOG_JSON).expect("test catalog")
    }

    #[test]
    fn builtin_catalog_loads_and_validates() {
        let catalog = DesktopCatalog::builtin().expect("builtin catalog");
        assert_eq!(catalog.schema_version, DESKTOP_CATALOG_SCHEMA_VERSION);
        assert!(catalog.window(&WindowId::from("notepad-window")).is_some());
        assert!(!catalog.icons.is_empty());
    }

    #[test]
    fn test_catalog_uses_layout_overrides() {
        let catalog = test_catalog();
        assert_eq!(catalog.layout.viewport_width, 1000);
        assert_eq!(catalog.layout.taskbar_height, 40);
        assert_eq!(catalog.layout.min_window_width, 220);
    }

    #[test]
    fn rejects_menu_targets_that_are_not_windows() {
        let raw = r#"{
            "schema_version": 1,
            "windows": [{ "id": "a-window", "title": "A", "icon": "a" }],
            "menu": [{ "id": "bad", "label": "Bad", "opens": "nope-window" }]
        }"#;
        let err = DesktopCatalog::from_json(raw).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownMenuTarget { .. }), "{err}");
    }

    #[test]
    fn rejects_duplicate_window_ids_and_unknown_schema() {
        let duplicate = r#"{
            "schema_version": 1,
            "windows": [
                { "id": "a-window", "title": "A", "icon": "a" },
                { "id": "a-window", "title": "A2", "icon": "a" }
            ]
        }"#;
        assert!(matches!(
            DesktopCatalog::from_json(duplicate),
            Err(CatalogError::DuplicateId { kind: "window", .. })
        ));

        let future = r#"{ "schema_version": 7, "windows": [] }"#;
        assert!(matches!(
            DesktopCatalog::from_json(future),
            Err(CatalogError::SchemaVersion(7))
        ));
    }
}

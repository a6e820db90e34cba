use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct WindowEntry {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MenuEntry {
    id: String,
    #[serde(default)]
    opens: Option<String>,
    #[serde(default)]
    collaborator: Option<String>,
    #[serde(default)]
    items: Vec<MenuEntry>,
}

#[derive(Debug, Deserialize)]
struct IconEntry {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CatalogShape {
    schema_version: u32,
    windows: Vec<WindowEntry>,
    #[serde(default)]
    menu: Vec<MenuEntry>,
    #[serde(default)]
    icons: Vec<IconEntry>,
}

fn check_menu(entry: &MenuEntry, windows: &HashSet<&str>, seen: &mut HashSet<String>) {
    if !seen.insert(entry.id.clone()) {
        panic!("duplicate menu id `{}` in desktop.toml", entry.id);
    }
    if let Some(target) = entry.opens.as_deref() {
        if !windows.contains(target) {
            panic!(
                "menu item `{}` opens unknown window `{target}` in desktop.toml",
                entry.id
            );
        }
    }
    if entry.items.is_empty() && entry.opens.is_none() && entry.collaborator.is_none() {
        panic!(
            "menu item `{}` has neither children nor a command in desktop.toml",
            entry.id
        );
    }
    for child in &entry.items {
        check_menu(child, windows, seen);
    }
}

fn main() {
    let crate_root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let path = crate_root.join("desktop.toml");
    println!("cargo:rerun-if-changed={}", path.display());

    let raw = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
    let shape: CatalogShape = toml::from_str(&raw)
        .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
    if shape.schema_version != 1 {
        panic!(
            "catalog schema mismatch in {}: expected 1 found {}",
            path.display(),
            shape.schema_version
        );
    }

    let mut window_ids = HashSet::new();
    for window in &shape.windows {
        if !window_ids.insert(window.id.as_str()) {
            panic!("duplicate window id `{}` in desktop.toml", window.id);
        }
    }
    let mut menu_ids = HashSet::new();
    for entry in &shape.menu {
        check_menu(entry, &window_ids, &mut menu_ids);
    }
    let mut icon_ids = HashSet::new();
    for icon in &shape.icons {
        if !icon_ids.insert(icon.id.as_str()) {
            panic!("duplicate icon id `{}` in desktop.toml", icon.id);
        }
    }

    let value: toml::Value = toml::from_str(&raw).expect("catalog parsed above");
    let json = serde_json::to_string_pretty(&value).expect("serialize desktop catalog");
    let generated = format!(
        "/// Build-time generated desktop catalog JSON.\n\
pub const DESKTOP_CATALOG_JSON: &str = r##\"{}\"##;\n",
        json
    );

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR"));
    let out_file = out_dir.join("desktop_catalog_generated.rs");
    fs::write(&out_file, generated)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_file.display()));
}

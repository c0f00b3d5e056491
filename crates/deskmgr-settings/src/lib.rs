//! Settings store - dotted-path access to the persisted JSON configuration
//!
//! The store always begins from [`default_settings`] and overlays whatever
//! the settings file provides, so keys the file lacks never disappear and
//! nested objects merge key by key. Saving renames the previous file to a
//! `.bak` sibling before writing the new document.

mod defaults;

pub use defaults::{default_settings, merge_settings};

use deskmgr_core::types::WindowState;
use deskmgr_core::{DeskError, DeskResult};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Fallback for feature URLs that were never configured
pub const DEFAULT_FEATURE_URL: &str = "https://example.com";

pub struct SettingsStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl SettingsStore {
    /// Load the settings file at `path`. Missing or unreadable files yield
    /// the defaults; this never fails.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        Self::load_with_bundled(path, None::<PathBuf>)
    }

    /// Like [`SettingsStore::load`], but when the user file does not exist
    /// yet the `bundled` document (shipped with the pages) is overlaid instead.
    pub fn load_with_bundled(path: impl Into<PathBuf>, bundled: Option<impl AsRef<Path>>) -> Self {
        let path = path.into();
        let defaults = default_settings();

        let values = if path.exists() {
            match read_object(&path) {
                Ok(loaded) => merge_settings(&defaults, &loaded),
                Err(e) => {
                    log::warn!("Failed to load settings from {:?}: {}", path, e);
                    defaults
                }
            }
        } else {
            match bundled.as_ref().map(|p| p.as_ref()).filter(|p| p.exists()) {
                Some(bundled_path) => match read_object(bundled_path) {
                    Ok(loaded) => {
                        log::info!("Using bundled settings from {:?}", bundled_path);
                        merge_settings(&defaults, &loaded)
                    }
                    Err(e) => {
                        log::warn!("Failed to load bundled settings: {}", e);
                        defaults
                    }
                },
                None => defaults,
            }
        };

        Self { path, values }
    }

    /// Path this store saves to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a value by dotted key, deserialized into `T`. Returns `default`
    /// when the key is absent, traverses a non-object, or has another type.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_value(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or(default)
    }

    /// Raw value lookup by dotted key
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        let mut parts = key.split('.');
        let first = parts.next()?;
        let mut current = self.values.get(first)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Set a value by dotted key, creating intermediate objects as needed.
    /// An intermediate that is not an object is replaced by one.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        let mut parts: Vec<&str> = key.split('.').collect();
        let Some(last) = parts.pop() else {
            return;
        };

        let mut target = &mut self.values;
        for part in parts {
            let slot = target
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                log::warn!("Settings key '{}' is not an object, replacing it", part);
                *slot = Value::Object(Map::new());
            }
            let Value::Object(map) = slot else {
                return;
            };
            target = map;
        }
        target.insert(last.to_string(), value);
    }

    /// Save to disk, logging any failure. Returns whether the write succeeded.
    pub fn save(&self) -> bool {
        match self.try_save() {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to save settings: {}", e);
                false
            }
        }
    }

    /// Save to disk. The previous file, if any, is renamed to `.bak` first.
    pub fn try_save(&self) -> DeskResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        if self.path.exists() {
            let backup = self.path.with_extension("bak");
            fs::rename(&self.path, &backup)?;
        }

        let data = serde_json::to_string_pretty(&self.values)
            .map_err(|e| DeskError::settings(format!("Failed to serialize settings: {}", e)))?;
        fs::write(&self.path, data)?;
        log::debug!("Settings saved to {:?}", self.path);
        Ok(())
    }

    /// Drop every change and return to the defaults (in memory only)
    pub fn reset(&mut self) {
        self.values = default_settings();
    }

    /// URL configured for a named feature module
    pub fn get_url(&self, name: &str) -> String {
        self.get(&format!("urls.{}", name), DEFAULT_FEATURE_URL.to_string())
    }

    pub fn set_url(&mut self, name: &str, url: &str) {
        self.set(&format!("urls.{}", name), url);
    }

    /// Saved window geometry, or the default geometry if absent or malformed
    pub fn window_state(&self) -> WindowState {
        self.get("window", WindowState::default())
    }

    pub fn save_window_state(&mut self, state: WindowState) {
        match serde_json::to_value(state) {
            Ok(value) => self.set("window", value),
            Err(e) => log::warn!("Failed to serialize window state: {}", e),
        }
    }

    /// Write the current settings to an arbitrary file
    pub fn export_to(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let result = serde_json::to_string_pretty(&self.values)
            .map_err(|e| DeskError::settings(format!("Failed to serialize settings: {}", e)))
            .and_then(|data| fs::write(path, data).map_err(DeskError::from));
        match result {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to export settings to {:?}: {}", path, e);
                false
            }
        }
    }

    /// Replace the current settings with the contents of `path`, overlaid on
    /// the defaults. The store is unchanged if the file cannot be read.
    pub fn import_from(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match read_object(path) {
            Ok(loaded) => {
                self.values = merge_settings(&default_settings(), &loaded);
                true
            }
            Err(e) => {
                log::error!("Failed to import settings from {:?}: {}", path, e);
                false
            }
        }
    }

    /// Copy of the whole settings document
    pub fn snapshot(&self) -> Map<String, Value> {
        self.values.clone()
    }
}

fn read_object(path: &Path) -> DeskResult<Map<String, Value>> {
    let contents = fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&contents)
        .map_err(|e| DeskError::settings(format!("Invalid JSON in {:?}: {}", path, e)))?
    {
        Value::Object(map) => Ok(map),
        _ => Err(DeskError::settings(format!(
            "{:?} does not contain a JSON object",
            path
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::load(dir.path().join("settings.json"));

        assert_eq!(store.snapshot(), default_settings());
        assert_eq!(store.get("theme_mode", String::new()), "light");
    }

    #[test]
    fn test_dotted_get_and_default() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::load(dir.path().join("settings.json"));

        assert_eq!(store.get("window.width", 0u32), 1920);
        assert_eq!(store.get("window.depth", 7u32), 7);
        assert_eq!(store.get("theme_mode.inner", 3u32), 3);
        assert_eq!(store.get("zoom_level", String::from("n/a")), "n/a");
    }

    #[test]
    fn test_set_creates_nested_objects() {
        let dir = tempdir().unwrap();
        let mut store = SettingsStore::load(dir.path().join("settings.json"));

        store.set("plugins.editor.enabled", true);
        assert!(store.get("plugins.editor.enabled", false));

        store.set("theme_mode.variant", "high-contrast");
        assert_eq!(
            store.get_value("theme_mode"),
            Some(&json!({ "variant": "high-contrast" }))
        );
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut store = SettingsStore::load(&path);
        store.set("theme_mode", "dark");
        store.set_url("help", "https://help.internal");
        store.set("window.width", 1280);
        assert!(store.save());

        let reloaded = SettingsStore::load(&path);
        assert_eq!(reloaded.snapshot(), store.snapshot());
        assert_eq!(reloaded.get_url("help"), "https://help.internal");
    }

    #[test]
    fn test_save_keeps_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut store = SettingsStore::load(&path);
        store.set("display_name", "first");
        assert!(store.save());
        store.set("display_name", "second");
        assert!(store.save());

        let backup = SettingsStore::load(dir.path().join("settings.bak"));
        assert_eq!(backup.get("display_name", String::new()), "first");
        assert_eq!(
            SettingsStore::load(&path).get("display_name", String::new()),
            "second"
        );
    }

    #[test]
    fn test_partial_file_merges_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "theme_mode": "dark", "window": { "width": 800 } }"#).unwrap();

        let store = SettingsStore::load(&path);
        assert_eq!(store.get("theme_mode", String::new()), "dark");
        assert_eq!(store.get("window.width", 0u32), 800);
        assert_eq!(store.get("window.height", 0u32), 1080);
        assert_eq!(store.get("language", String::new()), "en-US");
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let store = SettingsStore::load(&path);
        assert_eq!(store.snapshot(), default_settings());
    }

    #[test]
    fn test_bundled_settings_used_only_without_user_file() {
        let dir = tempdir().unwrap();
        let bundled = dir.path().join("bundled.json");
        fs::write(&bundled, r#"{ "startup_page_url": "02-main.html" }"#).unwrap();

        let user = dir.path().join("settings.json");
        let store = SettingsStore::load_with_bundled(&user, Some(&bundled));
        assert_eq!(store.get("startup_page_url", String::new()), "02-main.html");

        fs::write(&user, r#"{ "theme_mode": "dark" }"#).unwrap();
        let store = SettingsStore::load_with_bundled(&user, Some(&bundled));
        assert_eq!(store.get("startup_page_url", String::from("x")), "");
    }

    #[test]
    fn test_window_state_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = SettingsStore::load(dir.path().join("settings.json"));

        let state = WindowState {
            width: 1024,
            height: 768,
            x: 10,
            y: 20,
            maximized: true,
        };
        store.save_window_state(state);
        assert_eq!(store.window_state(), state);
    }

    #[test]
    fn test_export_import() {
        let dir = tempdir().unwrap();
        let mut store = SettingsStore::load(dir.path().join("settings.json"));
        store.set("display_name", "exported");

        let export = dir.path().join("export.json");
        assert!(store.export_to(&export));

        let mut other = SettingsStore::load(dir.path().join("other.json"));
        assert!(other.import_from(&export));
        assert_eq!(other.get("display_name", String::new()), "exported");

        assert!(!other.import_from(dir.path().join("missing.json")));
        assert_eq!(other.get("display_name", String::new()), "exported");
    }

    #[test]
    fn test_reset() {
        let dir = tempdir().unwrap();
        let mut store = SettingsStore::load(dir.path().join("settings.json"));
        store.set("theme_mode", "dark");
        store.reset();
        assert_eq!(store.snapshot(), default_settings());
    }
}

//! Built-in settings every store starts from

use serde_json::{json, Map, Value};

/// The full default settings document
pub fn default_settings() -> Map<String, Value> {
    let value = json!({
        // User
        "username": "admin",
        "display_name": "Administrator",
        "email": "admin@example.com",
        "auto_login": false,
        "remember_password": true,

        // System
        "urls": {
            "user_management": "https://example.com/patients",
            "assessment": "https://example.com/assessment",
            "diet": "https://example.com/diet",
            "exercise": "https://example.com/exercise",
            "system": "https://example.com/system",
            "work": "https://example.com/work",
            "ai": "https://example.com/ai",
            "help": "https://example.com/help"
        },
        "startup_page_url": "",
        "default_browser": "system",
        "auto_start": false,
        "data_sync": false,

        // Appearance
        "theme_mode": "light",
        "theme_shortcut": "Ctrl+Shift+T",
        "enable_animations": true,
        "font_size": "medium",
        "zoom_level": 100,

        // Window
        "window": {
            "maximized": false,
            "width": 1920,
            "height": 1080,
            "x": 100,
            "y": 100
        },

        // Misc
        "language": "en-US",
        "check_updates": true,
        "version": env!("CARGO_PKG_VERSION")
    });

    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Overlay `overrides` onto `base`. Nested objects merge key by key; any
/// other value replaces the base value wholesale.
pub fn merge_settings(base: &Map<String, Value>, overrides: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in overrides {
        match (merged.get(key), value) {
            (Some(Value::Object(existing)), Value::Object(nested)) => {
                let combined = merge_settings(existing, nested);
                merged.insert(key.clone(), Value::Object(combined));
            }
            _ => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_single_key_override() {
        let defaults = default_settings();
        let overrides = object(json!({ "theme_mode": "dark" }));

        let merged = merge_settings(&defaults, &overrides);

        let mut expected = defaults.clone();
        expected.insert("theme_mode".into(), json!("dark"));
        assert_eq!(merged, expected);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let defaults = default_settings();
        let overrides = object(json!({ "theme_mode": "dark", "window": { "width": 800 } }));

        let once = merge_settings(&defaults, &overrides);
        let twice = merge_settings(&once, &overrides);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_nested_merge_keeps_siblings() {
        let defaults = default_settings();
        let overrides = object(json!({ "urls": { "help": "https://help.internal" } }));

        let merged = merge_settings(&defaults, &overrides);
        let urls = merged["urls"].as_object().unwrap();

        assert_eq!(urls["help"], json!("https://help.internal"));
        assert_eq!(urls["diet"], json!("https://example.com/diet"));
        assert_eq!(urls.len(), defaults["urls"].as_object().unwrap().len());
    }

    #[test]
    fn test_unknown_keys_survive() {
        let defaults = default_settings();
        let overrides = object(json!({ "custom_flag": true }));

        let merged = merge_settings(&defaults, &overrides);
        assert_eq!(merged["custom_flag"], json!(true));
        assert_eq!(merged.len(), defaults.len() + 1);
    }

    #[test]
    fn test_scalar_replaces_object() {
        let defaults = default_settings();
        let overrides = object(json!({ "window": "fullscreen" }));

        let merged = merge_settings(&defaults, &overrides);
        assert_eq!(merged["window"], json!("fullscreen"));
    }
}

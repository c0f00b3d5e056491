//! Theme profiles: color tokens plus the stylesheet built from them

use deskmgr_core::{DeskError, DeskResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Color used when a token is missing from the current profile
pub const FALLBACK_COLOR: &str = "#000000";

/// Rules applied on top of the `:root` variables. They only reference
/// variables, so one stylesheet serves every profile.
const BASE_STYLESHEET: &str = "\
body {
  background-color: var(--background);
  color: var(--text-primary);
}

.card, .navbar, .sidebar, .settings-group {
  background-color: var(--surface);
  border-color: var(--border);
}

.primary-button, .login-button {
  background-color: var(--primary);
  color: white;
}

.primary-button:hover, .login-button:hover {
  background-color: var(--primary-hover);
}
";

/// A named, immutable style profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeProfile {
    name: String,
    display_name: String,
    colors: BTreeMap<String, String>,
    stylesheet: String,
}

/// On-disk layout of a theme file (`resources/themes/<name>.json`)
#[derive(Debug, Deserialize, Serialize)]
struct ThemeFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    colors: BTreeMap<String, String>,
    #[serde(default)]
    css: Option<String>,
}

impl ThemeProfile {
    /// Build a profile whose stylesheet is generated from `colors`
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        colors: BTreeMap<String, String>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            colors,
            stylesheet: BASE_STYLESHEET.to_string(),
        }
    }

    /// Read a profile from a JSON theme file. The file stem becomes the
    /// registry name; `name` inside the file is only the display name.
    pub fn from_file(path: &Path) -> DeskResult<Self> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| DeskError::theme(format!("Invalid theme file name: {:?}", path)))?
            .to_string();

        let contents = std::fs::read_to_string(path)?;
        let file: ThemeFile = serde_json::from_str(&contents)
            .map_err(|e| DeskError::theme(format!("{:?}: {}", path, e)))?;

        Ok(Self {
            display_name: file.name.unwrap_or_else(|| name.clone()),
            stylesheet: file.css.unwrap_or_else(|| BASE_STYLESHEET.to_string()),
            colors: file.colors,
            name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn colors(&self) -> &BTreeMap<String, String> {
        &self.colors
    }

    pub fn stylesheet(&self) -> &str {
        &self.stylesheet
    }

    /// Color token lookup with a black fallback
    pub fn color(&self, token: &str) -> &str {
        self.colors
            .get(token)
            .map(String::as_str)
            .unwrap_or(FALLBACK_COLOR)
    }

    /// CSS custom properties for every color token (`primary_hover` becomes
    /// `--primary-hover`)
    pub fn css_variables(&self) -> Vec<(String, String)> {
        self.colors
            .iter()
            .map(|(key, value)| (format!("--{}", key.replace('_', "-")), value.clone()))
            .collect()
    }

    /// Complete CSS text: the `:root` variable block followed by the stylesheet
    pub fn document_css(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in self.css_variables() {
            css.push_str(&format!("  {}: {};\n", name, value));
        }
        css.push_str("}\n\n");
        css.push_str(&self.stylesheet);
        css
    }

    /// Script that creates or updates the `theme-override` style element of
    /// the hosted document. The CSS is embedded as a JSON string literal.
    pub fn injection_script(&self) -> String {
        let css = serde_json::to_string(&self.document_css()).unwrap_or_else(|_| "\"\"".into());
        format!(
            r#"(function() {{
    let themeStyle = document.getElementById('theme-override');
    if (!themeStyle) {{
        themeStyle = document.createElement('style');
        themeStyle.id = 'theme-override';
        (document.head || document.documentElement).appendChild(themeStyle);
    }}
    themeStyle.textContent = {css};
    document.documentElement.dataset.theme = {name};
}})();"#,
            css = css,
            name = serde_json::to_string(&self.name).unwrap_or_else(|_| "\"\"".into()),
        )
    }
}

fn palette(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Built-in light profile
pub fn light_theme() -> ThemeProfile {
    ThemeProfile::new(
        "light",
        "Light",
        palette(&[
            ("background", "#F8FAFC"),
            ("surface", "#FFFFFF"),
            ("primary", "#2563EB"),
            ("primary_hover", "#1D4ED8"),
            ("secondary", "#64748B"),
            ("success", "#16A34A"),
            ("warning", "#F97316"),
            ("error", "#DC2626"),
            ("border", "#E2E8F0"),
            ("text_primary", "#1E293B"),
            ("text_secondary", "#64748B"),
            ("shadow", "rgba(0, 0, 0, 0.1)"),
        ]),
    )
}

/// Built-in dark profile
pub fn dark_theme() -> ThemeProfile {
    ThemeProfile::new(
        "dark",
        "Dark",
        palette(&[
            ("background", "#0F172A"),
            ("surface", "#1E293B"),
            ("primary", "#3B82F6"),
            ("primary_hover", "#2563EB"),
            ("secondary", "#94A3B8"),
            ("success", "#22C55E"),
            ("warning", "#F97316"),
            ("error", "#EF4444"),
            ("border", "#334155"),
            ("text_primary", "#F1F5F9"),
            ("text_secondary", "#94A3B8"),
            ("shadow", "rgba(0, 0, 0, 0.3)"),
        ]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_css_variable_names() {
        let vars = light_theme().css_variables();
        assert!(vars.contains(&("--primary-hover".to_string(), "#1D4ED8".to_string())));
        assert!(vars.contains(&("--text-primary".to_string(), "#1E293B".to_string())));
        assert!(vars.iter().all(|(name, _)| !name.contains('_')));
    }

    #[test]
    fn test_color_fallback() {
        let dark = dark_theme();
        assert_eq!(dark.color("primary"), "#3B82F6");
        assert_eq!(dark.color("nonexistent"), FALLBACK_COLOR);
    }

    #[test]
    fn test_injection_script_embeds_variables() {
        let script = dark_theme().injection_script();
        assert!(script.contains("theme-override"));
        assert!(script.contains("--background: #0F172A;"));
        assert!(script.contains("\"dark\""));
    }

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ocean.json");
        std::fs::write(
            &path,
            r##"{ "name": "Ocean", "colors": { "primary": "#0EA5E9" } }"##,
        )
        .unwrap();

        let profile = ThemeProfile::from_file(&path).unwrap();
        assert_eq!(profile.name(), "ocean");
        assert_eq!(profile.display_name(), "Ocean");
        assert_eq!(profile.color("primary"), "#0EA5E9");
        assert!(profile.stylesheet().contains("var(--primary)"));
    }

    #[test]
    fn test_from_file_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[1, 2").unwrap();

        assert!(matches!(
            ThemeProfile::from_file(&path),
            Err(DeskError::Theme(_))
        ));
    }
}

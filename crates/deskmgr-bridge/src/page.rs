//! Page identity derived from a document's URL or path

use std::path::Path;

/// Application name shown in the window title
pub const APP_TITLE: &str = "Desktop Manager";

const SETTINGS_MARKERS: &[&str] = &["settings", "设置"];
const LOGIN_MARKERS: &[&str] = &["login", "登录"];
const MAIN_MARKERS: &[&str] = &["main", "home", "主页面", "主页"];

/// Which bundled page a document is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Login,
    Main,
    Settings,
    Other,
}

impl PageKind {
    /// Identify a loaded document by the name of its last path segment
    pub fn from_url(url: &str) -> Self {
        let decoded = urlencoding::decode(url)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| url.to_string());
        let without_query = decoded
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let name = without_query
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default();
        Self::from_name(name)
    }

    fn from_name(name: &str) -> Self {
        let name = name.to_lowercase();
        let has = |markers: &[&str]| markers.iter().any(|m| name.contains(m));

        if has(SETTINGS_MARKERS) {
            PageKind::Settings
        } else if has(LOGIN_MARKERS) {
            PageKind::Login
        } else if has(MAIN_MARKERS) {
            PageKind::Main
        } else {
            PageKind::Other
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            PageKind::Login => Some("Login"),
            PageKind::Main => Some("Main"),
            PageKind::Settings => Some("Settings"),
            PageKind::Other => None,
        }
    }
}

/// Window title for a loaded local document
pub fn window_title(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    match PageKind::from_name(&stem).label() {
        Some(label) => format!("{} - {}", APP_TITLE, label),
        None if stem.is_empty() => APP_TITLE.to_string(),
        None => format!("{} - {}", APP_TITLE, stem),
    }
}

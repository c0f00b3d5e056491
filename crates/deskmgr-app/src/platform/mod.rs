//! Platform abstraction layer
//!
//! Launching the system browser and attaching the native menu differ per
//! operating system; everything else in the shell is platform neutral.

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

use muda::{
    accelerator::{Accelerator, Code, Modifiers},
    IsMenuItem, Menu, MenuItem, PredefinedMenuItem, Submenu,
};
use tao::window::Window;

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Platform-specific error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// Menu initialization failed
    MenuInitFailed(String),
    /// Failed to open external URL
    OpenExternalFailed(String),
    /// The URL is not something a browser should be handed
    UnsupportedUrl(String),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformError::MenuInitFailed(msg) => write!(f, "Menu initialization failed: {}", msg),
            PlatformError::OpenExternalFailed(msg) => write!(f, "Failed to open external: {}", msg),
            PlatformError::UnsupportedUrl(url) => write!(f, "Refusing to open URL: {}", url),
        }
    }
}

impl std::error::Error for PlatformError {}

/// Menu item IDs dispatched back to the shell
pub mod menu_ids {
    pub const TOGGLE_THEME: &str = "toggle_theme";
    pub const OPEN_SETTINGS: &str = "open_settings";
    pub const RELOAD: &str = "reload";
}

/// Operations that differ across macOS, Windows and Linux
pub trait PlatformManager {
    /// Attach `menu` to the window (or the application on macOS)
    fn initialize_menu(&self, window: &Window, menu: &Menu) -> PlatformResult<()>;

    /// Open a URL in the system's default browser
    fn open_external(&self, url: &str) -> PlatformResult<()>;

    /// Platform name for logging
    fn platform_name(&self) -> &'static str;
}

/// Get the platform manager for the current operating system
pub fn get_platform_manager() -> Box<dyn PlatformManager> {
    #[cfg(target_os = "macos")]
    {
        Box::new(macos::MacOSPlatform::new())
    }

    #[cfg(target_os = "windows")]
    {
        Box::new(windows::WindowsPlatform::new())
    }

    #[cfg(target_os = "linux")]
    {
        Box::new(linux::LinuxPlatform::new())
    }
}

/// Only web URLs and mail links are handed to the OS launcher
pub fn check_external_url(url: &str) -> PlatformResult<()> {
    let parsed = url::Url::parse(url).map_err(|_| PlatformError::UnsupportedUrl(url.to_string()))?;
    match parsed.scheme() {
        "http" | "https" | "mailto" => Ok(()),
        _ => Err(PlatformError::UnsupportedUrl(url.to_string())),
    }
}

#[cfg(target_os = "macos")]
const PRIMARY: Modifiers = Modifiers::META;
#[cfg(not(target_os = "macos"))]
const PRIMARY: Modifiers = Modifiers::CONTROL;

/// Accelerator for the theme toggle. Falls back to Primary+Shift+T when
/// the configured shortcut does not parse.
pub fn theme_accelerator(shortcut: &str) -> Accelerator {
    shortcut.parse().unwrap_or_else(|e| {
        tracing::warn!("Invalid theme shortcut {:?}: {}", shortcut, e);
        Accelerator::new(Some(PRIMARY | Modifiers::SHIFT), Code::KeyT)
    })
}

fn append(submenu: &Submenu, item: &dyn IsMenuItem, label: &str) -> PlatformResult<()> {
    submenu
        .append(item)
        .map_err(|e| PlatformError::MenuInitFailed(format!("Failed to add {}: {}", label, e)))
}

/// Edit menu with clipboard operations
pub(crate) fn create_edit_menu(menu: &Menu) -> PlatformResult<()> {
    let edit_menu = Submenu::new("Edit", true);
    append(&edit_menu, &PredefinedMenuItem::undo(None), "Undo")?;
    append(&edit_menu, &PredefinedMenuItem::redo(None), "Redo")?;
    append(&edit_menu, &PredefinedMenuItem::separator(), "separator")?;
    append(&edit_menu, &PredefinedMenuItem::cut(None), "Cut")?;
    append(&edit_menu, &PredefinedMenuItem::copy(None), "Copy")?;
    append(&edit_menu, &PredefinedMenuItem::paste(None), "Paste")?;
    append(&edit_menu, &PredefinedMenuItem::select_all(None), "Select All")?;

    menu.append(&edit_menu)
        .map_err(|e| PlatformError::MenuInitFailed(format!("Failed to append edit menu: {}", e)))
}

/// View menu with the shell's own commands
pub(crate) fn create_view_menu(menu: &Menu, theme_shortcut: Accelerator) -> PlatformResult<()> {
    let view_menu = Submenu::new("View", true);

    let toggle_theme = MenuItem::with_id(
        menu_ids::TOGGLE_THEME,
        "Toggle Theme",
        true,
        Some(theme_shortcut),
    );
    append(&view_menu, &toggle_theme, "Toggle Theme")?;

    let settings = MenuItem::with_id(
        menu_ids::OPEN_SETTINGS,
        "Settings",
        true,
        Some(Accelerator::new(Some(PRIMARY), Code::Comma)),
    );
    append(&view_menu, &settings, "Settings")?;

    append(&view_menu, &PredefinedMenuItem::separator(), "separator")?;

    let reload = MenuItem::with_id(
        menu_ids::RELOAD,
        "Reload",
        true,
        Some(Accelerator::new(Some(PRIMARY), Code::KeyR)),
    );
    append(&view_menu, &reload, "Reload")?;

    menu.append(&view_menu)
        .map_err(|e| PlatformError::MenuInitFailed(format!("Failed to append view menu: {}", e)))
}

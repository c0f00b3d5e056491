//! macOS platform implementation
//!
//! The application menu is required for Cmd+C/V to reach the webview.

use super::{check_external_url, PlatformError, PlatformManager, PlatformResult};
use deskmgr_bridge::APP_TITLE;
use muda::{Menu, PredefinedMenuItem, Submenu};
use std::process::Command;
use tao::window::Window;
use tracing::debug;

/// macOS platform manager
pub struct MacOSPlatform;

impl MacOSPlatform {
    pub fn new() -> Self {
        Self
    }

    /// Standard application menu, inserted before every other submenu
    fn create_app_menu(&self, menu: &Menu) -> PlatformResult<()> {
        let app_menu = Submenu::new(APP_TITLE, true);
        let items = [
            PredefinedMenuItem::about(None, None),
            PredefinedMenuItem::separator(),
            PredefinedMenuItem::hide(None),
            PredefinedMenuItem::hide_others(None),
            PredefinedMenuItem::show_all(None),
            PredefinedMenuItem::separator(),
            PredefinedMenuItem::quit(None),
        ];
        for item in &items {
            app_menu
                .append(item)
                .map_err(|e| PlatformError::MenuInitFailed(format!("App menu: {}", e)))?;
        }

        menu.insert(&app_menu, 0)
            .map_err(|e| PlatformError::MenuInitFailed(format!("Failed to insert app menu: {}", e)))
    }
}

impl PlatformManager for MacOSPlatform {
    fn initialize_menu(&self, _window: &Window, menu: &Menu) -> PlatformResult<()> {
        self.create_app_menu(menu)?;
        menu.init_for_nsapp();
        debug!("macOS menu initialized");
        Ok(())
    }

    fn open_external(&self, url: &str) -> PlatformResult<()> {
        check_external_url(url)?;
        debug!("Opening external URL: {}", url);

        Command::new("open")
            .arg(url)
            .spawn()
            .map_err(|e| PlatformError::OpenExternalFailed(format!("{}: {}", url, e)))?;

        Ok(())
    }

    fn platform_name(&self) -> &'static str {
        "macOS"
    }
}

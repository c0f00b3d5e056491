//! Linux platform implementation
//!
//! External URLs go through xdg-open. The menu bar is packed into tao's
//! default GTK vbox above the webview.

use super::{check_external_url, PlatformError, PlatformManager, PlatformResult};
use muda::Menu;
use std::process::Command;
use tao::window::Window;
use tracing::{debug, warn};

/// Linux platform manager
pub struct LinuxPlatform;

impl LinuxPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformManager for LinuxPlatform {
    fn initialize_menu(&self, window: &Window, menu: &Menu) -> PlatformResult<()> {
        use tao::platform::unix::WindowExtUnix;

        match window.default_vbox() {
            Some(vbox) => {
                menu.init_for_gtk_window(window.gtk_window(), Some(vbox))
                    .map_err(|e| PlatformError::MenuInitFailed(format!("GTK init failed: {}", e)))?;
                debug!("Linux menu initialized");
            }
            // Headless or custom GTK setups; the menu is optional here
            None => warn!("GTK vbox not available for menu initialization"),
        }
        Ok(())
    }

    fn open_external(&self, url: &str) -> PlatformResult<()> {
        check_external_url(url)?;
        debug!("Opening external URL: {}", url);

        Command::new("xdg-open")
            .arg(url)
            .spawn()
            .map_err(|e| PlatformError::OpenExternalFailed(format!("{}: {}", url, e)))?;

        Ok(())
    }

    fn platform_name(&self) -> &'static str {
        "Linux"
    }
}

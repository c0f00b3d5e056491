//! Windows platform implementation

use super::{check_external_url, PlatformError, PlatformManager, PlatformResult};
use muda::Menu;
use std::process::Command;
use tao::window::Window;
use tracing::debug;

/// Windows platform manager
pub struct WindowsPlatform;

impl WindowsPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformManager for WindowsPlatform {
    fn initialize_menu(&self, window: &Window, menu: &Menu) -> PlatformResult<()> {
        use tao::platform::windows::WindowExtWindows;

        unsafe {
            menu.init_for_hwnd(window.hwnd() as _)
                .map_err(|e| PlatformError::MenuInitFailed(format!("HWND init failed: {}", e)))?;
        }

        debug!("Windows menu initialized");
        Ok(())
    }

    fn open_external(&self, url: &str) -> PlatformResult<()> {
        check_external_url(url)?;
        debug!("Opening external URL: {}", url);

        // The empty "" after start is the window title
        Command::new("cmd")
            .args(["/C", "start", "", url])
            .spawn()
            .map_err(|e| PlatformError::OpenExternalFailed(format!("{}: {}", url, e)))?;

        Ok(())
    }

    fn platform_name(&self) -> &'static str {
        "Windows"
    }
}

//! Page host abstraction
//!
//! [`PageHost`] is the narrow surface the shell needs from the window and
//! its embedded webview. [`WryHost`] implements it with tao + wry; tests
//! drive the shell through a recording fake.
//!
//! Note: hosts are NOT Send. All webview operations happen on the event
//! loop thread.

use crate::platform::{PlatformManager, PlatformResult};
use deskmgr_core::types::WindowState;
use deskmgr_core::{DeskError, DeskResult};
use rfd::{MessageButtons, MessageDialog, MessageLevel};
use tao::window::Window;
use wry::WebView;

/// Common interface for the window hosting the pages
pub trait PageHost {
    /// Navigate the webview to `url`
    fn load_url(&self, url: &str) -> DeskResult<()>;

    /// Replace the document with inline HTML
    fn load_html(&self, html: &str) -> DeskResult<()>;

    /// Evaluate JavaScript in the page (fire-and-forget)
    fn evaluate_script(&self, script: &str);

    /// URL of the current document, if known
    fn current_url(&self) -> Option<String>;

    fn set_title(&self, title: &str);

    /// Show a modal warning
    fn show_message(&self, title: &str, message: &str);

    /// Hand `url` to the system browser
    fn open_external(&self, url: &str) -> PlatformResult<()>;
}

/// tao window plus wry webview
pub struct WryHost {
    window: Window,
    webview: WebView,
    platform: Box<dyn PlatformManager>,
}

impl WryHost {
    pub fn new(window: Window, webview: WebView, platform: Box<dyn PlatformManager>) -> Self {
        Self {
            window,
            webview,
            platform,
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Current geometry in logical pixels
    pub fn window_state(&self) -> WindowState {
        let scale = self.window.scale_factor();
        let size = self.window.inner_size().to_logical::<f64>(scale);
        let position = self
            .window
            .outer_position()
            .map(|p| p.to_logical::<f64>(scale))
            .unwrap_or_default();

        WindowState {
            width: size.width.round() as u32,
            height: size.height.round() as u32,
            x: position.x.round() as i32,
            y: position.y.round() as i32,
            maximized: self.window.is_maximized(),
        }
    }
}

impl PageHost for WryHost {
    fn load_url(&self, url: &str) -> DeskResult<()> {
        self.webview
            .load_url(url)
            .map_err(|e| DeskError::webview(format!("Failed to load {}: {}", url, e)))
    }

    fn load_html(&self, html: &str) -> DeskResult<()> {
        self.webview
            .load_html(html)
            .map_err(|e| DeskError::webview(format!("Failed to load inline document: {}", e)))
    }

    fn evaluate_script(&self, script: &str) {
        if let Err(e) = self.webview.evaluate_script(script) {
            tracing::debug!("Script evaluation failed: {}", e);
        }
    }

    fn current_url(&self) -> Option<String> {
        self.webview.url().ok()
    }

    fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }

    fn show_message(&self, title: &str, message: &str) {
        MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .set_parent(&self.window)
            .show();
    }

    fn open_external(&self, url: &str) -> PlatformResult<()> {
        self.platform.open_external(url)
    }
}

/// Build the webview into the window's content area
#[cfg(target_os = "linux")]
pub fn build_webview(builder: wry::WebViewBuilder<'_>, window: &Window) -> DeskResult<WebView> {
    use tao::platform::unix::WindowExtUnix;
    use wry::WebViewBuilderExtUnix;

    let container: &gtk::Box = window
        .default_vbox()
        .ok_or_else(|| DeskError::webview("GTK vbox not available"))?;
    builder
        .build_gtk(container)
        .map_err(|e| DeskError::webview(format!("Failed to create webview: {}", e)))
}

/// Build the webview into the window's content area
#[cfg(not(target_os = "linux"))]
pub fn build_webview(builder: wry::WebViewBuilder<'_>, window: &Window) -> DeskResult<WebView> {
    builder
        .build(window)
        .map_err(|e| DeskError::webview(format!("Failed to create webview: {}", e)))
}

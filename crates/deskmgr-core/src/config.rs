//! Application path configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the directory holding the bundled pages
pub const ROOT_ENV: &str = "DESKMGR_ROOT";

/// Environment variable that overrides the per-user configuration directory
pub const CONFIG_ENV: &str = "DESKMGR_CONFIG_DIR";

/// Directory name used under the platform data/config directories
const APP_DIR_NAME: &str = "deskmgr";

/// File names of the bundled pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFiles {
    pub login: String,
    pub main: String,
    pub settings: String,
}

impl Default for PageFiles {
    fn default() -> Self {
        Self {
            login: "01-login.html".to_string(),
            main: "02-main.html".to_string(),
            settings: "03-settings.html".to_string(),
        }
    }
}

/// Locations the shell reads from and writes to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppPaths {
    /// Root directory of the bundled HTML pages and resources
    pub app_root: PathBuf,

    /// Per-user configuration directory (settings.json lives here)
    pub config_dir: PathBuf,

    /// Directory for daily log files
    pub log_dir: PathBuf,

    /// Bundled page file names, relative to `app_root`
    pub pages: PageFiles,
}

impl AppPaths {
    /// Build paths rooted at an explicit directory. Used by tests and `--root`.
    pub fn with_root(app_root: impl Into<PathBuf>, config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        Self {
            app_root: app_root.into(),
            log_dir: config_dir.join("logs"),
            config_dir,
            pages: PageFiles::default(),
        }
    }

    /// Resolve paths from the environment, the executable location and the
    /// platform directories, in that order.
    pub fn discover() -> Self {
        let app_root = std::env::var_os(ROOT_ENV)
            .map(PathBuf::from)
            .or_else(exe_pages_dir)
            .or_else(|| {
                let cwd_pages = std::env::current_dir().ok()?.join("pages");
                cwd_pages.is_dir().then_some(cwd_pages)
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let config_dir = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|d| d.join(APP_DIR_NAME)))
            .unwrap_or_else(|| PathBuf::from("config"));

        let log_dir = dirs::data_local_dir()
            .map(|d| d.join(APP_DIR_NAME).join("logs"))
            .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR_NAME).join("logs"));

        log::debug!("App root: {:?}", app_root);

        Self {
            app_root,
            config_dir,
            log_dir,
            pages: PageFiles::default(),
        }
    }

    /// Path of the user settings file
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    /// Settings shipped next to the pages, used when no user file exists yet
    pub fn bundled_settings_file(&self) -> PathBuf {
        self.app_root.join("config").join("settings.json")
    }

    /// Directory scanned for additional theme profiles
    pub fn theme_dir(&self) -> PathBuf {
        self.app_root.join("resources").join("themes")
    }

    pub fn login_page(&self) -> PathBuf {
        self.app_root.join(&self.pages.login)
    }

    pub fn main_page(&self) -> PathBuf {
        self.app_root.join(&self.pages.main)
    }

    pub fn settings_page(&self) -> PathBuf {
        self.app_root.join(&self.pages.settings)
    }

    /// Resolve a page reference against the app root. Absolute paths are kept.
    pub fn resolve(&self, reference: impl AsRef<Path>) -> PathBuf {
        let reference = reference.as_ref();
        if reference.is_absolute() {
            reference.to_path_buf()
        } else {
            self.app_root.join(reference)
        }
    }

    /// Create the writable directories. Failures are returned per directory so
    /// the caller can decide which ones are fatal.
    pub fn ensure_dirs(&self) -> Vec<(PathBuf, std::io::Error)> {
        let mut failures = Vec::new();
        for dir in [&self.config_dir, &self.log_dir] {
            if let Err(e) = std::fs::create_dir_all(dir) {
                failures.push((dir.clone(), e));
            }
        }
        failures
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::discover()
    }
}

fn exe_pages_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let pages = exe.parent()?.join("pages");
    pages.is_dir().then_some(pages)
}

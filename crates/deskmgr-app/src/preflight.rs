//! Startup checks run before any window is created

use deskmgr_core::AppPaths;
use tracing::{error, info, warn};

/// Outcome of the startup checks
#[derive(Debug, Default)]
pub struct Report {
    /// Conditions that prevent the shell from starting
    pub problems: Vec<String>,
    /// Degraded but usable conditions
    pub warnings: Vec<String>,
}

impl Report {
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }

    /// Write every finding to the log
    pub fn log(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
        for problem in &self.problems {
            error!("{}", problem);
        }
        if self.is_ok() {
            info!("Startup checks passed");
        }
    }
}

/// Verify the page directory and prepare the writable directories
pub fn check(paths: &AppPaths) -> Report {
    let mut report = Report::default();

    if !paths.app_root.is_dir() {
        report.problems.push(format!(
            "Application directory not found: {}",
            paths.app_root.display()
        ));
        return report;
    }

    let login = paths.login_page();
    if !login.is_file() {
        report.warnings.push(format!(
            "Login page missing, the built-in login will be used: {}",
            login.display()
        ));
    }

    let main = paths.main_page();
    if !main.is_file() {
        report
            .warnings
            .push(format!("Main page missing: {}", main.display()));
    }

    for (dir, e) in paths.ensure_dirs() {
        if dir == paths.config_dir {
            report.problems.push(format!(
                "Cannot create configuration directory {}: {}",
                dir.display(),
                e
            ));
        } else {
            report.warnings.push(format!(
                "Cannot create directory {}, continuing without it: {}",
                dir.display(),
                e
            ));
        }
    }

    report
}

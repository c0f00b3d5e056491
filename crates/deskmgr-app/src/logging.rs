//! Logging configuration and setup.
//!
//! Console output always; a daily file `app_YYYYMMDD.log` under the log
//! directory when it can be created. `log` records from the library crates
//! are forwarded through `tracing-log`.

use std::any::Any;
use std::fs::{self, File, OpenOptions};
use std::panic::{self, Location};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer};

/// Console output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level used when neither `filter` nor `RUST_LOG` is set.
    pub level: Level,
    /// Console format.
    pub format: LogFormat,
    /// Include source file location.
    pub include_location: bool,
    /// Custom filter string (e.g., "deskmgr_bridge=debug").
    pub filter: Option<String>,
    /// Directory for the daily log file; `None` disables file output.
    pub log_dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Pretty,
            include_location: false,
            filter: None,
            log_dir: None,
        }
    }
}

impl LogConfig {
    /// Create a debug configuration.
    pub fn debug() -> Self {
        Self {
            level: Level::DEBUG,
            include_location: true,
            ..Default::default()
        }
    }

    /// Set a custom filter.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    fn env_filter(&self) -> EnvFilter {
        let fallback = || EnvFilter::new(self.level.to_string());
        match &self.filter {
            Some(custom) => EnvFilter::try_new(custom).unwrap_or_else(|_| fallback()),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback()),
        }
    }
}

/// Name of today's log file
pub fn log_file_name() -> String {
    format!("app_{}.log", chrono::Local::now().format("%Y%m%d"))
}

fn open_log_file(dir: &Path) -> Option<(PathBuf, File)> {
    if let Err(e) = fs::create_dir_all(dir) {
        eprintln!("Log directory {:?} unavailable, file logging disabled: {}", dir, e);
        return None;
    }

    let path = dir.join(log_file_name());
    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => Some((path, file)),
        Err(e) => {
            eprintln!("Cannot open log file {:?}: {}", path, e);
            None
        }
    }
}

/// Initialize logging with the given configuration.
///
/// Returns the path of the log file when file output is active.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<Option<PathBuf>> {
    tracing_log::LogTracer::init()?;

    let file = config.log_dir.as_deref().and_then(open_log_file);
    let (log_path, file_layer) = match file {
        Some((path, file)) => {
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file));
            (Some(path), Some(layer))
        }
        None => (None, None),
    };

    let console = match config.format {
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    let subscriber = tracing_subscriber::registry()
        .with(config.env_filter())
        .with(console)
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(log_path)
}

/// Route panics through the log before the default hook prints them
pub fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        tracing::error!("Panic: {}", describe_panic(info.payload(), info.location()));
        default_hook(info);
    }));
}

fn describe_panic(payload: &(dyn Any + Send), location: Option<&Location<'_>>) -> String {
    let message = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string payload");
    match location {
        Some(location) => format!("{} at {}:{}", message, location.file(), location.line()),
        None => message.to_string(),
    }
}

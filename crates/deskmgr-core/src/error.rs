//! Error types for the desktop manager

use thiserror::Error;

/// Result type alias for desktop manager operations
pub type DeskResult<T> = Result<T, DeskError>;

/// Main error type for the desktop manager
#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Theme error: {0}")]
    Theme(String),

    #[error("WebView error: {0}")]
    WebView(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeskError {
    /// Create a new settings error
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }

    /// Create a new theme error
    pub fn theme(msg: impl Into<String>) -> Self {
        Self::Theme(msg.into())
    }

    /// Create a new WebView error
    pub fn webview(msg: impl Into<String>) -> Self {
        Self::WebView(msg.into())
    }

    /// Create a new not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

//! Versioned message channel between hosted pages and the shell
//!
//! Pages post `{"v": 1, "action": "<name>", "payload": {...}}` through
//! `window.ipc.postMessage`. The shell answers with [`NativeEvent`]s
//! delivered through an injected callback.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Current protocol version
pub const PROTOCOL_VERSION: u32 = 1;

/// Errors raised while decoding a page message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("Malformed message: {0}")]
    Malformed(String),

    #[error("Unsupported protocol version: {0}")]
    UnsupportedVersion(u32),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Invalid payload for {action}: {reason}")]
    InvalidPayload { action: String, reason: String },

    #[error("Page not found: {0}")]
    PageNotFound(String),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    v: u32,
    action: String,
    #[serde(default)]
    payload: Value,
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
    username: String,
    password: String,
    #[serde(default)]
    remember: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct UrlPayload {
    url: String,
}

#[derive(Debug, Deserialize)]
struct PathPayload {
    path: String,
}

#[derive(Debug, Deserialize)]
struct ThemePayload {
    name: String,
}

#[derive(Debug, Deserialize)]
struct LogPayload {
    #[serde(default)]
    level: Option<String>,
    message: String,
}

/// Message posted by a hosted page
#[derive(Clone, PartialEq, Eq)]
pub enum PageMessage {
    Login {
        username: String,
        password: String,
        /// Explicit "remember me" choice; pages without the toggle omit it
        remember: Option<bool>,
    },
    OpenUrl { url: String },
    LoadPage { path: String },
    ApplyTheme { name: String },
    Log { level: log::Level, message: String },
}

impl std::fmt::Debug for PageMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageMessage::Login {
                username, remember, ..
            } => f
                .debug_struct("Login")
                .field("username", username)
                .field("password", &"<redacted>")
                .field("remember", remember)
                .finish(),
            PageMessage::OpenUrl { url } => f.debug_struct("OpenUrl").field("url", url).finish(),
            PageMessage::LoadPage { path } => {
                f.debug_struct("LoadPage").field("path", path).finish()
            }
            PageMessage::ApplyTheme { name } => {
                f.debug_struct("ApplyTheme").field("name", name).finish()
            }
            PageMessage::Log { level, message } => f
                .debug_struct("Log")
                .field("level", level)
                .field("message", message)
                .finish(),
        }
    }
}

impl PageMessage {
    /// Decode a raw IPC body
    pub fn parse(body: &str) -> Result<Self, BridgeError> {
        let envelope: Envelope =
            serde_json::from_str(body).map_err(|e| BridgeError::Malformed(e.to_string()))?;

        if envelope.v != PROTOCOL_VERSION {
            return Err(BridgeError::UnsupportedVersion(envelope.v));
        }

        let action = envelope.action.as_str();
        let message = match action {
            "login" => {
                let p: LoginPayload = payload(action, envelope.payload)?;
                if p.username.is_empty() || p.password.is_empty() {
                    return Err(invalid(action, "username and password are required"));
                }
                PageMessage::Login {
                    username: p.username,
                    password: p.password,
                    remember: p.remember,
                }
            }
            "open_url" => {
                let p: UrlPayload = payload(action, envelope.payload)?;
                if p.url.is_empty() {
                    return Err(invalid(action, "url is empty"));
                }
                PageMessage::OpenUrl { url: p.url }
            }
            "load_page" => {
                let p: PathPayload = payload(action, envelope.payload)?;
                PageMessage::LoadPage { path: p.path }
            }
            "apply_theme" => {
                let p: ThemePayload = payload(action, envelope.payload)?;
                PageMessage::ApplyTheme { name: p.name }
            }
            "log" => {
                let p: LogPayload = payload(action, envelope.payload)?;
                let level = p
                    .level
                    .as_deref()
                    .and_then(|l| l.parse().ok())
                    .unwrap_or(log::Level::Info);
                PageMessage::Log {
                    level,
                    message: p.message,
                }
            }
            other => return Err(BridgeError::UnknownAction(other.to_string())),
        };

        Ok(message)
    }

    pub fn action_name(&self) -> &'static str {
        match self {
            PageMessage::Login { .. } => "login",
            PageMessage::OpenUrl { .. } => "open_url",
            PageMessage::LoadPage { .. } => "load_page",
            PageMessage::ApplyTheme { .. } => "apply_theme",
            PageMessage::Log { .. } => "log",
        }
    }
}

fn payload<T: serde::de::DeserializeOwned>(action: &str, value: Value) -> Result<T, BridgeError> {
    serde_json::from_value(value).map_err(|e| invalid(action, &e.to_string()))
}

fn invalid(action: &str, reason: &str) -> BridgeError {
    BridgeError::InvalidPayload {
        action: action.to_string(),
        reason: reason.to_string(),
    }
}

/// Event pushed from the shell into the hosted page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NativeEvent {
    LoginResult { success: bool },
    ThemeChanged { name: String },
    Error { message: String },
}

impl NativeEvent {
    /// Serialize with the protocol version attached
    pub fn to_json(&self) -> String {
        let mut value = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut value {
            map.insert("v".into(), Value::from(PROTOCOL_VERSION));
        }
        value.to_string()
    }
}

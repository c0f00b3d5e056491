//! Navigation classification
//!
//! Every navigation the embedded page attempts is classified by the rules
//! below, in order; the first match wins.
//!
//! 1. Login pseudo-RPC: blocked, schedules [`Action::Login`].
//! 2. Open-external pseudo-RPC: blocked, schedules [`Action::OpenExternal`].
//! 3. Relative local page that exists under the app root: blocked,
//!    schedules [`Action::LoadLocalPage`].
//! 4. Anything else: allowed.
//!
//! Malformed pseudo-RPC calls are still blocked but schedule nothing.

use crate::rpc::{RpcCall, DEFAULT_SCHEME};
use deskmgr_core::types::NavigationRequest;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Extension carried by bundled pages
pub const PAGE_EXTENSION: &str = "html";

/// Deferred native work produced by a blocked navigation
#[derive(Clone, PartialEq, Eq)]
pub enum Action {
    Login { username: String, password: String },
    OpenExternal { url: String },
    LoadLocalPage { path: PathBuf },
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Action::OpenExternal { url } => {
                f.debug_struct("OpenExternal").field("url", url).finish()
            }
            Action::LoadLocalPage { path } => {
                f.debug_struct("LoadLocalPage").field("path", path).finish()
            }
        }
    }
}

impl From<RpcCall> for Action {
    fn from(call: RpcCall) -> Self {
        match call {
            RpcCall::Login { username, password } => Action::Login { username, password },
            RpcCall::OpenUrl { url } => Action::OpenExternal { url },
        }
    }
}

/// Verdict returned synchronously from the navigation callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Let the renderer perform the navigation itself
    Allow,
    /// Cancel the navigation, optionally scheduling an action
    Block(Option<Action>),
}

impl NavigationDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, NavigationDecision::Allow)
    }

    pub fn action(&self) -> Option<&Action> {
        match self {
            NavigationDecision::Block(Some(action)) => Some(action),
            _ => None,
        }
    }

    pub fn into_action(self) -> Option<Action> {
        match self {
            NavigationDecision::Block(action) => action,
            NavigationDecision::Allow => None,
        }
    }
}

/// Bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Reserved pseudo-RPC scheme
    pub scheme: String,

    /// Directory relative page links resolve against
    pub app_root: PathBuf,
}

impl BridgeConfig {
    pub fn new(app_root: impl Into<PathBuf>) -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            app_root: app_root.into(),
        }
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }
}

/// Stateless classifier. Cheap to clone into renderer callbacks.
#[derive(Debug, Clone)]
pub struct NavigationBridge {
    config: BridgeConfig,
}

impl NavigationBridge {
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn scheme(&self) -> &str {
        &self.config.scheme
    }

    /// Classify one navigation request
    pub fn classify(&self, request: &NavigationRequest) -> NavigationDecision {
        let url = request.target_url.as_str();

        if let Some(parsed) = RpcCall::parse(url, &self.config.scheme) {
            return match parsed {
                Ok(call) => {
                    log::debug!("Intercepted pseudo-RPC: {:?}", call);
                    NavigationDecision::Block(Some(call.into()))
                }
                Err(e) => {
                    log::warn!("Ignoring pseudo-RPC navigation ({}): {}", e, redact_query(url));
                    NavigationDecision::Block(None)
                }
            };
        }

        if let Some(path) = self.resolve_local_page(url) {
            log::debug!("Redirecting local page {} -> {:?}", url, path);
            return NavigationDecision::Block(Some(Action::LoadLocalPage { path }));
        }

        if !request.is_main_frame {
            log::trace!("Allowing sub-frame navigation: {}", url);
        }
        NavigationDecision::Allow
    }

    /// Resolve a bare relative page reference (`03-settings.html`) against the
    /// app root. Returns `None` for URLs with an http(s) or file scheme,
    /// absolute paths, paths that climb out of the root with `..`, other
    /// extensions, and files that do not exist.
    pub fn resolve_local_page(&self, target: &str) -> Option<PathBuf> {
        let lower = target.to_ascii_lowercase();
        if !lower.ends_with(&format!(".{}", PAGE_EXTENSION))
            || lower.starts_with("http")
            || lower.starts_with("file://")
        {
            return None;
        }

        let decoded = urlencoding::decode(target).ok()?;
        let relative = Path::new(decoded.as_ref());
        if relative.is_absolute() || relative.has_root() {
            return None;
        }
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !contained {
            log::warn!("Refusing page outside the app root: {}", target);
            return None;
        }

        let resolved = self.config.app_root.join(relative);
        let has_extension = resolved
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(PAGE_EXTENSION));

        (has_extension && resolved.is_file()).then_some(resolved)
    }
}

/// Drop the query string so credentials never reach the log
fn redact_query(url: &str) -> &str {
    url.split_once('?').map(|(head, _)| head).unwrap_or(url)
}

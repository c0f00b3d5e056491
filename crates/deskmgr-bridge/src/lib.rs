//! Navigation interception and the native/web bridge
//!
//! Every navigation attempted by the hosted page passes through
//! [`NavigationBridge::classify`]. Pages may also post versioned
//! [`PageMessage`]s; both channels end up as the same [`Action`]s.

pub mod auth;
pub mod deferred;
pub mod message;
pub mod navigation;
pub mod page;
pub mod proxy;
pub mod rpc;

pub use auth::{CredentialCheck, DemoCredentials};
pub use deferred::{DeferredQueue, NAVIGATION_DEFER};
pub use message::{BridgeError, NativeEvent, PageMessage, PROTOCOL_VERSION};
pub use navigation::{Action, BridgeConfig, NavigationBridge, NavigationDecision};
pub use page::{window_title, PageKind, APP_TITLE};
pub use proxy::{ProxyId, ProxyRegistry};
pub use rpc::{RpcCall, RpcError, DEFAULT_SCHEME};

/// What the shell should do with a page message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    Action(Action),
    ApplyTheme(String),
    Log { level: log::Level, message: String },
}

impl NavigationBridge {
    /// Translate a page message into shell work.
    ///
    /// `load_page` resolves like a relative link; a page that does not
    /// exist is an error rather than a fall-through.
    pub fn route_message(&self, message: PageMessage) -> Result<Routed, BridgeError> {
        let routed = match message {
            PageMessage::Login {
                username, password, ..
            } => {
                Routed::Action(Action::Login { username, password })
            }
            PageMessage::OpenUrl { url } => Routed::Action(Action::OpenExternal { url }),
            PageMessage::LoadPage { path } => match self.resolve_local_page(&path) {
                Some(path) => Routed::Action(Action::LoadLocalPage { path }),
                None => return Err(BridgeError::PageNotFound(path)),
            },
            PageMessage::ApplyTheme { name } => Routed::ApplyTheme(name),
            PageMessage::Log { level, message } => Routed::Log { level, message },
        };
        Ok(routed)
    }
}

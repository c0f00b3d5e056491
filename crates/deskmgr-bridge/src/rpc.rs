//! Pseudo-RPC URLs: native calls encoded as navigations on a reserved scheme
//!
//! ```text
//! app://login?username=<urlencoded>&password=<urlencoded>
//! app://openurl?url=<urlencoded>
//! ```

use thiserror::Error;
use url::Url;

/// Default reserved scheme
pub const DEFAULT_SCHEME: &str = "app";

const LOGIN_HOST: &str = "login";
const OPEN_URL_HOST: &str = "openurl";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    #[error("malformed pseudo-RPC URL: {0}")]
    InvalidUrl(String),

    #[error("missing or empty parameter '{0}'")]
    MissingParam(&'static str),

    #[error("unknown pseudo-RPC call '{0}'")]
    UnknownCall(String),
}

/// A decoded pseudo-RPC call
#[derive(Clone, PartialEq, Eq)]
pub enum RpcCall {
    Login { username: String, password: String },
    OpenUrl { url: String },
}

impl std::fmt::Debug for RpcCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RpcCall::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            RpcCall::OpenUrl { url } => f.debug_struct("OpenUrl").field("url", url).finish(),
        }
    }
}

/// True if `url` uses the reserved scheme, regardless of whether the call
/// itself is well formed.
pub fn is_rpc_url(url: &str, scheme: &str) -> bool {
    match (url.get(..scheme.len()), url.get(scheme.len()..)) {
        (Some(prefix), Some(rest)) => {
            prefix.eq_ignore_ascii_case(scheme) && rest.starts_with(':') && rest.len() > 1
        }
        _ => false,
    }
}

impl RpcCall {
    /// Decode a pseudo-RPC URL. Returns `None` when `url` is not on the
    /// reserved scheme at all, so the caller can fall through to the other
    /// navigation rules.
    pub fn parse(url: &str, scheme: &str) -> Option<Result<Self, RpcError>> {
        if !is_rpc_url(url, scheme) {
            return None;
        }
        Some(Self::parse_reserved(url))
    }

    fn parse_reserved(raw: &str) -> Result<Self, RpcError> {
        let parsed = Url::parse(raw).map_err(|e| RpcError::InvalidUrl(e.to_string()))?;
        let call = parsed.host_str().unwrap_or_default().to_ascii_lowercase();

        match call.as_str() {
            LOGIN_HOST => {
                let username = query_param(&parsed, "username").ok_or(RpcError::MissingParam("username"))?;
                let password = query_param(&parsed, "password").ok_or(RpcError::MissingParam("password"))?;
                Ok(RpcCall::Login { username, password })
            }
            OPEN_URL_HOST => {
                let url = query_param(&parsed, "url").ok_or(RpcError::MissingParam("url"))?;
                Ok(RpcCall::OpenUrl { url })
            }
            other => Err(RpcError::UnknownCall(other.to_string())),
        }
    }

    /// Encode this call as a URL on `scheme`
    pub fn to_url(&self, scheme: &str) -> String {
        match self {
            RpcCall::Login { username, password } => format!(
                "{}://{}?username={}&password={}",
                scheme,
                LOGIN_HOST,
                urlencoding::encode(username),
                urlencoding::encode(password)
            ),
            RpcCall::OpenUrl { url } => format!(
                "{}://{}?url={}",
                scheme,
                OPEN_URL_HOST,
                urlencoding::encode(url)
            ),
        }
    }
}

/// Percent-decoded value of the first `name` pair, unless it is empty
fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

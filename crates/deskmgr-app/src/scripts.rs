//! Scripts injected into hosted pages
//!
//! Every template under `ui/` is a JavaScript function expression. Values are
//! passed as call arguments serialized through `serde_json`, never spliced
//! into the script text.

use deskmgr_bridge::auth::{DEMO_PASSWORD, DEMO_USERNAME};
use deskmgr_bridge::NativeEvent;
use serde::Serialize;
use serde_json::json;

/// Installed as an initialization script on every document
pub const BRIDGE_SCRIPT: &str = include_str!("ui/bridge.js");

const LOGIN_HOOK: &str = include_str!("ui/login_hook.js");
const MAIN_HOOK: &str = include_str!("ui/main_hook.js");
const LOGIN_PENDING: &str = include_str!("ui/login_pending.js");
const LOGIN_FAILED: &str = include_str!("ui/login_failed.js");
const FALLBACK_LOGIN: &str = include_str!("ui/fallback_login.html");

const FALLBACK_CONFIG_MARKER: &str = "/*DESKMGR_CONFIG*/";

const LABEL_IDLE: &str = "Sign in";
const LABEL_PENDING: &str = "Signing in...";
const LABEL_ERROR: &str = "Invalid username or password";

/// JSON literal safe to embed in a script or an inline `<script>` block
fn js_value<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace('<', "\\u003c")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

fn invoke(template: &str, args: &[String]) -> String {
    format!("({})({});", template.trim(), args.join(", "))
}

fn labels() -> String {
    js_value(&json!({
        "idle": LABEL_IDLE,
        "pending": LABEL_PENDING,
        "error": LABEL_ERROR,
    }))
}

/// Prefill demo credentials and route the login form through the pseudo-RPC URL
pub fn login_hook(scheme: &str) -> String {
    let prefill = json!({ "username": DEMO_USERNAME, "password": DEMO_PASSWORD });
    invoke(LOGIN_HOOK, &[js_value(scheme), js_value(&prefill)])
}

/// Route `.function-card` clicks to local pages or the external browser
pub fn main_hook(scheme: &str) -> String {
    invoke(MAIN_HOOK, &[js_value(scheme)])
}

/// Disable the login button while credentials are checked
pub fn login_pending() -> String {
    invoke(LOGIN_PENDING, &[labels()])
}

/// Re-enable the login button, show the inline error and clear the password
pub fn login_failed() -> String {
    invoke(LOGIN_FAILED, &[labels()])
}

/// Push a native event to listeners registered through `deskmgr.onNative`
pub fn deliver(event: &NativeEvent) -> String {
    format!(
        "window.deskmgr && window.deskmgr.receive({});",
        event.to_json().replace('<', "\\u003c")
    )
}

/// Built-in login document served when no login page is bundled
pub fn fallback_login_page(scheme: &str, remember: bool, username: &str) -> String {
    let config = json!({
        "scheme": scheme,
        "remember": remember,
        "username": username,
    });
    FALLBACK_LOGIN.replacen(FALLBACK_CONFIG_MARKER, &js_value(&config), 1)
}

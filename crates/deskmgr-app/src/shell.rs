//! Shell window
//!
//! Owns the page host and every piece of state the hosted pages can reach:
//! settings, themes, the proxy-context registry and the deferred queue.
//! The event loop feeds it navigation actions, IPC bodies, page-load
//! notifications and menu ids, and calls [`ShellWindow::run_due`] whenever a
//! deadline passes.

use crate::platform::menu_ids;
use crate::scripts;
use crate::webview::PageHost;
use deskmgr_bridge::{
    window_title, Action, CredentialCheck, DeferredQueue, DemoCredentials, NativeEvent,
    NavigationBridge, PageKind, PageMessage, ProxyRegistry, Routed, APP_TITLE, NAVIGATION_DEFER,
};
use deskmgr_core::types::WindowState;
use deskmgr_core::{AppPaths, DeskError, DeskResult};
use deskmgr_settings::SettingsStore;
use deskmgr_theme::ThemeRegistry;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, trace, warn};

/// Simulated verification latency before credentials are checked
pub const LOGIN_CHECK_DELAY: Duration = Duration::from_millis(1500);

/// Pause between a successful login and loading the main page
pub const MAIN_PAGE_DELAY: Duration = Duration::from_millis(100);

const ERROR_TITLE: &str = "Error";

/// Work scheduled on the deferred queue
pub enum Task {
    Run(Action),
    /// Login posted over IPC, carrying the page's remember choice
    Login {
        username: String,
        password: String,
        remember: bool,
    },
    CheckCredentials {
        username: String,
        password: String,
        remember: bool,
    },
    LoadMainPage,
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Task::Run(action) => f.debug_tuple("Run").field(action).finish(),
            Task::Login {
                username, remember, ..
            } => f
                .debug_struct("Login")
                .field("username", username)
                .field("remember", remember)
                .finish_non_exhaustive(),
            Task::CheckCredentials {
                username, remember, ..
            } => f
                .debug_struct("CheckCredentials")
                .field("username", username)
                .field("remember", remember)
                .finish_non_exhaustive(),
            Task::LoadMainPage => f.write_str("LoadMainPage"),
        }
    }
}

/// Document shown at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartPage {
    Remote(String),
    Local(PathBuf),
    Fallback,
}

pub struct ShellWindow<H: PageHost> {
    host: H,
    paths: AppPaths,
    bridge: NavigationBridge,
    settings: SettingsStore,
    themes: ThemeRegistry,
    credentials: Box<dyn CredentialCheck>,
    proxies: ProxyRegistry,
    queue: DeferredQueue<Task>,
    clock: Instant,
}

impl<H: PageHost> ShellWindow<H> {
    pub fn new(
        host: H,
        paths: AppPaths,
        bridge: NavigationBridge,
        settings: SettingsStore,
        themes: ThemeRegistry,
    ) -> Self {
        Self {
            host,
            paths,
            bridge,
            settings,
            themes,
            credentials: Box::new(DemoCredentials),
            proxies: ProxyRegistry::new(),
            queue: DeferredQueue::new(),
            clock: Instant::now(),
        }
    }

    /// Replace the demo credential check
    pub fn with_credentials(mut self, check: impl CredentialCheck + 'static) -> Self {
        self.credentials = Box::new(check);
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn bridge(&self) -> &NavigationBridge {
        &self.bridge
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn themes(&self) -> &ThemeRegistry {
        &self.themes
    }

    /// Load the configured startup page, the bundled login page, or the
    /// built-in login document, in that order.
    pub fn start(&mut self) -> StartPage {
        let configured: String = self.settings.get("startup_page_url", String::new());
        let configured = configured.trim();

        if !configured.is_empty() {
            let lower = configured.to_ascii_lowercase();
            if lower.starts_with("http://") || lower.starts_with("https://") {
                info!("Loading startup URL: {}", configured);
                match self.host.load_url(configured) {
                    Ok(()) => return StartPage::Remote(configured.to_string()),
                    Err(e) => warn!("Startup URL failed, using login page: {}", e),
                }
            } else {
                let path = self.paths.resolve(configured);
                if path.is_file() && self.show_page(&path).is_ok() {
                    return StartPage::Local(path);
                }
                warn!("Startup page {:?} unavailable, using login page", path);
            }
        }

        let login = self.paths.login_page();
        if login.is_file() && self.show_page(&login).is_ok() {
            return StartPage::Local(login);
        }

        warn!("Login page {:?} not found, serving built-in login", login);
        self.show_fallback_login();
        StartPage::Fallback
    }

    fn show_fallback_login(&mut self) {
        let remember = self.settings.get("remember_password", false);
        let username = if remember {
            self.settings.get("username", String::new())
        } else {
            String::new()
        };

        let html = scripts::fallback_login_page(self.bridge.scheme(), remember, &username);
        if let Err(e) = self.host.load_html(&html) {
            error!("Failed to show built-in login: {}", e);
        }
        self.host.set_title(&format!("{} - Login", APP_TITLE));
    }

    /// Queue an action produced by a navigation callback
    pub fn defer(&mut self, action: Action) {
        debug!("Deferring {:?}", action);
        self.schedule(NAVIGATION_DEFER, Task::Run(action));
    }

    /// The page asked for a new browsing context. Its target goes to the
    /// system browser through a one-shot proxy context.
    pub fn on_new_window(&mut self, target_url: &str) {
        let id = self.proxies.open();
        match self.proxies.capture(id, target_url) {
            Some(action) => self.defer(action),
            None => debug!("New window request without a target"),
        }
    }

    /// Handle a message posted through `window.ipc`
    pub fn on_ipc(&mut self, body: &str) {
        let message = match PageMessage::parse(body) {
            Ok(message) => message,
            Err(e) => {
                warn!("Rejected page message: {}", e);
                self.notify(&NativeEvent::Error {
                    message: e.to_string(),
                });
                return;
            }
        };
        debug!("Page message: {:?}", message);

        let remember = match &message {
            PageMessage::Login { remember, .. } => remember.unwrap_or(false),
            _ => false,
        };

        match self.bridge.route_message(message) {
            Ok(Routed::Action(Action::Login { username, password })) => self.schedule(
                NAVIGATION_DEFER,
                Task::Login {
                    username,
                    password,
                    remember,
                },
            ),
            Ok(Routed::Action(action)) => self.defer(action),
            Ok(Routed::ApplyTheme(name)) => self.apply_theme(&name),
            Ok(Routed::Log { level, message }) => log_from_page(level, &message),
            Err(e) => {
                warn!("Page message not handled: {}", e);
                self.notify(&NativeEvent::Error {
                    message: e.to_string(),
                });
            }
        }
    }

    /// A document finished loading
    pub fn on_page_loaded(&mut self, url: &str) {
        self.host.evaluate_script(&self.themes.injection_script());

        match PageKind::from_url(url) {
            PageKind::Login => self
                .host
                .evaluate_script(&scripts::login_hook(self.bridge.scheme())),
            PageKind::Main => self
                .host
                .evaluate_script(&scripts::main_hook(self.bridge.scheme())),
            PageKind::Settings | PageKind::Other => {}
        }

        if let Some(path) = local_path(url) {
            self.host.set_title(&window_title(&path));
        }
    }

    /// Handle a native menu selection
    pub fn on_menu(&mut self, id: &str) {
        match id {
            menu_ids::TOGGLE_THEME => {
                let name = self.themes.toggle_theme();
                self.theme_applied(&name);
            }
            menu_ids::OPEN_SETTINGS => {
                let page = self.paths.settings_page();
                self.load_page(&page);
            }
            menu_ids::RELOAD => self.reload(),
            other => trace!("Unhandled menu id: {}", other),
        }
    }

    /// Earliest deadline the event loop should wake for
    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.next_deadline()
    }

    /// Run every task due at `now`. Returns how many ran.
    pub fn run_due(&mut self, now: Instant) -> usize {
        self.clock = self.clock.max(now);
        let mut ran = 0;
        while let Some(task) = self.queue.pop_due(now) {
            trace!("Running {:?}", task);
            self.dispatch(task);
            ran += 1;
        }
        ran
    }

    /// Persist window geometry and settings before the window goes away.
    /// Pending tasks are dropped.
    pub fn close(&mut self, state: WindowState) {
        info!("Closing window at {:?}", state);
        self.settings.save_window_state(state);
        if !self.settings.save() {
            warn!("Settings were not saved on exit");
        }
        if !self.queue.is_empty() {
            debug!("Dropping {} pending tasks", self.queue.len());
        }
    }

    fn schedule(&mut self, delay: Duration, task: Task) {
        let base = Instant::now().max(self.clock);
        self.queue.schedule_at(base + delay, task);
    }

    fn dispatch(&mut self, task: Task) {
        match task {
            Task::Run(action) => self.execute(action),
            Task::Login {
                username,
                password,
                remember,
            } => self.begin_login(username, password, remember),
            Task::CheckCredentials {
                username,
                password,
                remember,
            } => self.check_credentials(&username, &password, remember),
            Task::LoadMainPage => {
                let main = self.paths.main_page();
                self.load_page(&main);
            }
        }
    }

    fn execute(&mut self, action: Action) {
        match action {
            // The pseudo-RPC URL has no remember field
            Action::Login { username, password } => self.begin_login(username, password, false),
            Action::OpenExternal { url } => self.open_external(&url),
            Action::LoadLocalPage { path } => {
                self.load_page(&path);
            }
        }
    }

    fn begin_login(&mut self, username: String, password: String, remember: bool) {
        info!("Login requested for {}", username);
        self.host.evaluate_script(&scripts::login_pending());
        self.schedule(
            LOGIN_CHECK_DELAY,
            Task::CheckCredentials {
                username,
                password,
                remember,
            },
        );
    }

    fn check_credentials(&mut self, username: &str, password: &str, remember: bool) {
        if self.credentials.verify(username, password) {
            self.login_succeeded(username, remember);
        } else {
            info!("Login failed for {}", username);
            self.host.evaluate_script(&scripts::login_failed());
            self.notify(&NativeEvent::LoginResult { success: false });
        }
    }

    fn login_succeeded(&mut self, username: &str, remember: bool) {
        info!("Login succeeded for {}", username);

        self.settings.set("remember_password", remember);
        self.settings
            .set("username", if remember { username } else { "" });
        self.settings.set("display_name", username);
        if !self.settings.save() {
            warn!("Settings were not saved after login");
        }
        self.notify(&NativeEvent::LoginResult { success: true });

        let main = self.paths.main_page();
        if main.is_file() {
            self.schedule(MAIN_PAGE_DELAY, Task::LoadMainPage);
        } else {
            warn!("Main page {:?} not found", main);
            self.host.show_message(
                ERROR_TITLE,
                &format!("Main page not found: {}", main.display()),
            );
        }
    }

    fn open_external(&mut self, url: &str) {
        info!("Opening in external browser: {}", url);
        if let Err(e) = self.host.open_external(url) {
            warn!("{}", e);
            self.host
                .show_message(ERROR_TITLE, &format!("Unable to open link: {}", e));
        }
    }

    /// Load a local document into the webview, reporting failures to the user
    fn load_page(&mut self, path: &Path) -> bool {
        match self.show_page(path) {
            Ok(()) => true,
            Err(e) => {
                warn!("{}", e);
                self.host.show_message(ERROR_TITLE, &e.to_string());
                false
            }
        }
    }

    fn show_page(&mut self, path: &Path) -> DeskResult<()> {
        if !path.is_file() {
            return Err(DeskError::not_found(format!(
                "HTML file does not exist: {}",
                path.display()
            )));
        }

        let url = file_url(path)?;
        info!("Loading page {}", url);
        self.host.load_url(&url)?;
        self.host.set_title(&window_title(path));
        Ok(())
    }

    fn reload(&mut self) {
        match self.host.current_url() {
            Some(url) => {
                if let Err(e) = self.host.load_url(&url) {
                    warn!("Reload failed: {}", e);
                }
            }
            None => debug!("Nothing to reload"),
        }
    }

    fn apply_theme(&mut self, name: &str) {
        if self.themes.apply_theme(name) {
            self.theme_applied(name);
        } else {
            self.notify(&NativeEvent::Error {
                message: format!("Unknown theme: {}", name),
            });
        }
    }

    fn theme_applied(&mut self, name: &str) {
        self.settings.set("theme_mode", name);
        if !self.settings.save() {
            warn!("Theme choice was not saved");
        }
        self.host.evaluate_script(&self.themes.injection_script());
        self.notify(&NativeEvent::ThemeChanged {
            name: name.to_string(),
        });
    }

    fn notify(&self, event: &NativeEvent) {
        self.host.evaluate_script(&scripts::deliver(event));
    }
}

fn log_from_page(level: log::Level, message: &str) {
    match level {
        log::Level::Error => error!("[page] {}", message),
        log::Level::Warn => warn!("[page] {}", message),
        log::Level::Info => info!("[page] {}", message),
        log::Level::Debug => debug!("[page] {}", message),
        log::Level::Trace => trace!("[page] {}", message),
    }
}

/// `file://` URL for a local document
pub fn file_url(path: &Path) -> DeskResult<String> {
    let absolute = std::path::absolute(path)?;
    url::Url::from_file_path(&absolute)
        .map(String::from)
        .map_err(|_| DeskError::not_found(format!("Not a loadable path: {}", absolute.display())))
}

/// Filesystem path behind a `file://` URL
fn local_path(url: &str) -> Option<PathBuf> {
    let parsed = url::Url::parse(url).ok()?;
    if parsed.scheme() != "file" {
        return None;
    }
    parsed.to_file_path().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{PlatformError, PlatformResult};
    use deskmgr_core::types::NavigationRequest;
    use deskmgr_bridge::BridgeConfig;
    use std::cell::RefCell;
    use tempfile::{tempdir, TempDir};

    #[derive(Default)]
    struct Record {
        loaded: Vec<String>,
        html: Vec<String>,
        scripts: Vec<String>,
        titles: Vec<String>,
        messages: Vec<(String, String)>,
        opened: Vec<String>,
    }

    #[derive(Default)]
    struct FakeHost {
        record: RefCell<Record>,
    }

    impl PageHost for FakeHost {
        fn load_url(&self, url: &str) -> DeskResult<()> {
            self.record.borrow_mut().loaded.push(url.to_string());
            Ok(())
        }

        fn load_html(&self, html: &str) -> DeskResult<()> {
            self.record.borrow_mut().html.push(html.to_string());
            Ok(())
        }

        fn evaluate_script(&self, script: &str) {
            self.record.borrow_mut().scripts.push(script.to_string());
        }

        fn current_url(&self) -> Option<String> {
            self.record.borrow().loaded.last().cloned()
        }

        fn set_title(&self, title: &str) {
            self.record.borrow_mut().titles.push(title.to_string());
        }

        fn show_message(&self, title: &str, message: &str) {
            self.record
                .borrow_mut()
                .messages
                .push((title.to_string(), message.to_string()));
        }

        fn open_external(&self, url: &str) -> PlatformResult<()> {
            if url.contains("unreachable") {
                return Err(PlatformError::OpenExternalFailed(url.to_string()));
            }
            self.record.borrow_mut().opened.push(url.to_string());
            Ok(())
        }
    }

    struct Fixture {
        dir: TempDir,
        shell: ShellWindow<FakeHost>,
        base: Instant,
    }

    impl Fixture {
        fn new(pages: &[&str]) -> Self {
            let dir = tempdir().unwrap();
            let root = dir.path().join("pages");
            std::fs::create_dir_all(&root).unwrap();
            for page in pages {
                std::fs::write(root.join(page), "<html></html>").unwrap();
            }

            let paths = AppPaths::with_root(&root, dir.path().join("config"));
            let settings = SettingsStore::load(paths.settings_file());
            let bridge = NavigationBridge::new(BridgeConfig::new(&root));
            let mut shell = ShellWindow::new(
                FakeHost::default(),
                paths,
                bridge,
                settings,
                ThemeRegistry::new(),
            );

            // Pin the clock ahead of real time so deadlines are exact
            let base = Instant::now() + Duration::from_secs(3600);
            shell.clock = base;

            Self { dir, shell, base }
        }

        fn with_credentials(self, check: impl CredentialCheck + 'static) -> Self {
            Self {
                shell: self.shell.with_credentials(check),
                ..self
            }
        }

        fn root(&self) -> PathBuf {
            self.dir.path().join("pages")
        }

        /// Simulate the renderer's navigation callback
        fn navigate(&mut self, url: &str) -> bool {
            let decision = self.shell.bridge().classify(&NavigationRequest::main_frame(url));
            let allow = decision.is_allow();
            if let Some(action) = decision.into_action() {
                self.shell.defer(action);
            }
            allow
        }

        fn advance(&mut self, millis: u64) -> usize {
            self.shell.run_due(self.base + Duration::from_millis(millis))
        }

        fn record(&self) -> std::cell::Ref<'_, Record> {
            self.shell.host().record.borrow()
        }
    }

    #[test]
    fn test_start_loads_login_page() {
        let mut fx = Fixture::new(&["01-login.html", "02-main.html"]);
        let start = fx.shell.start();

        assert_eq!(start, StartPage::Local(fx.root().join("01-login.html")));
        let record = fx.record();
        assert_eq!(record.loaded.len(), 1);
        assert!(record.loaded[0].starts_with("file://"));
        assert!(record.loaded[0].ends_with("/01-login.html"));
        assert_eq!(record.titles, vec!["Desktop Manager - Login"]);
    }

    #[test]
    fn test_start_prefers_startup_url() {
        let mut fx = Fixture::new(&["01-login.html"]);
        fx.shell
            .settings
            .set("startup_page_url", " https://intranet.example.com/ ");
        assert_eq!(
            fx.shell.start(),
            StartPage::Remote("https://intranet.example.com/".into())
        );
        assert_eq!(fx.record().loaded, vec!["https://intranet.example.com/"]);
    }

    #[test]
    fn test_start_relative_startup_page() {
        let mut fx = Fixture::new(&["01-login.html", "02-main.html"]);
        fx.shell.settings.set("startup_page_url", "02-main.html");
        assert_eq!(
            fx.shell.start(),
            StartPage::Local(fx.root().join("02-main.html"))
        );

        let mut missing = Fixture::new(&["01-login.html"]);
        missing.shell.settings.set("startup_page_url", "04-gone.html");
        assert_eq!(
            missing.shell.start(),
            StartPage::Local(missing.root().join("01-login.html"))
        );
    }

    #[test]
    fn test_start_falls_back_to_builtin_login() {
        let mut fx = Fixture::new(&[]);
        fx.shell.settings.set("remember_password", true);
        fx.shell.settings.set("username", "operator");

        assert_eq!(fx.shell.start(), StartPage::Fallback);
        let record = fx.record();
        assert!(record.loaded.is_empty());
        assert_eq!(record.html.len(), 1);
        assert!(record.html[0].contains("id=\"loginForm\""));
        assert!(record.html[0].contains("\"username\":\"operator\""));
        assert!(record.messages.is_empty());
    }

    #[test]
    fn test_valid_login_scenario() {
        let mut fx = Fixture::new(&["01-login.html", "02-main.html"]);
        fx.shell.start();

        assert!(!fx.navigate("app://login?username=admin&password=password"));
        assert!(fx.record().scripts.is_empty(), "actions never run inline");

        // Affordance disabled as soon as the deferred action runs
        assert_eq!(fx.advance(10), 1);
        assert_eq!(fx.record().scripts.last(), Some(&scripts::login_pending()));
        assert_eq!(fx.record().loaded.len(), 1);

        // Still verifying
        assert_eq!(fx.advance(1400), 0);

        // Credentials accepted, main page follows shortly after
        assert_eq!(fx.advance(1510), 1);
        assert_eq!(fx.record().loaded.len(), 1);
        assert_eq!(fx.advance(1610), 1);

        let record = fx.record();
        assert_eq!(record.loaded.len(), 2);
        assert!(record.loaded[1].ends_with("/02-main.html"));
        assert_eq!(record.titles.last().map(String::as_str), Some("Desktop Manager - Main"));
        assert!(record.messages.is_empty());
        drop(record);

        // The URL carries no remember choice, so nothing is remembered
        let saved = SettingsStore::load(fx.dir.path().join("config").join("settings.json"));
        assert_eq!(saved.get("display_name", String::new()), "admin");
        assert_eq!(saved.get("username", String::from("x")), "");
        assert!(!saved.get("remember_password", true));
    }

    #[test]
    fn test_invalid_login_scenario() {
        let mut fx = Fixture::new(&["01-login.html", "02-main.html"]);
        fx.shell.start();

        assert!(!fx.navigate("app://login?username=admin&password=wrong"));
        fx.advance(10);
        fx.advance(2000);
        fx.advance(5000);

        let record = fx.record();
        assert_eq!(record.loaded.len(), 1, "main page must not load");
        assert!(record.scripts.contains(&scripts::login_failed()));
        assert!(record
            .scripts
            .last()
            .is_some_and(|s| s.contains("\"success\":false")));
    }

    #[test]
    fn test_login_without_main_page_warns() {
        let mut fx = Fixture::new(&["01-login.html"]);
        fx.shell.start();
        fx.navigate("app://login?username=admin&password=password");
        fx.advance(10);
        fx.advance(1600);
        fx.advance(3000);

        let record = fx.record();
        assert_eq!(record.loaded.len(), 1);
        assert_eq!(record.messages.len(), 1);
        assert!(record.messages[0].1.contains("02-main.html"));
    }

    #[test]
    fn test_unchecked_remember_box_forgets_username() {
        let mut fx = Fixture::new(&["01-login.html", "02-main.html"]);
        fx.shell.settings.set("remember_password", true);
        fx.shell.settings.set("username", "operator");

        fx.shell.on_ipc(
            r#"{"v":1,"action":"login","payload":{"username":"admin","password":"password","remember":false}}"#,
        );
        fx.advance(10);
        assert_eq!(fx.record().scripts.last(), Some(&scripts::login_pending()));
        fx.advance(1510);

        assert!(!fx.shell.settings().get("remember_password", true));
        assert_eq!(fx.shell.settings().get("username", String::from("x")), "");
        assert_eq!(fx.shell.settings().get("display_name", String::new()), "admin");
    }

    #[test]
    fn test_checked_remember_box_stores_username() {
        let mut fx = Fixture::new(&["01-login.html", "02-main.html"]);
        fx.shell.settings.set("remember_password", false);

        fx.shell.on_ipc(
            r#"{"v":1,"action":"login","payload":{"username":"admin","password":"password","remember":true}}"#,
        );
        fx.advance(10);
        fx.advance(1510);
        fx.advance(1610);

        let saved = SettingsStore::load(fx.dir.path().join("config").join("settings.json"));
        assert!(saved.get("remember_password", false));
        assert_eq!(saved.get("username", String::new()), "admin");
        assert!(fx.record().loaded.iter().any(|u| u.ends_with("/02-main.html")));
    }

    #[test]
    fn test_failed_login_keeps_remember_setting() {
        let mut fx = Fixture::new(&["01-login.html"]);
        fx.shell.settings.set("username", "operator");
        fx.shell.on_ipc(
            r#"{"v":1,"action":"login","payload":{"username":"admin","password":"nope","remember":false}}"#,
        );
        fx.advance(10);
        fx.advance(1510);

        assert!(fx.shell.settings().get("remember_password", false));
        assert_eq!(fx.shell.settings().get("username", String::new()), "operator");
    }

    #[test]
    fn test_custom_credential_check() {
        let mut fx = Fixture::new(&["02-main.html"])
            .with_credentials(|user: &str, pass: &str| user == "alice" && pass == "secret");

        fx.navigate("app://login?username=alice&password=secret");
        fx.advance(10);
        fx.advance(1600);
        fx.advance(1800);
        assert!(fx.record().loaded.iter().any(|u| u.ends_with("/02-main.html")));
    }

    #[test]
    fn test_open_external() {
        let mut fx = Fixture::new(&[]);
        assert!(!fx.navigate("app://openurl?url=https%3A%2F%2Fexample.com"));
        assert!(!fx.navigate("app://openurl?url=https%3A%2F%2Funreachable.test"));
        fx.advance(10);

        let record = fx.record();
        assert_eq!(record.opened, vec!["https://example.com"]);
        assert_eq!(record.messages.len(), 1);
        assert!(record.messages[0].1.contains("unreachable.test"));
    }

    #[test]
    fn test_local_page_redirect() {
        let mut fx = Fixture::new(&["02-main.html", "03-settings.html"]);
        assert!(!fx.navigate("03-settings.html"));
        assert!(fx.navigate("04-missing.html"));
        fx.advance(10);

        let record = fx.record();
        assert_eq!(record.loaded.len(), 1);
        assert!(record.loaded[0].ends_with("/03-settings.html"));
        assert_eq!(record.titles, vec!["Desktop Manager - Settings"]);
    }

    #[test]
    fn test_missing_page_keeps_current_document() {
        let mut fx = Fixture::new(&["03-settings.html"]);
        fx.navigate("03-settings.html");
        std::fs::remove_file(fx.root().join("03-settings.html")).unwrap();
        fx.advance(10);

        let record = fx.record();
        assert!(record.loaded.is_empty());
        assert_eq!(record.messages.len(), 1);
        assert_eq!(record.messages[0].0, "Error");
    }

    #[test]
    fn test_new_window_goes_external_once() {
        let mut fx = Fixture::new(&[]);
        fx.shell.on_new_window("https://example.com/report");
        fx.shell.on_new_window("about:blank");
        fx.advance(10);
        fx.advance(20);

        assert_eq!(fx.record().opened, vec!["https://example.com/report"]);
        assert!(fx.shell.proxies.is_empty());
    }

    #[test]
    fn test_page_loaded_hooks() {
        let mut fx = Fixture::new(&["01-login.html", "02-main.html"]);
        let theme = fx.shell.themes().injection_script();

        let login_url = file_url(&fx.root().join("01-login.html")).unwrap();
        fx.shell.on_page_loaded(&login_url);
        {
            let record = fx.record();
            assert_eq!(record.scripts, vec![theme.clone(), scripts::login_hook("app")]);
            assert_eq!(record.titles, vec!["Desktop Manager - Login"]);
        }

        let main_url = file_url(&fx.root().join("02-main.html")).unwrap();
        fx.shell.on_page_loaded(&main_url);
        assert_eq!(fx.record().scripts[3], scripts::main_hook("app"));

        fx.shell.on_page_loaded("https://example.com/");
        let record = fx.record();
        assert_eq!(record.scripts.len(), 5);
        assert_eq!(record.scripts[4], theme);
        assert_eq!(record.titles.len(), 2);
    }

    #[test]
    fn test_ipc_apply_theme() {
        let mut fx = Fixture::new(&[]);
        fx.shell
            .on_ipc(r#"{"v":1,"action":"apply_theme","payload":{"name":"dark"}}"#);

        assert_eq!(fx.shell.themes().current_theme(), "dark");
        assert_eq!(fx.shell.settings().get("theme_mode", String::new()), "dark");
        let record = fx.record();
        assert_eq!(record.scripts[0], fx.shell.themes().injection_script());
        assert!(record.scripts[1].contains("theme_changed"));
    }

    #[test]
    fn test_ipc_rejections_are_reported_to_page() {
        let mut fx = Fixture::new(&[]);
        fx.shell.on_ipc(r#"{"v":7,"action":"log","payload":{"message":"x"}}"#);
        fx.shell
            .on_ipc(r#"{"v":1,"action":"apply_theme","payload":{"name":"neon"}}"#);
        fx.shell
            .on_ipc(r#"{"v":1,"action":"load_page","payload":{"path":"nope.html"}}"#);

        let record = fx.record();
        assert_eq!(record.scripts.len(), 3);
        assert!(record.scripts.iter().all(|s| s.contains("\"event\":\"error\"")));
        assert_eq!(fx.shell.themes().current_theme(), "light");
    }

    #[test]
    fn test_ipc_load_page() {
        let mut fx = Fixture::new(&["03-settings.html"]);
        fx.shell
            .on_ipc(r#"{"v":1,"action":"load_page","payload":{"path":"03-settings.html"}}"#);
        assert!(fx.record().loaded.is_empty());
        fx.advance(10);
        assert_eq!(fx.record().loaded.len(), 1);
    }

    #[test]
    fn test_menu_commands() {
        let mut fx = Fixture::new(&["03-settings.html"]);
        fx.shell.on_menu(menu_ids::TOGGLE_THEME);
        assert_eq!(fx.shell.themes().current_theme(), "dark");
        fx.shell.on_menu(menu_ids::TOGGLE_THEME);
        assert_eq!(fx.shell.themes().current_theme(), "light");

        fx.shell.on_menu(menu_ids::OPEN_SETTINGS);
        fx.shell.on_menu(menu_ids::RELOAD);
        let record = fx.record();
        assert_eq!(record.loaded.len(), 2);
        assert_eq!(record.loaded[0], record.loaded[1]);
    }

    #[test]
    fn test_close_persists_window_state() {
        let mut fx = Fixture::new(&[]);
        fx.navigate("app://openurl?url=https%3A%2F%2Fexample.com");
        let state = WindowState {
            width: 1280,
            height: 800,
            x: 10,
            y: 20,
            maximized: true,
        };
        fx.shell.close(state);

        let saved = SettingsStore::load(fx.dir.path().join("config").join("settings.json"));
        assert_eq!(saved.window_state(), state);
        assert!(fx.record().opened.is_empty(), "pending tasks never run");
    }

    #[test]
    fn test_local_path() {
        let dir = tempdir().unwrap();
        let page = dir.path().join("02-main.html");
        let url = file_url(&page).unwrap();
        assert_eq!(local_path(&url), Some(std::path::absolute(&page).unwrap()));
        assert_eq!(local_path("https://example.com/02-main.html"), None);
        assert_eq!(local_path("about:blank"), None);
    }
}

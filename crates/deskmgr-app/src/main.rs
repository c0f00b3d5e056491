//! Desktop Manager - Main Application Entry Point
//!
//! A single window hosting the bundled HTML pages in a system webview.
//! Renderer callbacks only forward events to the loop through a
//! [`EventLoopProxy`]; all shell work runs on the event loop thread.

mod logging;
mod platform;
mod preflight;
mod scripts;
mod shell;
mod webview;

use clap::Parser;
use deskmgr_bridge::{Action, BridgeConfig, NavigationBridge, APP_TITLE};
use deskmgr_core::types::NavigationRequest;
use deskmgr_core::AppPaths;
use deskmgr_settings::SettingsStore;
use deskmgr_theme::ThemeRegistry;
use logging::{LogConfig, LogFormat};
use muda::{Menu, MenuEvent};
use platform::get_platform_manager;
use shell::ShellWindow;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tao::{
    dpi::{LogicalPosition, LogicalSize},
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy},
    window::{Icon, Theme, WindowBuilder},
};
use tracing::{debug, error, info, warn};
use webview::WryHost;
use wry::{PageLoadEvent, WebViewBuilder};

const MIN_WIDTH: f64 = 800.0;
const MIN_HEIGHT: f64 = 600.0;

#[derive(Parser, Debug)]
#[command(name = "deskmgr", version, about = "Desktop shell for local HTML pages")]
struct Cli {
    /// Directory holding the HTML pages
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Directory for settings.json and logs
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Run the startup checks and exit
    #[arg(long)]
    check: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Log filter directives, overriding RUST_LOG (e.g. "deskmgr_bridge=trace")
    #[arg(long, value_name = "FILTER")]
    log_filter: Option<String>,

    /// Single-line console log output
    #[arg(long)]
    compact: bool,
}

/// Events forwarded from renderer callbacks to the loop
#[derive(Debug)]
enum UserEvent {
    Deferred(Action),
    NewWindow(String),
    PageLoaded(String),
    Ipc(String),
    Menu(String),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            eprintln!("deskmgr: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn resolve_paths(cli: &Cli) -> AppPaths {
    let discovered = AppPaths::discover();
    match (&cli.root, &cli.config_dir) {
        (None, None) => discovered,
        (root, config_dir) => AppPaths::with_root(
            root.clone().unwrap_or(discovered.app_root),
            config_dir.clone().unwrap_or(discovered.config_dir),
        ),
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let paths = resolve_paths(&cli);

    let mut log_config = if cli.verbose {
        LogConfig::debug()
    } else {
        LogConfig::default()
    };
    if let Some(filter) = &cli.log_filter {
        log_config = log_config.with_filter(filter);
    }
    if cli.compact {
        log_config.format = LogFormat::Compact;
    }
    let log_file = logging::init_logging(&log_config.with_log_dir(&paths.log_dir))?;

    info!("Starting {}...", APP_TITLE);
    info!("App root: {}", paths.app_root.display());
    if let Some(file) = &log_file {
        info!("Logging to {}", file.display());
    }

    let report = preflight::check(&paths);
    report.log();
    if cli.check || !report.is_ok() {
        return Ok(if report.is_ok() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let settings =
        SettingsStore::load_with_bundled(paths.settings_file(), Some(paths.bundled_settings_file()));
    let mut themes = ThemeRegistry::with_theme_dir(&paths.theme_dir());
    themes.subscribe(|name| debug!("Theme listener notified: {}", name));

    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let geometry = settings.window_state();
    let window = WindowBuilder::new()
        .with_title(APP_TITLE)
        .with_inner_size(LogicalSize::new(geometry.width as f64, geometry.height as f64))
        .with_position(LogicalPosition::new(geometry.x as f64, geometry.y as f64))
        .with_min_inner_size(LogicalSize::new(MIN_WIDTH, MIN_HEIGHT))
        .with_maximized(true)
        .with_window_icon(create_window_icon())
        .build(&event_loop)?;

    let theme_mode: String = settings.get("theme_mode", deskmgr_theme::DEFAULT_THEME.to_string());
    let theme_name = match theme_mode.as_str() {
        "system" => match window.theme() {
            Theme::Dark => "dark",
            _ => "light",
        },
        other => other,
    };
    if !themes.apply_theme(theme_name) {
        warn!("Configured theme {:?} unavailable, using {}", theme_name, themes.current_theme());
    }

    let platform = get_platform_manager();
    info!("Platform: {}", platform.platform_name());

    let menu_bar = Menu::new();
    let shortcut: String = settings.get("theme_shortcut", "Ctrl+Shift+T".to_string());
    let menu_result = platform::create_edit_menu(&menu_bar)
        .and_then(|_| {
            platform::create_view_menu(&menu_bar, platform::theme_accelerator(&shortcut))
        })
        .and_then(|_| platform.initialize_menu(&window, &menu_bar));
    if let Err(e) = menu_result {
        error!("Failed to initialize menu: {}", e);
    }

    let menu_proxy = proxy.clone();
    MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
        let _ = menu_proxy.send_event(UserEvent::Menu(event.id().0.clone()));
    }));

    let bridge = NavigationBridge::new(BridgeConfig::new(&paths.app_root));
    let builder = attach_handlers(WebViewBuilder::new(), &bridge, &proxy)
        .with_initialization_script(scripts::BRIDGE_SCRIPT)
        .with_devtools(cfg!(debug_assertions));
    let webview = webview::build_webview(builder, &window)?;
    info!("Window created successfully");

    let host = WryHost::new(window, webview, platform);
    let mut shell = ShellWindow::new(host, paths, bridge, settings, themes);
    let start = shell.start();
    info!("Start page: {:?}", start);

    logging::install_panic_hook();

    event_loop.run(move |event, _target, control_flow| {
        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                let state = shell.host().window_state();
                shell.close(state);
                *control_flow = ControlFlow::Exit;
                return;
            }
            Event::UserEvent(user_event) => match user_event {
                UserEvent::Deferred(action) => shell.defer(action),
                UserEvent::NewWindow(url) => shell.on_new_window(&url),
                UserEvent::PageLoaded(url) => shell.on_page_loaded(&url),
                UserEvent::Ipc(body) => shell.on_ipc(&body),
                UserEvent::Menu(id) => shell.on_menu(&id),
            },
            _ => {}
        }

        shell.run_due(Instant::now());
        *control_flow = match shell.next_deadline() {
            Some(deadline) => ControlFlow::WaitUntil(deadline),
            None => ControlFlow::Wait,
        };
    });
}

/// Wire renderer callbacks to the event loop
fn attach_handlers<'a>(
    builder: WebViewBuilder<'a>,
    bridge: &NavigationBridge,
    proxy: &EventLoopProxy<UserEvent>,
) -> WebViewBuilder<'a> {
    let nav_bridge = bridge.clone();
    let nav_proxy = proxy.clone();
    let window_proxy = proxy.clone();
    let load_proxy = proxy.clone();
    let ipc_proxy = proxy.clone();

    builder
        .with_navigation_handler(move |url| {
            let decision = nav_bridge.classify(&NavigationRequest::main_frame(url));
            let allow = decision.is_allow();
            if let Some(action) = decision.into_action() {
                let _ = nav_proxy.send_event(UserEvent::Deferred(action));
            }
            allow
        })
        .with_new_window_req_handler(move |url| {
            let _ = window_proxy.send_event(UserEvent::NewWindow(url));
            false
        })
        .with_on_page_load_handler(move |event, url| {
            if let PageLoadEvent::Finished = event {
                let _ = load_proxy.send_event(UserEvent::PageLoaded(url));
            }
        })
        .with_ipc_handler(move |request| {
            let _ = ipc_proxy.send_event(UserEvent::Ipc(request.body().clone()));
        })
}

/// Generated window icon: a rounded tile with a light grid
fn create_window_icon() -> Option<Icon> {
    const SIZE: u32 = 32;
    let mut data = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let corner = (x < 3 || x > SIZE - 4) && (y < 3 || y > SIZE - 4);
            let grid = x % 8 == 3 || y % 8 == 3;
            let ratio = y as f32 / (SIZE as f32 - 1.0);
            let (r, g, b) = if grid {
                (230.0, 240.0, 255.0)
            } else {
                (40.0 + 30.0 * ratio, 110.0 + 40.0 * ratio, 210.0)
            };
            data.push(r as u8);
            data.push(g as u8);
            data.push(b as u8);
            data.push(if corner { 0 } else { 255 });
        }
    }
    Icon::from_rgba(data, SIZE, SIZE).ok()
}

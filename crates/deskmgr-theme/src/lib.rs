//! Theme registry - named style profiles with exactly one current profile
//!
//! The registry starts with the built-in `light` and `dark` profiles and may
//! add profiles from `*.json` files in a theme directory. Applying a theme
//! notifies every subscriber with the new theme name.

mod profile;

pub use profile::{dark_theme, light_theme, ThemeProfile, FALLBACK_COLOR};

use std::path::Path;

/// Name of the profile selected when nothing else is requested
pub const DEFAULT_THEME: &str = "light";

type ThemeListener = Box<dyn Fn(&str)>;

pub struct ThemeRegistry {
    profiles: Vec<ThemeProfile>,
    current: usize,
    listeners: Vec<ThemeListener>,
}

impl ThemeRegistry {
    /// Registry holding only the built-in profiles, with `light` current
    pub fn new() -> Self {
        Self {
            profiles: vec![light_theme(), dark_theme()],
            current: 0,
            listeners: Vec::new(),
        }
    }

    /// Built-ins plus every profile found in `dir`
    pub fn with_theme_dir(dir: &Path) -> Self {
        let mut registry = Self::new();
        let loaded = registry.load_dir(dir);
        if loaded > 0 {
            log::info!("Loaded {} custom theme(s) from {:?}", loaded, dir);
        }
        registry
    }

    /// Load `*.json` profiles from `dir`. A file named like an existing
    /// profile replaces it. Unreadable files are logged and skipped. Returns
    /// the number of profiles loaded.
    pub fn load_dir(&mut self, dir: &Path) -> usize {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("Theme directory {:?} not readable: {}", dir, e);
                return 0;
            }
        };

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            match ThemeProfile::from_file(&path) {
                Ok(profile) => {
                    self.insert(profile);
                    loaded += 1;
                }
                Err(e) => log::warn!("Failed to load theme file {:?}: {}", path, e),
            }
        }
        loaded
    }

    fn insert(&mut self, profile: ThemeProfile) {
        match self.position(profile.name()) {
            Some(index) => self.profiles[index] = profile,
            None => self.profiles.push(profile),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.profiles.iter().position(|p| p.name() == name)
    }

    /// Names of all available profiles, built-ins first
    pub fn list_themes(&self) -> Vec<String> {
        self.profiles.iter().map(|p| p.name().to_string()).collect()
    }

    /// Make `name` the current profile and notify subscribers. Unknown names
    /// leave the current profile untouched and return `false`.
    pub fn apply_theme(&mut self, name: &str) -> bool {
        let Some(index) = self.position(name) else {
            log::warn!("Unknown theme requested: {}", name);
            return false;
        };

        self.current = index;
        log::info!("Applied theme: {}", name);
        for listener in &self.listeners {
            listener(name);
        }
        true
    }

    /// Name of the current profile
    pub fn current_theme(&self) -> &str {
        self.profiles[self.current].name()
    }

    pub fn current_profile(&self) -> &ThemeProfile {
        &self.profiles[self.current]
    }

    /// Switch between light and dark. Any non-light theme toggles to light.
    pub fn toggle_theme(&mut self) -> String {
        let next = if self.current_theme() == "light" {
            "dark"
        } else {
            "light"
        };
        self.apply_theme(next);
        next.to_string()
    }

    /// Profile by name, falling back to the light profile
    pub fn theme_info(&self, name: &str) -> &ThemeProfile {
        self.position(name)
            .or_else(|| self.position(DEFAULT_THEME))
            .map(|index| &self.profiles[index])
            .unwrap_or(&self.profiles[0])
    }

    /// Color token of the current profile
    pub fn color(&self, token: &str) -> String {
        self.current_profile().color(token).to_string()
    }

    /// CSS custom properties of the current profile
    pub fn css_variables(&self) -> Vec<(String, String)> {
        self.current_profile().css_variables()
    }

    /// Script applying the current profile to a hosted document
    pub fn injection_script(&self) -> String {
        self.current_profile().injection_script()
    }

    /// Register a callback invoked with the theme name after each successful apply
    pub fn subscribe(&mut self, listener: impl Fn(&str) + 'static) {
        self.listeners.push(Box::new(listener));
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

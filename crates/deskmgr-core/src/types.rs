//! Common types used throughout the desktop manager

use serde::{Deserialize, Serialize};

/// A navigation attempt reported by the embedded renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub target_url: String,
    pub is_main_frame: bool,
}

impl NavigationRequest {
    /// Request for the top-level document
    pub fn main_frame(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            is_main_frame: true,
        }
    }

    /// Request issued by an embedded frame
    pub fn sub_frame(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            is_main_frame: false,
        }
    }
}

/// Persisted window geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowState {
    pub width: u32,
    pub height: u32,
    pub x: i32,
    pub y: i32,
    pub maximized: bool,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            x: 100,
            y: 100,
            maximized: false,
        }
    }
}

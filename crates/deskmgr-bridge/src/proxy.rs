//! Throwaway contexts that capture new-window requests
//!
//! A page asking for a new browsing context (`target="_blank"`,
//! `window.open`) never gets a second embedded window. The shell opens a
//! proxy context instead; its first navigation is handed to the system
//! browser and the context is discarded.

use crate::navigation::Action;
use std::collections::HashSet;
use std::fmt;

/// Identifier of a live proxy context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProxyId(u64);

impl fmt::Display for ProxyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "proxy-{}", self.0)
    }
}

/// Registry of proxy contexts owned by the shell window
#[derive(Debug, Default)]
pub struct ProxyRegistry {
    live: HashSet<ProxyId>,
    next: u64,
}

impl ProxyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new proxy context
    pub fn open(&mut self) -> ProxyId {
        self.next += 1;
        let id = ProxyId(self.next);
        self.live.insert(id);
        log::debug!("Opened {}", id);
        id
    }

    /// Consume the context's single navigation.
    ///
    /// Returns the external-open action for a real target. Blank targets
    /// and unknown or already-consumed ids yield nothing.
    pub fn capture(&mut self, id: ProxyId, target_url: &str) -> Option<Action> {
        if !self.live.remove(&id) {
            log::debug!("Ignoring navigation for closed {}", id);
            return None;
        }

        let url = target_url.trim();
        if url.is_empty() || url.eq_ignore_ascii_case("about:blank") {
            log::debug!("{} captured a blank target", id);
            return None;
        }

        log::info!("{} captured {}", id, url);
        Some(Action::OpenExternal {
            url: url.to_string(),
        })
    }

    /// Drop a context that never navigated
    pub fn abandon(&mut self, id: ProxyId) -> bool {
        let removed = self.live.remove(&id);
        if removed {
            log::debug!("Abandoned {}", id);
        }
        removed
    }

    pub fn contains(&self, id: ProxyId) -> bool {
        self.live.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

//! Live-window accounting.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::engine::WindowId;

/// Whether the event loop keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    /// The last window closed.
    Quit,
}

/// Tracks open windows. The loop ends when none remain.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    next_id: u32,
    live: BTreeSet<WindowId>,
}

impl WindowRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new window and returns its id. Ids are never reused.
    pub fn open(&mut self) -> WindowId {
        self.next_id += 1;
        let id = WindowId(self.next_id);
        self.live.insert(id);
        debug!(window = %id, live = self.live.len(), "Window opened");
        id
    }

    /// Unregisters a window. Closing a window twice counts once.
    pub fn close(&mut self, id: WindowId) -> LoopControl {
        if self.live.remove(&id) {
            debug!(window = %id, live = self.live.len(), "Window closed");
        } else {
            warn!(window = %id, "Close for unknown or already closed window ignored");
        }
        if self.live.is_empty() {
            LoopControl::Quit
        } else {
            LoopControl::Continue
        }
    }

    #[must_use]
    pub fn is_open(&self, id: WindowId) -> bool {
        self.live.contains(&id)
    }

    #[must_use]
    pub fn live(&self) -> usize {
        self.live.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.live.iter().copied()
    }
}

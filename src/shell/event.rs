//! Events delivered to the shell by the engine/toolkit adapter.

use crate::download::{DownloadEvent, DownloadId};
use crate::engine::WindowId;
use crate::keys::{Key, Modifiers};
use crate::prompt::PromptError;
use crate::title::LoadEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
    KeyPress {
        window: WindowId,
        modifiers: Modifiers,
        key: Key,
    },
    /// The user or window manager closed the window.
    CloseRequested { window: WindowId },
    /// A page asked for a new window (e.g. `target="_blank"`).
    NewWindowRequested { url: String },
    /// A window created for a new-window request is ready to be shown.
    ReadyToShow { window: WindowId },
    LoadChanged { window: WindowId, event: LoadEvent },
    /// The pointer moved onto a link (`Some`) or off all links (`None`).
    MouseTargetChanged {
        window: WindowId,
        link_uri: Option<String>,
    },
    InitializeWebExtensions,
    Download { id: DownloadId, event: DownloadEvent },
}

/// What a prompt was opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PromptPurpose {
    Navigate,
    Search,
}

/// Result of a prompt task, sent back into the loop.
#[derive(Debug)]
pub(crate) struct PromptReply {
    pub(crate) window: WindowId,
    pub(crate) purpose: PromptPurpose,
    pub(crate) result: Result<Option<String>, PromptError>,
}

//! Seam between the shell and the embedded web engine / GUI toolkit.
//!
//! Rendering, networking, scripting and the on-disk download transfer all
//! live behind these traits. An adapter for a concrete engine implements
//! [`Engine`] and feeds toolkit/engine callbacks into the shell as
//! [`crate::shell::ShellEvent`]s.
//!
//! # Architecture
//!
//! - [`WebView`] - One rendering surface (navigation, zoom, find-in-page)
//! - [`Engine`] - Context, window and download plumbing
//! - [`ViewSettings`] / [`ContextSettings`] - Startup configuration
//! - [`HeadlessEngine`] - In-memory engine that records what it was asked to do

mod headless;
mod settings;

pub use headless::{FindCall, HeadlessEngine, HeadlessView, HeadlessWindow};
pub use settings::{
    CacheModel, ContextSettings, CookieAcceptPolicy, CookieStorageFormat, FindOptions,
    TlsErrorsPolicy, ViewSettings,
};

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::download::DownloadId;

/// Identifier of a top-level window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The engine's rendering surface for one window.
pub trait WebView {
    fn load_uri(&mut self, uri: &str);

    /// Currently committed URI, if any.
    fn uri(&self) -> Option<String>;

    fn title(&self) -> Option<String>;

    /// Load progress in `0.0..=1.0`.
    fn estimated_load_progress(&self) -> f64;

    fn go_back(&mut self);

    fn go_forward(&mut self);

    fn reload(&mut self);

    /// Stops the current load. Does not affect pending prompts.
    fn stop_loading(&mut self);

    fn zoom_level(&self) -> f64;

    fn set_zoom_level(&mut self, level: f64);

    /// Text of the last find-in-page search.
    fn search_text(&self) -> Option<String>;

    fn find(&mut self, text: &str, options: FindOptions);

    fn find_next(&mut self);

    fn find_previous(&mut self);
}

/// Engine context plus the toolkit windows hosting its views.
pub trait Engine {
    type View: WebView;

    /// Applies shared context settings. Called once, before any view exists.
    fn configure_context(&mut self, settings: &ContextSettings);

    fn create_view(&mut self, settings: &ViewSettings) -> Self::View;

    /// Creates the toplevel window that embeds the window's view.
    fn create_window(&mut self, window: WindowId);

    fn show_window(&mut self, window: WindowId);

    fn destroy_window(&mut self, window: WindowId);

    fn set_window_title(&mut self, window: WindowId, title: &str);

    /// Tells the engine where to write a download.
    fn set_download_destination(&mut self, download: DownloadId, uri: &str);

    /// Points the engine at the web-extension directory for one initialisation.
    fn initialize_web_extensions(&mut self, directory: &Path, user_data: u32);
}

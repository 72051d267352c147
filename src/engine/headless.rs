//! In-memory engine used by the simulator and tests.
//!
//! Loads complete instantly and a page's title is its URI. Every call the
//! shell makes is recorded so callers can inspect the outcome.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use super::{ContextSettings, Engine, FindOptions, ViewSettings, WebView, WindowId};
use crate::download::DownloadId;
use crate::zoom::DEFAULT_ZOOM;

/// A find-in-page call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "text", rename_all = "snake_case")]
pub enum FindCall {
    Search(String),
    Next,
    Previous,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeadlessView {
    settings: ViewSettings,
    history: Vec<String>,
    position: Option<usize>,
    zoom: f64,
    search_text: Option<String>,
    find_calls: Vec<FindCall>,
    reloads: usize,
    stops: usize,
}

impl HeadlessView {
    #[must_use]
    pub fn new(settings: ViewSettings) -> Self {
        Self {
            settings,
            history: Vec::new(),
            position: None,
            zoom: DEFAULT_ZOOM,
            search_text: None,
            find_calls: Vec::new(),
            reloads: 0,
            stops: 0,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    /// Current back/forward list, oldest first. Loading a URI drops any
    /// forward entries; back/forward only move the position.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    #[must_use]
    pub fn find_calls(&self) -> &[FindCall] {
        &self.find_calls
    }

    #[must_use]
    pub fn reloads(&self) -> usize {
        self.reloads
    }

    #[must_use]
    pub fn stops(&self) -> usize {
        self.stops
    }
}

impl WebView for HeadlessView {
    fn load_uri(&mut self, uri: &str) {
        let keep = self.position.map_or(0, |position| position + 1);
        self.history.truncate(keep);
        self.history.push(uri.to_string());
        self.position = Some(self.history.len() - 1);
    }

    fn uri(&self) -> Option<String> {
        self.position.and_then(|position| self.history.get(position).cloned())
    }

    fn title(&self) -> Option<String> {
        self.uri()
    }

    fn estimated_load_progress(&self) -> f64 {
        1.0
    }

    fn go_back(&mut self) {
        if let Some(position) = self.position
            && position > 0
        {
            self.position = Some(position - 1);
        }
    }

    fn go_forward(&mut self) {
        if let Some(position) = self.position
            && position + 1 < self.history.len()
        {
            self.position = Some(position + 1);
        }
    }

    fn reload(&mut self) {
        self.reloads += 1;
    }

    fn stop_loading(&mut self) {
        self.stops += 1;
    }

    fn zoom_level(&self) -> f64 {
        self.zoom
    }

    fn set_zoom_level(&mut self, level: f64) {
        self.zoom = level;
    }

    fn search_text(&self) -> Option<String> {
        self.search_text.clone()
    }

    fn find(&mut self, text: &str, _options: FindOptions) {
        self.search_text = Some(text.to_string());
        self.find_calls.push(FindCall::Search(text.to_string()));
    }

    fn find_next(&mut self) {
        self.find_calls.push(FindCall::Next);
    }

    fn find_previous(&mut self) {
        self.find_calls.push(FindCall::Previous);
    }
}

/// Toolkit-side state of a headless window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeadlessWindow {
    pub title: Option<String>,
    pub shown: bool,
    pub destroyed: bool,
}

#[derive(Debug, Default)]
pub struct HeadlessEngine {
    context: Option<ContextSettings>,
    windows: BTreeMap<WindowId, HeadlessWindow>,
    destinations: Vec<(DownloadId, String)>,
    extension_inits: Vec<(PathBuf, u32)>,
    views_created: usize,
}

impl HeadlessEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn context(&self) -> Option<&ContextSettings> {
        self.context.as_ref()
    }

    #[must_use]
    pub fn window(&self, window: WindowId) -> Option<&HeadlessWindow> {
        self.windows.get(&window)
    }

    #[must_use]
    pub fn windows(&self) -> &BTreeMap<WindowId, HeadlessWindow> {
        &self.windows
    }

    /// Download destinations registered so far, in order.
    #[must_use]
    pub fn destinations(&self) -> &[(DownloadId, String)] {
        &self.destinations
    }

    #[must_use]
    pub fn extension_inits(&self) -> &[(PathBuf, u32)] {
        &self.extension_inits
    }

    #[must_use]
    pub fn views_created(&self) -> usize {
        self.views_created
    }
}

impl Engine for HeadlessEngine {
    type View = HeadlessView;

    fn configure_context(&mut self, settings: &ContextSettings) {
        self.context = Some(settings.clone());
    }

    fn create_view(&mut self, settings: &ViewSettings) -> HeadlessView {
        self.views_created += 1;
        HeadlessView::new(settings.clone())
    }

    fn create_window(&mut self, window: WindowId) {
        self.windows.insert(window, HeadlessWindow::default());
    }

    fn show_window(&mut self, window: WindowId) {
        if let Some(state) = self.windows.get_mut(&window) {
            state.shown = true;
        }
    }

    fn destroy_window(&mut self, window: WindowId) {
        if let Some(state) = self.windows.get_mut(&window) {
            state.destroyed = true;
        }
    }

    fn set_window_title(&mut self, window: WindowId, title: &str) {
        if let Some(state) = self.windows.get_mut(&window) {
            state.title = Some(title.to_string());
        }
    }

    fn set_download_destination(&mut self, download: DownloadId, uri: &str) {
        debug!(download = %download, uri, "Headless download destination set");
        self.destinations.push((download, uri.to_string()));
    }

    fn initialize_web_extensions(&mut self, directory: &Path, user_data: u32) {
        self.extension_inits.push((directory.to_path_buf(), user_data));
    }
}

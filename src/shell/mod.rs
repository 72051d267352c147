//! The browser shell: windows, key commands, prompts and downloads.
//!
//! [`Shell`] owns an [`Engine`] and reacts to [`ShellEvent`]s. Key presses are
//! routed to [`Command`]s; commands that need text (navigate, search) run the
//! [`LineSource`] in a spawned task so the loop keeps handling events while the
//! prompt is open. The loop ends when the last window closes.
//!
//! # Architecture
//!
//! - [`Shell`] - Event handling and the async run loop
//! - [`AppContext`] - Config, paths, window registry
//! - [`WindowRegistry`] - Live-window count
//! - [`ShellEvent`] - Inputs from the engine adapter
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use keyshell_core::config::ShellConfig;
//! use keyshell_core::engine::HeadlessEngine;
//! use keyshell_core::paths::{BaseDirs, PathBundle};
//! use keyshell_core::prompt::ExternalPrompt;
//! use keyshell_core::shell::{AppContext, Shell};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ShellConfig::default();
//! let paths = PathBundle::new(&BaseDirs::from_env()?, &config.app_name);
//! let prompt = Arc::new(ExternalPrompt::new(config.input_command.clone()));
//! let mut shell = Shell::new(AppContext::new(config, paths), HeadlessEngine::new(), prompt);
//! shell.start(Some("https://example.com"));
//!
//! let (_events, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! shell.run(&mut rx).await;
//! # Ok(())
//! # }
//! ```

mod context;
mod event;
mod windows;

pub use context::AppContext;
pub use event::ShellEvent;
pub use windows::{LoopControl, WindowRegistry};

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, info, instrument, warn};

use crate::download::{DownloadEffect, DownloadEvent, DownloadId, DownloadNotice, DownloadTracker};
use crate::engine::{Engine, FindOptions, WebView, WindowId};
use crate::keys::{Command, Key, KeyRouter, Modifiers};
use crate::navigation::resolve_navigation_target;
use crate::prompt::LineSource;
use crate::title::{LoadEvent, TitleTracker};
use crate::zoom::{DEFAULT_ZOOM, ZoomAction, apply_zoom};

use event::{PromptPurpose, PromptReply};

/// Why [`Shell::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    AllWindowsClosed,
    /// The event sender was dropped while windows were still open.
    EventSourceClosed,
}

/// Point-in-time view of one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSnapshot {
    pub id: WindowId,
    pub uri: Option<String>,
    pub title: Option<String>,
    pub zoom_level: f64,
}

struct WindowState<V> {
    view: V,
    titles: TitleTracker,
    title: Option<String>,
}

pub struct Shell<E: Engine> {
    ctx: AppContext,
    engine: E,
    router: KeyRouter,
    downloads: DownloadTracker,
    windows: BTreeMap<WindowId, WindowState<E::View>>,
    prompt: Arc<dyn LineSource>,
    prompt_tx: mpsc::UnboundedSender<PromptReply>,
    prompt_rx: mpsc::UnboundedReceiver<PromptReply>,
    pending_prompts: HashMap<WindowId, AbortHandle>,
}

impl<E: Engine> Shell<E> {
    /// Configures the engine context. No window exists until [`Shell::start`].
    pub fn new(ctx: AppContext, mut engine: E, prompt: Arc<dyn LineSource>) -> Self {
        engine.configure_context(&ctx.context_settings());
        let router = KeyRouter::new(ctx.config.bindings.clone());
        let downloads = DownloadTracker::new(ctx.paths.downloads.clone());
        let (prompt_tx, prompt_rx) = mpsc::unbounded_channel();
        Self {
            ctx,
            engine,
            router,
            downloads,
            windows: BTreeMap::new(),
            prompt,
            prompt_tx,
            prompt_rx,
            pending_prompts: HashMap::new(),
        }
    }

    /// Opens and shows the first window, loading `initial_uri` if given.
    pub fn start(&mut self, initial_uri: Option<&str>) -> WindowId {
        let id = self.open_window(initial_uri);
        self.engine.show_window(id);
        info!(window = %id, uri = initial_uri.unwrap_or(""), "Shell started");
        id
    }

    #[must_use]
    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[must_use]
    pub fn view(&self, window: WindowId) -> Option<&E::View> {
        self.windows.get(&window).map(|state| &state.view)
    }

    #[must_use]
    pub fn downloads(&self) -> &DownloadTracker {
        &self.downloads
    }

    /// Number of open windows.
    #[must_use]
    pub fn live_windows(&self) -> usize {
        self.ctx.windows.live()
    }

    #[must_use]
    pub fn has_pending_prompt(&self, window: WindowId) -> bool {
        self.pending_prompts.contains_key(&window)
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<WindowSnapshot> {
        self.windows
            .iter()
            .map(|(id, state)| WindowSnapshot {
                id: *id,
                uri: state.view.uri(),
                title: state.title.clone(),
                zoom_level: state.view.zoom_level(),
            })
            .collect()
    }

    /// Handles one event. Must be called from within a Tokio runtime, since
    /// prompt commands spawn tasks.
    pub fn handle_event(&mut self, event: ShellEvent) -> LoopControl {
        match event {
            ShellEvent::KeyPress {
                window,
                modifiers,
                key,
            } => self
                .handle_key(window, modifiers, key)
                .unwrap_or(LoopControl::Continue),
            ShellEvent::CloseRequested { window } => self.close_window(window),
            ShellEvent::NewWindowRequested { url } => {
                let id = self.open_window(Some(&url));
                info!(window = %id, url = %url, "Opened window for new-window request");
                LoopControl::Continue
            }
            ShellEvent::ReadyToShow { window } => {
                if self.ctx.windows.is_open(window) {
                    self.engine.show_window(window);
                } else {
                    warn!(window = %window, "Ready-to-show for unknown window ignored");
                }
                LoopControl::Continue
            }
            ShellEvent::LoadChanged { window, event } => {
                self.on_load_changed(window, event);
                LoopControl::Continue
            }
            ShellEvent::MouseTargetChanged { window, link_uri } => {
                self.on_mouse_target_changed(window, link_uri.as_deref());
                LoopControl::Continue
            }
            ShellEvent::InitializeWebExtensions => {
                let user_data = self.ctx.next_extension_user_data();
                debug!(
                    directory = %self.ctx.paths.extensions.display(),
                    user_data,
                    "Initialising web extensions"
                );
                self.engine
                    .initialize_web_extensions(&self.ctx.paths.extensions, user_data);
                LoopControl::Continue
            }
            ShellEvent::Download { id, event } => {
                self.on_download(id, event);
                LoopControl::Continue
            }
        }
    }

    /// Routes a key press. `None` means the key was not a shell command and
    /// should propagate to the page.
    pub fn handle_key(
        &mut self,
        window: WindowId,
        modifiers: Modifiers,
        key: Key,
    ) -> Option<LoopControl> {
        if !self.ctx.windows.is_open(window) {
            warn!(window = %window, key = %key, "Key press for unknown window ignored");
            return None;
        }
        let command = self.router.route(modifiers, key)?;
        Some(self.execute(window, command))
    }

    /// Runs until the last window closes or `events` is closed.
    ///
    /// Prompt replies are applied as they arrive, interleaved with events.
    pub async fn run(&mut self, events: &mut mpsc::UnboundedReceiver<ShellEvent>) -> RunOutcome {
        if self.ctx.windows.live() == 0 {
            return RunOutcome::AllWindowsClosed;
        }
        loop {
            tokio::select! {
                Some(reply) = self.prompt_rx.recv() => {
                    self.apply_prompt_reply(reply);
                }
                event = events.recv() => {
                    let Some(event) = event else {
                        info!(live = self.ctx.windows.live(), "Event source closed");
                        return RunOutcome::EventSourceClosed;
                    };
                    if self.handle_event(event) == LoopControl::Quit {
                        info!("Last window closed, exiting");
                        return RunOutcome::AllWindowsClosed;
                    }
                }
            }
        }
    }

    /// Waits for every open prompt to answer and applies the replies.
    pub async fn settle(&mut self) {
        while !self.pending_prompts.is_empty() {
            let Some(reply) = self.prompt_rx.recv().await else {
                break;
            };
            self.apply_prompt_reply(reply);
        }
    }

    fn open_window(&mut self, uri: Option<&str>) -> WindowId {
        let id = self.ctx.windows.open();
        let mut view = self.engine.create_view(&self.ctx.config.view);
        self.engine.create_window(id);
        if let Some(uri) = uri {
            view.load_uri(uri);
        }
        self.windows.insert(
            id,
            WindowState {
                view,
                titles: TitleTracker::new(),
                title: None,
            },
        );
        id
    }

    fn close_window(&mut self, window: WindowId) -> LoopControl {
        if let Some(handle) = self.pending_prompts.remove(&window) {
            debug!(window = %window, "Cancelling open prompt");
            handle.abort();
        }
        if self.windows.remove(&window).is_some() {
            self.engine.destroy_window(window);
        }
        self.ctx.windows.close(window)
    }

    #[instrument(level = "debug", skip(self, window), fields(window = %window))]
    fn execute(&mut self, window: WindowId, command: Command) -> LoopControl {
        let zoom_step = self.ctx.config.zoom_step;
        let Some(state) = self.windows.get_mut(&window) else {
            return LoopControl::Continue;
        };
        let view = &mut state.view;
        match command {
            Command::ExitWindow => return self.close_window(window),
            Command::Navigate => {
                let suggestion = view.uri();
                self.open_prompt(window, PromptPurpose::Navigate, suggestion);
            }
            Command::SearchStart => {
                let suggestion = view.search_text();
                self.open_prompt(window, PromptPurpose::Search, suggestion);
            }
            Command::StopLoading => view.stop_loading(),
            Command::SearchNext => view.find_next(),
            Command::SearchPrevious => view.find_previous(),
            Command::HistoryBack => view.go_back(),
            Command::HistoryForward => view.go_forward(),
            Command::Reload => view.reload(),
            Command::ZoomIn | Command::ZoomOut | Command::ZoomReset => {
                let (action, amount) = match command {
                    Command::ZoomIn => (ZoomAction::In, zoom_step),
                    Command::ZoomOut => (ZoomAction::Out, zoom_step),
                    _ => (ZoomAction::Set, DEFAULT_ZOOM),
                };
                let level = apply_zoom(view.zoom_level(), action, amount);
                view.set_zoom_level(level);
                debug!(level, "Zoom changed");
            }
        }
        LoopControl::Continue
    }

    fn open_prompt(&mut self, window: WindowId, purpose: PromptPurpose, suggestion: Option<String>) {
        if self.pending_prompts.contains_key(&window) {
            debug!(window = %window, ?purpose, "Prompt already open for window, ignoring");
            return;
        }
        let prompt = Arc::clone(&self.prompt);
        let tx = self.prompt_tx.clone();
        let task = tokio::spawn(async move {
            let result = prompt.request_line(suggestion.as_deref()).await;
            // The receiver lives as long as the shell.
            let _ = tx.send(PromptReply {
                window,
                purpose,
                result,
            });
        });
        self.pending_prompts.insert(window, task.abort_handle());
    }

    fn apply_prompt_reply(&mut self, reply: PromptReply) {
        let PromptReply {
            window,
            purpose,
            result,
        } = reply;
        self.pending_prompts.remove(&window);
        let Some(state) = self.windows.get_mut(&window) else {
            debug!(window = %window, "Prompt answered after window closed");
            return;
        };
        let line = match result {
            Ok(line) => line,
            Err(e) => {
                warn!(window = %window, error = %e, "Prompt failed, treating as no input");
                None
            }
        };
        match purpose {
            PromptPurpose::Navigate => {
                match resolve_navigation_target(line.as_deref(), &self.ctx.config.navigation) {
                    Some(uri) => {
                        info!(window = %window, uri = %uri, "Navigating");
                        state.view.load_uri(&uri);
                    }
                    None => debug!(window = %window, "Navigation cancelled"),
                }
            }
            PromptPurpose::Search => match line {
                Some(text) if !text.is_empty() => {
                    debug!(window = %window, text = %text, "Searching page");
                    state.view.find(&text, FindOptions::default());
                }
                _ => debug!(window = %window, "Search cancelled"),
            },
        }
    }

    fn on_load_changed(&mut self, window: WindowId, event: LoadEvent) {
        let Some(state) = self.windows.get_mut(&window) else {
            warn!(window = %window, "Load event for unknown window ignored");
            return;
        };
        let title = state.titles.on_load_changed(
            &self.ctx.config.app_name,
            event,
            state.view.estimated_load_progress(),
            state.view.title().as_deref(),
        );
        self.engine.set_window_title(window, &title);
        state.title = Some(title);
    }

    fn on_mouse_target_changed(&mut self, window: WindowId, link_uri: Option<&str>) {
        let Some(state) = self.windows.get_mut(&window) else {
            warn!(window = %window, "Mouse-target event for unknown window ignored");
            return;
        };
        let change = state.titles.on_mouse_target_changed(
            &self.ctx.config.app_name,
            link_uri,
            state.title.as_deref(),
        );
        if let Some(title) = change {
            self.engine.set_window_title(window, &title);
            state.title = Some(title);
        }
    }

    fn on_download(&mut self, id: DownloadId, event: DownloadEvent) {
        for effect in self.downloads.handle(id, event) {
            match effect {
                DownloadEffect::SetDestination { id, path, uri } => {
                    debug!(download = %id, path = %path.display(), "Setting download destination");
                    self.engine.set_download_destination(id, &uri);
                }
                DownloadEffect::Notify(notice) => log_download_notice(&notice),
            }
        }
    }
}

fn log_download_notice(notice: &DownloadNotice) {
    match notice {
        DownloadNotice::Started {
            id,
            suggested_filename,
            destination,
        } => info!(
            download = %id,
            suggested = %suggested_filename,
            destination = %destination.display(),
            "Download started"
        ),
        DownloadNotice::Progress {
            id,
            received_bytes,
            estimated_progress,
        } => debug!(
            download = %id,
            received_bytes,
            "Download progress {:.0}%",
            estimated_progress * 100.0
        ),
        DownloadNotice::Finished { id, destination } => info!(
            download = %id,
            destination = %destination.display(),
            "Download finished"
        ),
        DownloadNotice::Failed {
            id,
            destination,
            message,
        } => warn!(
            download = %id,
            destination = %destination.display(),
            error = %message,
            "Download failed"
        ),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ShellConfig;
    use crate::engine::HeadlessEngine;
    use crate::paths::PathBundle;
    use crate::prompt::{PromptError, ScriptedLineSource};
    use std::path::Path;

    fn shell_with(replies: Vec<Option<&str>>) -> (Shell<HeadlessEngine>, Arc<ScriptedLineSource>) {
        let paths = PathBundle::for_app(
            Path::new("/home/u"),
            Path::new("/home/u/.config"),
            Path::new("/home/u/.cache"),
            "keyshell",
        );
        let ctx = AppContext::new(ShellConfig::default(), paths);
        let source = Arc::new(ScriptedLineSource::new(replies));
        let shell = Shell::new(ctx, HeadlessEngine::new(), source.clone());
        (shell, source)
    }

    fn ctrl(c: char) -> (Modifiers, Key) {
        (Modifiers::CONTROL, Key::from_char(c))
    }

    #[tokio::test]
    async fn test_start_configures_context_and_shows_window() {
        let (mut shell, _) = shell_with(vec![]);
        let id = shell.start(Some("https://example.com"));

        assert!(shell.engine().context().is_some());
        assert!(shell.engine().window(id).unwrap().shown);
        assert_eq!(shell.view(id).unwrap().uri().as_deref(), Some("https://example.com"));
        assert_eq!(shell.live_windows(), 1);
    }

    #[tokio::test]
    async fn test_navigate_prompt_loads_resolved_uri() {
        let (mut shell, source) = shell_with(vec![Some("example.com")]);
        let id = shell.start(Some("https://start.test"));
        let (mods, key) = ctrl('l');

        assert_eq!(shell.handle_key(id, mods, key), Some(LoopControl::Continue));
        shell.settle().await;

        assert_eq!(shell.view(id).unwrap().uri().as_deref(), Some("https://example.com"));
        assert_eq!(source.suggestions(), vec![Some("https://start.test".to_string())]);
    }

    #[tokio::test]
    async fn test_empty_prompt_answer_does_nothing() {
        let (mut shell, _) = shell_with(vec![None]);
        let id = shell.start(Some("https://start.test"));
        let (mods, key) = ctrl('l');
        shell.handle_key(id, mods, key);
        shell.settle().await;
        assert_eq!(shell.view(id).unwrap().history().len(), 1);
    }

    #[tokio::test]
    async fn test_second_prompt_while_pending_is_ignored() {
        let (mut shell, source) = shell_with(vec![Some("a.test"), Some("b.test")]);
        let id = shell.start(None);
        let (mods, key) = ctrl('l');
        shell.handle_key(id, mods, key);
        shell.handle_key(id, mods, key);
        shell.settle().await;

        assert_eq!(source.suggestions().len(), 1);
        assert_eq!(shell.view(id).unwrap().uri().as_deref(), Some("https://a.test"));
    }

    #[tokio::test]
    async fn test_search_prompt_runs_find() {
        let (mut shell, _) = shell_with(vec![Some("needle")]);
        let id = shell.start(None);
        let (mods, key) = ctrl('f');
        shell.handle_key(id, mods, key);
        shell.settle().await;

        let (mods, key) = ctrl('n');
        shell.handle_key(id, mods, key);

        assert_eq!(
            shell.view(id).unwrap().find_calls(),
            &[
                crate::engine::FindCall::Search("needle".to_string()),
                crate::engine::FindCall::Next
            ]
        );
    }

    #[tokio::test]
    async fn test_unbound_key_is_unhandled() {
        let (mut shell, _) = shell_with(vec![]);
        let id = shell.start(None);
        assert_eq!(shell.handle_key(id, Modifiers::NONE, Key::from_char('l')), None);
        assert_eq!(
            shell.handle_key(id, Modifiers::CONTROL | Modifiers::SHIFT, Key::from_char('l')),
            None
        );
    }

    #[tokio::test]
    async fn test_zoom_commands_step_and_reset() {
        let (mut shell, _) = shell_with(vec![]);
        let id = shell.start(None);
        let (mods, plus) = ctrl('=');
        shell.handle_key(id, mods, plus);
        shell.handle_key(id, mods, plus);
        assert!((shell.view(id).unwrap().zoom_level() - 1.2).abs() < 1e-9);

        let (mods, reset) = ctrl('0');
        shell.handle_key(id, mods, reset);
        assert!((shell.view(id).unwrap().zoom_level() - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_exit_window_closes_and_quits_on_last() {
        let (mut shell, _) = shell_with(vec![]);
        let first = shell.start(None);
        shell.handle_event(ShellEvent::NewWindowRequested {
            url: "https://popup.test".to_string(),
        });
        let (mods, q) = ctrl('q');

        assert_eq!(shell.handle_key(first, mods, q), Some(LoopControl::Continue));
        assert!(shell.engine().window(first).unwrap().destroyed);
        let second = shell.snapshot()[0].id;
        assert_eq!(shell.handle_key(second, mods, q), Some(LoopControl::Quit));
        assert_eq!(shell.live_windows(), 0);
    }

    #[tokio::test]
    async fn test_closing_window_cancels_pending_prompt() {
        let (mut shell, _) = shell_with(vec![Some("late.test")]);
        let id = shell.start(None);
        let _other = shell.handle_event(ShellEvent::NewWindowRequested {
            url: "https://other.test".to_string(),
        });
        let (mods, key) = ctrl('l');
        shell.handle_key(id, mods, key);
        assert!(shell.has_pending_prompt(id));

        shell.handle_event(ShellEvent::CloseRequested { window: id });
        assert!(!shell.has_pending_prompt(id));
        shell.settle().await;
        assert!(shell.view(id).is_none());
    }

    #[tokio::test]
    async fn test_prompt_error_is_treated_as_no_input() {
        struct Failing;
        #[async_trait::async_trait]
        impl LineSource for Failing {
            async fn request_line(&self, _: Option<&str>) -> Result<Option<String>, PromptError> {
                Err(PromptError::EmptyCommand)
            }
        }
        let paths = PathBundle::for_app(
            Path::new("/h"),
            Path::new("/h/.config"),
            Path::new("/h/.cache"),
            "keyshell",
        );
        let mut shell = Shell::new(
            AppContext::new(ShellConfig::default(), paths),
            HeadlessEngine::new(),
            Arc::new(Failing),
        );
        let id = shell.start(Some("https://stay.test"));
        let (mods, key) = ctrl('l');
        shell.handle_key(id, mods, key);
        shell.settle().await;
        assert_eq!(shell.view(id).unwrap().uri().as_deref(), Some("https://stay.test"));
        assert_eq!(shell.live_windows(), 1);
    }

    #[tokio::test]
    async fn test_load_and_hover_update_title() {
        let (mut shell, _) = shell_with(vec![]);
        let id = shell.start(Some("https://page.test"));
        shell.handle_event(ShellEvent::LoadChanged {
            window: id,
            event: LoadEvent::Finished,
        });
        assert_eq!(
            shell.engine().window(id).unwrap().title.as_deref(),
            Some("keyshell | https://page.test")
        );

        shell.handle_event(ShellEvent::MouseTargetChanged {
            window: id,
            link_uri: Some("https://link.test".to_string()),
        });
        assert_eq!(
            shell.engine().window(id).unwrap().title.as_deref(),
            Some("keyshell | https://link.test")
        );

        shell.handle_event(ShellEvent::MouseTargetChanged {
            window: id,
            link_uri: None,
        });
        assert_eq!(
            shell.engine().window(id).unwrap().title.as_deref(),
            Some("keyshell | https://page.test")
        );
    }

    #[tokio::test]
    async fn test_hover_before_first_load_keeps_link_title_on_leave() {
        let (mut shell, _) = shell_with(vec![]);
        let id = shell.start(None);
        shell.handle_event(ShellEvent::MouseTargetChanged {
            window: id,
            link_uri: Some("https://link.test".to_string()),
        });
        shell.handle_event(ShellEvent::MouseTargetChanged {
            window: id,
            link_uri: None,
        });
        assert_eq!(
            shell.engine().window(id).unwrap().title.as_deref(),
            Some("keyshell | https://link.test")
        );
    }

    #[tokio::test]
    async fn test_web_extension_user_data_increments() {
        let (mut shell, _) = shell_with(vec![]);
        shell.start(None);
        shell.handle_event(ShellEvent::InitializeWebExtensions);
        shell.handle_event(ShellEvent::InitializeWebExtensions);
        let inits = shell.engine().extension_inits();
        assert_eq!(inits.len(), 2);
        assert_eq!(inits[0].1, 0);
        assert_eq!(inits[1].1, 1);
        assert_eq!(inits[0].0, Path::new("/home/u/.config/keyshell/extensions"));
    }

    #[tokio::test]
    async fn test_run_ends_when_last_window_closes() {
        let (mut shell, _) = shell_with(vec![]);
        let id = shell.start(None);
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(ShellEvent::CloseRequested { window: id }).unwrap();
        assert_eq!(shell.run(&mut rx).await, RunOutcome::AllWindowsClosed);
    }

    #[tokio::test]
    async fn test_run_returns_when_event_source_closes() {
        let (mut shell, _) = shell_with(vec![]);
        shell.start(None);
        let (tx, mut rx) = mpsc::unbounded_channel::<ShellEvent>();
        drop(tx);
        assert_eq!(shell.run(&mut rx).await, RunOutcome::EventSourceClosed);
    }
}

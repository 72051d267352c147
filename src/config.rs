//! Shell configuration with documented defaults.
//!
//! Everything here is fixed for the lifetime of the process. The binary
//! layers a config file and CLI flags over [`ShellConfig::default`].

use std::path::PathBuf;
use std::time::Duration;

use crate::engine::ViewSettings;
use crate::keys::KeyBindings;
use crate::navigation::{DEFAULT_SCHEME, NavigationPolicy};
use crate::zoom::DEFAULT_ZOOM_STEP;

/// Application name used in window titles and per-user paths.
pub const APP_NAME: &str = "keyshell";

/// Default prompt program.
pub const DEFAULT_INPUT_COMMAND: &str = "dmenu";

/// Default cap on engine web processes.
pub const DEFAULT_WEB_PROCESS_COUNT_LIMIT: u32 = 4;

#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Name shown in titles and used for the per-user directories.
    pub app_name: String,
    /// Prompt program and its arguments.
    pub input_command: Vec<String>,
    /// Give up on the prompt program after this long. `None` waits forever.
    pub prompt_timeout: Option<Duration>,
    pub navigation: NavigationPolicy,
    /// Step for zoom in/out.
    pub zoom_step: f64,
    /// Where downloads are saved. `None` means `<home>/Downloads`.
    pub downloads_dir: Option<PathBuf>,
    pub preferred_languages: Vec<String>,
    pub web_process_count_limit: u32,
    pub view: ViewSettings,
    pub bindings: KeyBindings,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            input_command: vec![DEFAULT_INPUT_COMMAND.to_string()],
            prompt_timeout: None,
            navigation: NavigationPolicy {
                default_scheme: DEFAULT_SCHEME.to_string(),
                supported_protocols: None,
            },
            zoom_step: DEFAULT_ZOOM_STEP,
            downloads_dir: None,
            preferred_languages: vec!["en-US".to_string(), "en".to_string()],
            web_process_count_limit: DEFAULT_WEB_PROCESS_COUNT_LIMIT,
            view: ViewSettings::default(),
            bindings: KeyBindings::default(),
        }
    }
}

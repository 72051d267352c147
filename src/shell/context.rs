//! Process-wide state owned by the shell.

use crate::config::ShellConfig;
use crate::engine::ContextSettings;
use crate::paths::PathBundle;

use super::windows::WindowRegistry;

/// Configuration, paths and window accounting for one shell instance.
///
/// Built once at startup and mutated only from the event loop.
#[derive(Debug)]
pub struct AppContext {
    pub config: ShellConfig,
    pub paths: PathBundle,
    pub windows: WindowRegistry,
    extension_generation: u32,
}

impl AppContext {
    /// `paths.downloads` is replaced by `config.downloads_dir` when set.
    #[must_use]
    pub fn new(config: ShellConfig, paths: PathBundle) -> Self {
        let paths = paths.with_downloads(config.downloads_dir.clone());
        Self {
            config,
            paths,
            windows: WindowRegistry::new(),
            extension_generation: 0,
        }
    }

    #[must_use]
    pub fn context_settings(&self) -> ContextSettings {
        ContextSettings::new(
            &self.paths,
            self.config.web_process_count_limit,
            self.config.preferred_languages.clone(),
        )
    }

    /// User data for the next web-extension initialisation: 0, 1, 2, ...
    pub fn next_extension_user_data(&mut self) -> u32 {
        let id = self.extension_generation;
        self.extension_generation = self.extension_generation.wrapping_add(1);
        id
    }
}

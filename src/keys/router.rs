//! Key-command routing: (modifiers, key) to a shell command.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::trace;

use super::{Key, Modifiers};

/// A bound shell action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Prompt for a URL and load it.
    Navigate,
    StopLoading,
    /// Prompt for a search term and start find-in-page.
    SearchStart,
    SearchNext,
    SearchPrevious,
    HistoryBack,
    HistoryForward,
    Reload,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    /// Close the focused window.
    ExitWindow,
}

impl Command {
    /// Every command, in table order.
    pub const ALL: [Self; 12] = [
        Self::Navigate,
        Self::StopLoading,
        Self::SearchStart,
        Self::SearchNext,
        Self::SearchPrevious,
        Self::HistoryBack,
        Self::HistoryForward,
        Self::Reload,
        Self::ZoomIn,
        Self::ZoomOut,
        Self::ZoomReset,
        Self::ExitWindow,
    ];

    /// Stable snake_case label, also used for `key_<label>` config entries.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Navigate => "navigate",
            Self::StopLoading => "stop_loading",
            Self::SearchStart => "search_start",
            Self::SearchNext => "search_next",
            Self::SearchPrevious => "search_previous",
            Self::HistoryBack => "history_back",
            Self::HistoryForward => "history_forward",
            Self::Reload => "reload",
            Self::ZoomIn => "zoom_in",
            Self::ZoomOut => "zoom_out",
            Self::ZoomReset => "zoom_reset",
            Self::ExitWindow => "exit_window",
        }
    }

    /// Default key under the command modifier.
    #[must_use]
    pub fn default_key(self) -> Key {
        let ch = match self {
            Self::Navigate => 'l',
            Self::StopLoading => '.',
            Self::SearchStart => 'f',
            Self::SearchNext => 'n',
            Self::SearchPrevious => 'p',
            Self::HistoryBack => '[',
            Self::HistoryForward => ']',
            Self::Reload => 'r',
            Self::ZoomIn => '=',
            Self::ZoomOut => '-',
            Self::ZoomReset => '0',
            Self::ExitWindow => 'q',
        };
        Key::from_char(ch)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.as_str() == s)
            .ok_or_else(|| format!("invalid command: {s}"))
    }
}

/// Errors building a binding table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindingError {
    #[error("key {key} is bound to both {first} and {second}")]
    DuplicateKey {
        key: Key,
        first: Command,
        second: Command,
    },
}

/// One-to-one table from key to command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    by_key: HashMap<Key, Command>,
}

impl KeyBindings {
    /// Builds a table, rejecting a key bound to two commands.
    ///
    /// A command listed twice keeps its last key.
    pub fn new(pairs: impl IntoIterator<Item = (Command, Key)>) -> Result<Self, BindingError> {
        let mut by_command: Vec<(Command, Key)> = Vec::new();
        for (command, key) in pairs {
            by_command.retain(|(existing, _)| *existing != command);
            by_command.push((command, key));
        }

        let mut by_key = HashMap::with_capacity(by_command.len());
        for (command, key) in by_command {
            if let Some(first) = by_key.insert(key, command) {
                return Err(BindingError::DuplicateKey {
                    key,
                    first,
                    second: command,
                });
            }
        }
        Ok(Self { by_key })
    }

    /// Returns the default bindings with some commands rebound.
    pub fn with_overrides(
        overrides: impl IntoIterator<Item = (Command, Key)>,
    ) -> Result<Self, BindingError> {
        Self::new(
            Command::ALL
                .into_iter()
                .map(|command| (command, command.default_key()))
                .chain(overrides),
        )
    }

    #[must_use]
    pub fn command_for(&self, key: Key) -> Option<Command> {
        self.by_key.get(&key).copied()
    }

    #[must_use]
    pub fn key_for(&self, command: Command) -> Option<Key> {
        self.by_key
            .iter()
            .find_map(|(key, bound)| (*bound == command).then_some(*key))
    }

    /// Bindings sorted in [`Command::ALL`] order.
    #[must_use]
    pub fn entries(&self) -> Vec<(Command, Key)> {
        Command::ALL
            .into_iter()
            .filter_map(|command| self.key_for(command).map(|key| (command, key)))
            .collect()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let by_key = Command::ALL
            .into_iter()
            .map(|command| (command.default_key(), command))
            .collect();
        Self { by_key }
    }
}

/// Routes key presses held with exactly the command modifier.
#[derive(Debug, Clone, Default)]
pub struct KeyRouter {
    bindings: KeyBindings,
}

impl KeyRouter {
    /// The only modifier set that selects a bound command.
    pub const COMMAND_MODIFIER: Modifiers = Modifiers::CONTROL;

    #[must_use]
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    #[must_use]
    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Looks up the command for a key press without running it.
    ///
    /// Lock modifiers are ignored; any other modifier beyond the command
    /// modifier means the press is not a shortcut.
    #[must_use]
    pub fn route(&self, modifiers: Modifiers, key: Key) -> Option<Command> {
        if modifiers.intersection(Modifiers::ACCELERATOR_MASK) != Self::COMMAND_MODIFIER {
            return None;
        }
        self.bindings.command_for(key)
    }

    /// Runs `handler` with the routed command. Returns whether the press was handled.
    pub fn dispatch(&self, modifiers: Modifiers, key: Key, handler: impl FnOnce(Command)) -> bool {
        match self.route(modifiers, key) {
            Some(command) => {
                trace!(%command, key = %key, "Key press routed");
                handler(command);
                true
            }
            None => false,
        }
    }
}

//! Keyshell Core Library
//!
//! A minimal keyboard-driven browser shell. The web engine does the browsing;
//! this library decides what the engine is told to do. Text entry is delegated
//! to an external prompt program, every command is a Control chord, and the
//! process ends when the last window closes.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`shell`] - Event loop, window registry, command execution
//! - [`keys`] - Key chords, bindings and the command router
//! - [`prompt`] - External line-input provider
//! - [`navigation`] - Turning typed text into a URI to load
//! - [`download`] - Destination naming and lifecycle tracking
//! - [`engine`] - Traits for the web engine plus a headless implementation
//! - [`zoom`], [`title`], [`paths`], [`config`] - Supporting pieces

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod engine;
pub mod keys;
pub mod navigation;
pub mod paths;
pub mod prompt;
pub mod shell;
pub mod title;
pub mod zoom;

// Re-export commonly used types
pub use config::{APP_NAME, ShellConfig};
pub use download::{
    DownloadEvent, DownloadId, DownloadTracker, destination_uri, resolve_destination,
};
pub use engine::{Engine, HeadlessEngine, WebView, WindowId};
pub use keys::{Command, Key, KeyBindings, KeyRouter, Modifiers, parse_chord};
pub use navigation::{NavigationPolicy, resolve_navigation_target};
pub use paths::{BaseDirs, PathBundle, PathError};
pub use prompt::{ExternalPrompt, LineSource, PromptError, ScriptedLineSource};
pub use shell::{AppContext, LoopControl, RunOutcome, Shell, ShellEvent, WindowSnapshot};
pub use zoom::{MAX_ZOOM, MIN_ZOOM, ZoomAction, apply_zoom};

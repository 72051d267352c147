//! Error types for the input prompt.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while asking the external prompt program for a line.
#[derive(Debug, Error)]
pub enum PromptError {
    /// No program configured.
    #[error("prompt command is empty")]
    EmptyCommand,

    /// The prompt program could not be started.
    #[error("failed to spawn prompt program {program}: {source}")]
    Spawn {
        /// Program name from the configured command line.
        program: String,
        /// The underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the suggestion or reading the reply failed.
    #[error("I/O error talking to prompt program {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A spawned child did not expose the requested pipe.
    #[error("prompt program {program} has no {pipe} pipe")]
    MissingPipe {
        program: String,
        pipe: &'static str,
    },

    /// No line arrived before the configured timeout.
    #[error("prompt program {program} gave no answer within {after:?}")]
    TimedOut { program: String, after: Duration },
}

impl PromptError {
    pub(crate) fn io(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            program: program.into(),
            source,
        }
    }
}

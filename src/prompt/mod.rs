//! Line input from the user, obtained out of process.
//!
//! The shell never draws its own text entry. Navigation and search ask a
//! [`LineSource`] for one line, seeded with a suggestion (the current URI or
//! search text). [`ExternalPrompt`] is the production source; it runs a
//! program such as `dmenu` and talks to it over pipes.
//!
//! # Architecture
//!
//! - [`LineSource`] - Async trait the shell prompts through
//! - [`ExternalPrompt`] - Child-process implementation
//! - [`ScriptedLineSource`] - Fixed answers, for adapters and tests

mod error;
mod external;

pub use error::PromptError;
pub use external::ExternalPrompt;

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

/// Something that can ask the user for one line of text.
#[async_trait]
pub trait LineSource: Send + Sync {
    /// Returns the user's line, trimmed, or `None` when no line was produced.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError`] when the source could not be reached.
    async fn request_line(&self, suggestion: Option<&str>) -> Result<Option<String>, PromptError>;
}

/// Answers prompts from a queue of canned replies and records suggestions.
///
/// An exhausted queue answers `None`.
#[derive(Debug, Default)]
pub struct ScriptedLineSource {
    replies: Mutex<VecDeque<Option<String>>>,
    suggestions: Mutex<Vec<Option<String>>>,
}

impl ScriptedLineSource {
    #[must_use]
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| r.map(Into::into)).collect()),
            suggestions: Mutex::new(Vec::new()),
        }
    }

    /// Suggestions received so far, in order.
    #[must_use]
    pub fn suggestions(&self) -> Vec<Option<String>> {
        self.suggestions
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LineSource for ScriptedLineSource {
    async fn request_line(&self, suggestion: Option<&str>) -> Result<Option<String>, PromptError> {
        if let Ok(mut seen) = self.suggestions.lock() {
            seen.push(suggestion.map(ToString::to_string));
        }
        let reply = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front())
            .flatten();
        Ok(reply.map(|line| line.trim().to_string()))
    }
}

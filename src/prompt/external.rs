//! External prompt program over stdin/stdout pipes.

use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::{debug, instrument};

use super::{LineSource, PromptError};

/// Runs a configured program to read one line of user text.
///
/// Protocol: the optional suggestion plus `\n` is written to the child's
/// stdin, stdin is closed, and the first stdout line is returned trimmed.
/// Stderr is inherited and the exit status is not inspected. Dropping the
/// request future kills the child.
#[derive(Debug, Clone)]
pub struct ExternalPrompt {
    argv: Vec<String>,
    timeout: Option<Duration>,
}

impl ExternalPrompt {
    #[must_use]
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv, timeout: None }
    }

    /// Gives up on the child after `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn exchange(&self, program: &str, suggestion: Option<&str>) -> Result<Option<String>, PromptError> {
        let mut child = Command::new(program)
            .args(&self.argv[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| PromptError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| PromptError::MissingPipe {
            program: program.to_string(),
            pipe: "stdin",
        })?;
        if let Some(suggestion) = suggestion {
            let written = async {
                stdin.write_all(suggestion.as_bytes()).await?;
                stdin.write_all(b"\n").await?;
                stdin.flush().await
            }
            .await;
            match written {
                Ok(()) => {}
                Err(err) if err.kind() == ErrorKind::BrokenPipe => {
                    debug!(program, "Prompt program closed stdin before reading suggestion");
                }
                Err(err) => return Err(PromptError::io(program, err)),
            }
        }
        drop(stdin);

        let stdout = child.stdout.take().ok_or_else(|| PromptError::MissingPipe {
            program: program.to_string(),
            pipe: "stdout",
        })?;
        let mut reader = BufReader::new(stdout);
        let mut line = String::new();
        let read = reader
            .read_line(&mut line)
            .await
            .map_err(|err| PromptError::io(program, err))?;

        if read == 0 {
            debug!(program, "Prompt program closed stdout without a line");
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

#[async_trait]
impl LineSource for ExternalPrompt {
    #[instrument(skip(self), fields(program = self.argv.first().map(String::as_str)))]
    async fn request_line(&self, suggestion: Option<&str>) -> Result<Option<String>, PromptError> {
        let Some(program) = self.argv.first() else {
            return Err(PromptError::EmptyCommand);
        };

        match self.timeout {
            Some(after) => tokio::time::timeout(after, self.exchange(program, suggestion))
                .await
                .map_err(|_| PromptError::TimedOut {
                    program: program.clone(),
                    after,
                })?,
            None => self.exchange(program, suggestion).await,
        }
    }
}

//! Prompt command handler: one round-trip with the prompt program.

use anyhow::{Context, Result};
use keyshell_core::{ExternalPrompt, LineSource, ShellConfig};
use tracing::debug;

use crate::cli::PromptArgs;

pub async fn run_prompt_command(args: &PromptArgs, shell: &ShellConfig) -> Result<()> {
    let prompt =
        ExternalPrompt::new(shell.input_command.clone()).with_timeout(shell.prompt_timeout);
    debug!(argv = ?prompt.argv(), timeout = ?prompt.timeout(), "Running prompt program");
    let line = prompt
        .request_line(args.suggestion.as_deref())
        .await
        .context("Prompt program failed")?;

    match line {
        Some(line) => println!("{line}"),
        None => debug!("Prompt returned no input"),
    }
    Ok(())
}

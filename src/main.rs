//! CLI entry point for keyshell.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod app;
mod app_config;
mod cli;
mod commands;

use app::{command_dispatcher, config_runtime, terminal};
use cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();

    let loaded_config = app_config::load_file_config(cli.global.config.as_deref())?;
    let effective =
        config_runtime::resolve_effective_config(&cli.global, loaded_config.config.as_ref())?;

    // Priority: -v/-q flags > RUST_LOG env var > config verbosity > default (info)
    terminal::init_tracing(
        config_runtime::resolve_default_log_level(effective.verbosity),
        config_runtime::should_force_cli_log_level(&cli.global),
        terminal::is_no_color_requested(&cli.global),
    );

    debug!(?cli, "CLI arguments parsed");
    debug!(
        config_path = ?loaded_config.path,
        loaded = loaded_config.loaded_from_file,
        "Configuration resolved"
    );

    command_dispatcher::dispatch(&cli, &loaded_config, &effective).await
}

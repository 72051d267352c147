//! CLI command routing: runs the selected subcommand with the effective config.

use anyhow::Result;

use crate::app::config_runtime::EffectiveConfig;
use crate::app_config::LoadedConfig;
use crate::cli::{Cli, Command, ConfigCommand};
use crate::commands;

pub(crate) async fn dispatch(
    cli: &Cli,
    loaded_config: &LoadedConfig,
    effective: &EffectiveConfig,
) -> Result<()> {
    let shell = &effective.shell;
    match &cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Show => commands::run_config_show_command(loaded_config, effective),
        },
        Command::Paths(args) => commands::run_paths_command(args, shell),
        Command::ResolveUrl(args) => commands::run_resolve_url_command(args, shell),
        Command::ResolveDestination(args) => {
            commands::run_resolve_destination_command(args, shell)
        }
        Command::Prompt(args) => commands::run_prompt_command(args, shell).await,
        Command::Simulate(args) => commands::run_simulate_command(args, shell).await,
    }
}

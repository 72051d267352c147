//! Paths command handler: show the per-user directory bundle.

use anyhow::{Context, Result};
use keyshell_core::{BaseDirs, PathBundle, ShellConfig};

use crate::cli::PathsArgs;

/// Builds the path bundle from the environment and the effective config.
pub fn resolve_path_bundle(shell: &ShellConfig) -> Result<PathBundle> {
    let base = BaseDirs::from_env().context("Failed to resolve per-user directories")?;
    Ok(PathBundle::new(&base, &shell.app_name).with_downloads(shell.downloads_dir.clone()))
}

pub fn run_paths_command(args: &PathsArgs, shell: &ShellConfig) -> Result<()> {
    let paths = resolve_path_bundle(shell)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
        return Ok(());
    }

    println!("extensions = {}", paths.extensions.display());
    println!("cache = {}", paths.cache.display());
    println!("data = {}", paths.data.display());
    println!("cookies = {}", paths.cookies.display());
    println!("downloads = {}", paths.downloads.display());
    Ok(())
}

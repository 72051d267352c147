//! Resolve command handlers: navigation targets and download destinations.

use anyhow::Result;
use keyshell_core::{ShellConfig, resolve_destination, resolve_navigation_target};
use tracing::debug;

use crate::cli::{ResolveDestinationArgs, ResolveUrlArgs};
use crate::commands::resolve_path_bundle;

pub fn run_resolve_url_command(args: &ResolveUrlArgs, shell: &ShellConfig) -> Result<()> {
    match resolve_navigation_target(Some(&args.text), &shell.navigation) {
        Some(uri) => println!("{uri}"),
        None => debug!("Blank input, nothing to navigate to"),
    }
    Ok(())
}

pub fn run_resolve_destination_command(
    args: &ResolveDestinationArgs,
    shell: &ShellConfig,
) -> Result<()> {
    let dir = match &args.dir {
        Some(dir) => dir.clone(),
        None => resolve_path_bundle(shell)?.downloads,
    };
    let destination = resolve_destination(&args.name, &dir);
    println!("{}", destination.display());
    Ok(())
}

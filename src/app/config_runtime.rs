//! Layering of library defaults, file config and CLI flags.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use keyshell_core::{KeyBindings, ShellConfig};

use crate::app_config::{FileConfig, VerbositySetting};
use crate::cli::GlobalArgs;

/// Effective settings after all layers are applied.
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub(crate) shell: ShellConfig,
    pub(crate) verbosity: VerbositySetting,
}

/// Builds the effective configuration. CLI flags win over the file, the file
/// wins over library defaults.
pub(crate) fn resolve_effective_config(
    args: &GlobalArgs,
    file_config: Option<&FileConfig>,
) -> Result<EffectiveConfig> {
    let mut shell = ShellConfig::default();
    let mut verbosity = VerbositySetting::Default;

    if let Some(file_config) = file_config {
        apply_file_config(&mut shell, file_config)?;
        if let Some(setting) = file_config.verbosity {
            verbosity = setting;
        }
    }

    if let Some(command) = &args.input_command {
        let argv: Vec<String> = command.split_whitespace().map(str::to_string).collect();
        if argv.is_empty() {
            bail!("--input-command must name a program");
        }
        shell.input_command = argv;
    }
    if let Some(dir) = &args.downloads_dir {
        shell.downloads_dir = Some(dir.clone());
    }
    if should_force_cli_log_level(args) {
        verbosity = cli_verbosity(args.verbose, args.quiet);
    }

    Ok(EffectiveConfig { shell, verbosity })
}

fn apply_file_config(shell: &mut ShellConfig, file_config: &FileConfig) -> Result<()> {
    if let Some(command) = &file_config.input_command {
        shell.input_command.clone_from(command);
    }
    if let Some(secs) = file_config.prompt_timeout_secs {
        shell.prompt_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    if let Some(scheme) = &file_config.default_scheme {
        shell.navigation.default_scheme.clone_from(scheme);
    }
    if let Some(protocols) = &file_config.supported_protocols {
        shell.navigation.supported_protocols = Some(protocols.clone());
    }
    if let Some(step) = file_config.zoom_step {
        shell.zoom_step = step;
    }
    if let Some(dir) = &file_config.downloads_dir {
        shell.downloads_dir = Some(dir.clone());
    }
    if let Some(languages) = &file_config.preferred_languages {
        shell.preferred_languages.clone_from(languages);
    }
    if let Some(limit) = file_config.web_process_count_limit {
        shell.web_process_count_limit = limit;
    }

    let view = &mut shell.view;
    if let Some(value) = &file_config.default_charset {
        view.default_charset.clone_from(value);
    }
    if let Some(value) = &file_config.default_font_family {
        view.default_font_family.clone_from(value);
    }
    if let Some(value) = &file_config.monospace_font_family {
        view.monospace_font_family.clone_from(value);
    }
    if let Some(value) = &file_config.sans_serif_font_family {
        view.sans_serif_font_family.clone_from(value);
    }
    if let Some(value) = &file_config.serif_font_family {
        view.serif_font_family.clone_from(value);
    }
    if let Some(value) = file_config.default_font_size {
        view.default_font_size = value;
    }
    if let Some(value) = file_config.default_monospace_font_size {
        view.default_monospace_font_size = value;
    }
    if let Some(value) = file_config.minimum_font_size {
        view.minimum_font_size = value;
    }

    if !file_config.key_overrides.is_empty() {
        shell.bindings = KeyBindings::with_overrides(file_config.key_overrides.iter().copied())
            .context("Invalid key bindings")?;
    }
    Ok(())
}

pub(crate) fn resolve_default_log_level(verbosity: VerbositySetting) -> &'static str {
    match verbosity {
        VerbositySetting::Quiet => "error",
        VerbositySetting::Default => "info",
        VerbositySetting::Verbose => "debug",
        VerbositySetting::Debug => "trace",
    }
}

pub(crate) fn should_force_cli_log_level(args: &GlobalArgs) -> bool {
    args.verbose > 0 || args.quiet
}

fn cli_verbosity(verbose: u8, quiet: bool) -> VerbositySetting {
    if quiet {
        VerbositySetting::Quiet
    } else {
        match verbose {
            0 => VerbositySetting::Default,
            1 => VerbositySetting::Verbose,
            _ => VerbositySetting::Debug,
        }
    }
}

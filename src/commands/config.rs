//! Config command handlers: show effective configuration.

use anyhow::Result;
use keyshell_core::navigation::FALLBACK_PROTOCOLS;

use crate::app::config_runtime::EffectiveConfig;
use crate::app_config::LoadedConfig;
use crate::commands::resolve_path_bundle;

pub fn run_config_show_command(loaded_config: &LoadedConfig, effective: &EffectiveConfig) -> Result<()> {
    let shell = &effective.shell;

    let resolved_path = loaded_config.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    println!("config_path = {resolved_path}");
    println!(
        "config_file = {}",
        if loaded_config.loaded_from_file {
            "loaded"
        } else {
            "not found (using defaults)"
        }
    );
    println!("input_command = {:?}", shell.input_command);
    println!(
        "prompt_timeout_secs = {}",
        shell.prompt_timeout.map_or(0, |timeout| timeout.as_secs())
    );
    println!("default_scheme = {}", shell.navigation.default_scheme);
    match &shell.navigation.supported_protocols {
        Some(protocols) => println!("supported_protocols = {protocols:?}"),
        None => println!("supported_protocols = {FALLBACK_PROTOCOLS:?}"),
    }
    println!("zoom_step = {}", shell.zoom_step);
    let downloads_dir = resolve_path_bundle(shell).map_or_else(
        |_| "<unresolved>".to_string(),
        |paths| paths.downloads.display().to_string(),
    );
    println!("downloads_dir = {downloads_dir}");
    println!("preferred_languages = {:?}", shell.preferred_languages);
    println!("web_process_count_limit = {}", shell.web_process_count_limit);

    let view = &shell.view;
    println!("default_charset = {}", view.default_charset);
    println!("default_font_family = {}", view.default_font_family);
    println!("monospace_font_family = {}", view.monospace_font_family);
    println!("sans_serif_font_family = {}", view.sans_serif_font_family);
    println!("serif_font_family = {}", view.serif_font_family);
    println!("default_font_size = {}", view.default_font_size);
    println!("default_monospace_font_size = {}", view.default_monospace_font_size);
    println!("minimum_font_size = {}", view.minimum_font_size);
    println!("verbosity = {}", effective.verbosity.as_str());

    for (command, key) in shell.bindings.entries() {
        println!("key_{command} = {key}");
    }

    Ok(())
}

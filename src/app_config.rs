//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use keyshell_core::{APP_NAME, Command, Key, KeyBindings};

/// Longest prompt timeout accepted from the file, in seconds.
const MAX_PROMPT_TIMEOUT_SECS: u64 = 3600;

/// File configuration for shell defaults. Every field is optional; unset
/// fields fall back to the library defaults.
#[derive(Debug, Clone, Default)]
pub struct FileConfig {
    /// Prompt program and arguments.
    pub input_command: Option<Vec<String>>,
    /// Prompt timeout in seconds; 0 disables the timeout.
    pub prompt_timeout_secs: Option<u64>,
    pub default_scheme: Option<String>,
    /// Schemes that navigate verbatim.
    pub supported_protocols: Option<Vec<String>>,
    pub zoom_step: Option<f64>,
    pub downloads_dir: Option<PathBuf>,
    pub preferred_languages: Option<Vec<String>>,
    pub web_process_count_limit: Option<u32>,
    pub default_charset: Option<String>,
    pub default_font_family: Option<String>,
    pub monospace_font_family: Option<String>,
    pub sans_serif_font_family: Option<String>,
    pub serif_font_family: Option<String>,
    pub default_font_size: Option<u32>,
    pub default_monospace_font_size: Option<u32>,
    pub minimum_font_size: Option<u32>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
    /// `key_<command>` rebinds, in file order.
    pub key_overrides: Vec<(Command, Key)>,
}

impl FileConfig {
    /// Validates config values against runtime constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(command) = &self.input_command
            && command.first().is_none_or(|program| program.trim().is_empty())
        {
            bail!("Invalid config value for `input_command`: expected a non-empty program name");
        }

        if let Some(secs) = self.prompt_timeout_secs
            && secs > MAX_PROMPT_TIMEOUT_SECS
        {
            bail!(
                "Invalid config value for `prompt_timeout_secs`: {secs}. Expected range: 0..={MAX_PROMPT_TIMEOUT_SECS}"
            );
        }

        if let Some(scheme) = &self.default_scheme {
            validate_scheme("default_scheme", scheme)?;
        }
        if let Some(protocols) = &self.supported_protocols {
            for scheme in protocols {
                validate_scheme("supported_protocols", scheme)?;
            }
        }

        if let Some(step) = self.zoom_step
            && !(step > 0.0 && step <= 1.0)
        {
            bail!("Invalid config value for `zoom_step`: {step}. Expected range: 0 < step <= 1");
        }

        if let Some(limit) = self.web_process_count_limit
            && !(1..=64).contains(&limit)
        {
            bail!(
                "Invalid config value for `web_process_count_limit`: {limit}. Expected range: 1..=64"
            );
        }

        validate_font_size("default_font_size", self.default_font_size)?;
        validate_font_size("default_monospace_font_size", self.default_monospace_font_size)?;
        validate_font_size("minimum_font_size", self.minimum_font_size)?;

        KeyBindings::with_overrides(self.key_overrides.iter().copied())
            .context("Invalid key bindings")?;

        Ok(())
    }
}

fn validate_scheme(field: &str, scheme: &str) -> Result<()> {
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid {
        bail!("Invalid config value for `{field}`: '{scheme}' is not a URI scheme");
    }
    Ok(())
}

fn validate_font_size(field: &str, value: Option<u32>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if value > 256 {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 0..=256");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
    /// Indicates whether configuration was loaded from disk.
    pub loaded_from_file: bool,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/keyshell/config.toml`
/// 2. `$HOME/.config/keyshell/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join(APP_NAME)
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(APP_NAME)
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from `explicit_path`, or from the default path if present.
///
/// An explicit path must exist; a missing default file means defaults.
pub fn load_file_config(explicit_path: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit_path {
        if !path.exists() {
            bail!("Config file '{}' does not exist", path.display());
        }
        let config = read_file_config(path)?;
        return Ok(LoadedConfig {
            path: Some(path.to_path_buf()),
            config: Some(config),
            loaded_from_file: true,
        });
    }

    let path = resolve_default_config_path();
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    };

    if !path_ref.exists() {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    }

    let config = read_file_config(path_ref)?;
    Ok(LoadedConfig {
        path,
        config: Some(config),
        loaded_from_file: true,
    })
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!(
                "Invalid config syntax on line {}: expected key = value",
                line_index + 1
            );
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let line_no = line_index + 1;
        let invalid = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "input_command" => {
                cfg.input_command = Some(parse_string_array(value).with_context(invalid)?);
            }
            "prompt_timeout_secs" => {
                cfg.prompt_timeout_secs = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "default_scheme" => {
                cfg.default_scheme = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "supported_protocols" => {
                cfg.supported_protocols = Some(parse_string_array(value).with_context(invalid)?);
            }
            "zoom_step" => {
                cfg.zoom_step = Some(parse_float(value).with_context(invalid)?);
            }
            "downloads_dir" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.downloads_dir = Some(PathBuf::from(parsed));
            }
            "preferred_languages" => {
                cfg.preferred_languages = Some(parse_string_array(value).with_context(invalid)?);
            }
            "web_process_count_limit" => {
                cfg.web_process_count_limit = Some(parse_integer_u32(value).with_context(invalid)?);
            }
            "default_charset" => {
                cfg.default_charset = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "default_font_family" => {
                cfg.default_font_family = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "monospace_font_family" => {
                cfg.monospace_font_family = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "sans_serif_font_family" => {
                cfg.sans_serif_font_family =
                    Some(parse_string_literal(value).with_context(invalid)?);
            }
            "serif_font_family" => {
                cfg.serif_font_family = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "default_font_size" => {
                cfg.default_font_size = Some(parse_integer_u32(value).with_context(invalid)?);
            }
            "default_monospace_font_size" => {
                cfg.default_monospace_font_size =
                    Some(parse_integer_u32(value).with_context(invalid)?);
            }
            "minimum_font_size" => {
                cfg.minimum_font_size = Some(parse_integer_u32(value).with_context(invalid)?);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_no}")
                })?);
            }
            other => {
                let Some(command) = other
                    .strip_prefix("key_")
                    .and_then(|name| Command::from_str(name).ok())
                else {
                    bail!("Unknown configuration key: '{other}' on line {line_no}");
                };
                let parsed = parse_string_literal(value).with_context(invalid)?;
                let bound = Key::from_name(&parsed).with_context(invalid)?;
                cfg.key_overrides.push((command, bound));
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

/// Parses `["a", "b"]`. Commas inside strings are kept.
fn parse_string_array(raw_value: &str) -> Result<Vec<String>> {
    let Some(inner) = raw_value
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    else {
        bail!("Expected array of double-quoted strings");
    };

    let mut items = Vec::new();
    let mut in_string = false;
    let mut start = 0;
    for (index, ch) in inner.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            ',' if !in_string => {
                items.push(parse_string_literal(inner[start..index].trim())?);
                start = index + 1;
            }
            _ => {}
        }
    }
    let last = inner[start..].trim();
    if !last.is_empty() {
        items.push(parse_string_literal(last)?);
    } else if !items.is_empty() {
        bail!("Trailing comma in array");
    }
    Ok(items)
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_integer_u32(raw_value: &str) -> Result<u32> {
    let value = parse_integer_u64(raw_value)?;
    u32::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u32"))
}

fn parse_float(raw_value: &str) -> Result<f64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected number");
    }
    let value = token.parse::<f64>()?;
    if !value.is_finite() {
        bail!("Expected finite number");
    }
    Ok(value)
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

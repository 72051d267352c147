//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Keyboard-driven browser shell.
///
/// Keyshell routes Control chords to browser commands, asks an external
/// prompt program (dmenu by default) for URLs and search terms, and names
/// downloads without overwriting existing files.
#[derive(Parser, Debug)]
#[command(name = "keyshell")]
#[command(author, version, about, arg_required_else_help = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options accepted by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored log output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Read configuration from PATH instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Prompt program and arguments, split on whitespace (e.g. "dmenu -i")
    #[arg(long, global = true, value_name = "COMMAND")]
    pub input_command: Option<String>,

    /// Directory downloads are saved to
    #[arg(long, global = true, value_name = "DIR")]
    pub downloads_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Show the per-user directories handed to the engine
    Paths(PathsArgs),
    /// Print the URI a typed navigation request would load
    ResolveUrl(ResolveUrlArgs),
    /// Print where a download with the given name would be saved
    ResolveDestination(ResolveDestinationArgs),
    /// Run the prompt program once and print the line it returns
    Prompt(PromptArgs),
    /// Drive the shell on the headless engine from an event script
    Simulate(SimulateArgs),
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
}

#[derive(Args, Debug, Clone)]
pub struct PathsArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ResolveUrlArgs {
    /// Text as typed into the prompt
    pub text: String,
}

#[derive(Args, Debug, Clone)]
pub struct ResolveDestinationArgs {
    /// Suggested file name
    pub name: String,

    /// Target directory (defaults to the downloads directory)
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct PromptArgs {
    /// Text pre-filled into the prompt
    #[arg(long, value_name = "TEXT")]
    pub suggestion: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Event script (reads stdin when omitted or "-")
    pub script: Option<PathBuf>,

    /// URI loaded into the first window
    #[arg(long, value_name = "URI")]
    pub start_url: Option<String>,

    /// Answer for the next prompt, in order (repeatable)
    #[arg(long = "reply", value_name = "TEXT")]
    pub replies: Vec<String>,

    /// Ask the configured prompt program instead of using --reply answers
    #[arg(long, conflicts_with = "replies")]
    pub external_prompt: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_subcommand() {
        let result = Cli::try_parse_from(["keyshell"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let cli = Cli::try_parse_from(["keyshell", "-v", "paths"]).unwrap();
        assert_eq!(cli.global.verbose, 1);

        let cli = Cli::try_parse_from(["keyshell", "paths", "-vv"]).unwrap();
        assert_eq!(cli.global.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["keyshell", "-q", "-v", "paths"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_global_overrides_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "keyshell",
            "prompt",
            "--input-command",
            "dmenu -i",
            "--downloads-dir",
            "/tmp/dl",
            "--suggestion",
            "https://example.com",
        ])
        .unwrap();
        assert_eq!(cli.global.input_command.as_deref(), Some("dmenu -i"));
        assert_eq!(cli.global.downloads_dir, Some(PathBuf::from("/tmp/dl")));
        match cli.command {
            Command::Prompt(args) => {
                assert_eq!(args.suggestion.as_deref(), Some("https://example.com"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_config_show_parses() {
        let cli = Cli::try_parse_from(["keyshell", "--config", "/etc/ks.toml", "config", "show"])
            .unwrap();
        assert_eq!(cli.global.config, Some(PathBuf::from("/etc/ks.toml")));
        assert!(matches!(
            cli.command,
            Command::Config {
                command: ConfigCommand::Show
            }
        ));
    }

    #[test]
    fn test_cli_simulate_collects_replies() {
        let cli = Cli::try_parse_from([
            "keyshell",
            "simulate",
            "script.txt",
            "--reply",
            "example.com",
            "--reply",
            "needle",
            "--json",
        ])
        .unwrap();
        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(args.script, Some(PathBuf::from("script.txt")));
        assert_eq!(args.replies, vec!["example.com", "needle"]);
        assert!(args.json);
        assert!(!args.external_prompt);
    }

    #[test]
    fn test_cli_simulate_external_prompt_conflicts_with_replies() {
        let result = Cli::try_parse_from([
            "keyshell",
            "simulate",
            "--external-prompt",
            "--reply",
            "x",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Cli::try_parse_from(["keyshell", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Cli::try_parse_from(["keyshell", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}

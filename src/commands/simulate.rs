//! Simulate command handler: drive the shell on the headless engine.
//!
//! The script has one event per line; blank lines and `#` comments are
//! skipped. Windows are numbered from 1 in opening order, the start window
//! being 1.
//!
//! ```text
//! key <window> <chord>                      key 1 ctrl+l
//! close <window>
//! new-window <uri>
//! ready <window>
//! load <window> started|redirected|committed|finished
//! hover <window> [<uri>]                    no uri leaves the link
//! extensions
//! download <id> started <file name>
//! download <id> progress <bytes> <fraction>
//! download <id> finished
//! download <id> failed <message>
//! ```
//!
//! Each line runs to completion, including any prompt it opens. Lines after
//! the last window closes are ignored.

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use keyshell_core::download::{DownloadEvent, DownloadId};
use keyshell_core::title::LoadEvent;
use keyshell_core::{
    AppContext, ExternalPrompt, HeadlessEngine, LineSource, LoopControl, PathBundle,
    ScriptedLineSource, Shell, ShellConfig, ShellEvent, WindowId, WindowSnapshot, parse_chord,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cli::SimulateArgs;
use crate::commands::resolve_path_bundle;

/// Final state after a script has run.
#[derive(Debug, Serialize)]
pub(crate) struct SimulationSummary {
    pub(crate) windows: Vec<WindowSnapshot>,
    pub(crate) live_windows: usize,
    pub(crate) exited: bool,
    pub(crate) downloads: DownloadSummary,
}

#[derive(Debug, Serialize)]
pub(crate) struct DownloadSummary {
    pub(crate) active: usize,
    pub(crate) finished: usize,
    pub(crate) failed: usize,
    /// Destination URIs handed to the engine, in order.
    pub(crate) destinations: Vec<String>,
}

pub async fn run_simulate_command(args: &SimulateArgs, shell: &ShellConfig) -> Result<()> {
    let script = read_script(args.script.as_deref())?;
    let events = parse_script(&script)?;
    let paths = resolve_path_bundle(shell)?;

    let prompt: Arc<dyn LineSource> = if args.external_prompt {
        Arc::new(ExternalPrompt::new(shell.input_command.clone()).with_timeout(shell.prompt_timeout))
    } else {
        Arc::new(ScriptedLineSource::new(
            args.replies.iter().map(|reply| Some(reply.as_str())),
        ))
    };

    let summary = simulate(
        shell.clone(),
        paths,
        prompt,
        args.start_url.as_deref(),
        events,
    )
    .await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn read_script(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read script '{}'", path.display())),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read script from stdin")?;
            Ok(buffer)
        }
    }
}

pub(crate) async fn simulate(
    config: ShellConfig,
    paths: PathBundle,
    prompt: Arc<dyn LineSource>,
    start_url: Option<&str>,
    events: Vec<(usize, ShellEvent)>,
) -> SimulationSummary {
    let mut shell = Shell::new(AppContext::new(config, paths), HeadlessEngine::new(), prompt);
    shell.start(start_url);

    let mut exited = false;
    for (line, event) in events {
        if exited {
            warn!(line, "Ignoring event after the last window closed");
            continue;
        }
        debug!(line, ?event, "Replaying event");
        let control = shell.handle_event(event);
        shell.settle().await;
        if control == LoopControl::Quit {
            info!(line, "Last window closed");
            exited = true;
        }
    }

    let downloads = shell.downloads();
    SimulationSummary {
        windows: shell.snapshot(),
        live_windows: shell.live_windows(),
        exited,
        downloads: DownloadSummary {
            active: downloads.active_count(),
            finished: downloads.finished_count(),
            failed: downloads.failed_count(),
            destinations: shell
                .engine()
                .destinations()
                .iter()
                .map(|(_, uri)| uri.clone())
                .collect(),
        },
    }
}

fn print_summary(summary: &SimulationSummary) {
    for window in &summary.windows {
        println!(
            "window {}: uri={} zoom={:.2} title={}",
            window.id,
            window.uri.as_deref().unwrap_or("-"),
            window.zoom_level,
            window.title.as_deref().unwrap_or("-"),
        );
    }
    println!("live_windows = {}", summary.live_windows);
    println!("exited = {}", summary.exited);
    println!("downloads_active = {}", summary.downloads.active);
    println!("downloads_finished = {}", summary.downloads.finished);
    println!("downloads_failed = {}", summary.downloads.failed);
    for uri in &summary.downloads.destinations {
        println!("destination = {uri}");
    }
}

/// Parses a whole script, reporting the first bad line.
pub(crate) fn parse_script(raw: &str) -> Result<Vec<(usize, ShellEvent)>> {
    let mut events = Vec::new();
    for (line_index, line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        if let Some(event) = parse_script_line(line)
            .with_context(|| format!("Invalid script line {line_no}: '{}'", line.trim()))?
        {
            events.push((line_no, event));
        }
    }
    Ok(events)
}

fn parse_script_line(line: &str) -> Result<Option<ShellEvent>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = split_word(line);
    let event = match verb {
        "key" => {
            let (window, chord) = split_word(rest);
            let (modifiers, key) = parse_chord(chord)?;
            ShellEvent::KeyPress {
                window: parse_window(window)?,
                modifiers,
                key,
            }
        }
        "close" => ShellEvent::CloseRequested {
            window: parse_window(rest)?,
        },
        "new-window" => {
            if rest.is_empty() {
                bail!("Expected a URI");
            }
            ShellEvent::NewWindowRequested {
                url: rest.to_string(),
            }
        }
        "ready" => ShellEvent::ReadyToShow {
            window: parse_window(rest)?,
        },
        "load" => {
            let (window, phase) = split_word(rest);
            ShellEvent::LoadChanged {
                window: parse_window(window)?,
                event: parse_load_event(phase)?,
            }
        }
        "hover" => {
            let (window, link) = split_word(rest);
            ShellEvent::MouseTargetChanged {
                window: parse_window(window)?,
                link_uri: (!link.is_empty()).then(|| link.to_string()),
            }
        }
        "extensions" => ShellEvent::InitializeWebExtensions,
        "download" => {
            let (id, rest) = split_word(rest);
            let id = DownloadId(id.parse().context("Expected a numeric download id")?);
            ShellEvent::Download {
                id,
                event: parse_download_event(rest)?,
            }
        }
        other => bail!("Unknown event '{other}'"),
    };
    Ok(Some(event))
}

fn split_word(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    }
}

fn parse_window(token: &str) -> Result<WindowId> {
    let id = token
        .trim()
        .parse::<u32>()
        .with_context(|| format!("Expected a window number, got '{token}'"))?;
    Ok(WindowId(id))
}

fn parse_load_event(token: &str) -> Result<LoadEvent> {
    match token {
        "started" => Ok(LoadEvent::Started),
        "redirected" => Ok(LoadEvent::Redirected),
        "committed" => Ok(LoadEvent::Committed),
        "finished" => Ok(LoadEvent::Finished),
        _ => bail!("Expected one of: started, redirected, committed, finished"),
    }
}

fn parse_download_event(text: &str) -> Result<DownloadEvent> {
    let (kind, rest) = split_word(text);
    match kind {
        "started" => {
            if rest.is_empty() {
                bail!("Expected a suggested file name");
            }
            Ok(DownloadEvent::Started {
                suggested_filename: rest.to_string(),
            })
        }
        "progress" => {
            let (bytes, fraction) = split_word(rest);
            let received_bytes = bytes.parse().context("Expected received byte count")?;
            let estimated_progress: f64 =
                fraction.parse().context("Expected progress fraction")?;
            if !(0.0..=1.0).contains(&estimated_progress) {
                bail!("Progress fraction must be within 0..=1");
            }
            Ok(DownloadEvent::ReceivedData {
                received_bytes,
                estimated_progress,
            })
        }
        "finished" => Ok(DownloadEvent::Finished),
        "failed" => Ok(DownloadEvent::Failed {
            message: rest.to_string(),
        }),
        _ => bail!("Expected one of: started, progress, finished, failed"),
    }
}

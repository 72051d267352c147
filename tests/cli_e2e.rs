//! End-to-end CLI tests for the keyshell binary.

// `Command::cargo_bin` is deprecated in assert_cmd >=2.0.17 in favor of
// `cargo::cargo_bin_cmd!` macro. Suppressed until migration to the new API.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn write_keyshell_config(config_home: &std::path::Path, contents: &str) {
    let config_dir = config_home.join("keyshell");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), contents).unwrap();
}

fn toml_path(path: &std::path::Path) -> String {
    path.to_string_lossy().replace('\\', "\\\\")
}

/// Command with HOME and XDG dirs pointed into `tempdir`.
fn keyshell(tempdir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("keyshell").unwrap();
    cmd.env("HOME", tempdir.path().join("home"))
        .env("XDG_CONFIG_HOME", tempdir.path().join("xdg-config"))
        .env("XDG_CACHE_HOME", tempdir.path().join("xdg-cache"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("keyshell").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("resolve-url"))
        .stdout(predicate::str::contains("simulate"));
}

#[test]
fn test_binary_without_subcommand_fails_with_usage() {
    let mut cmd = Command::cargo_bin("keyshell").unwrap();
    cmd.assert().failure().stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_binary_resolve_url_prepends_default_scheme() {
    let tempdir = TempDir::new().unwrap();
    keyshell(&tempdir)
        .args(["resolve-url", "example.com"])
        .assert()
        .success()
        .stdout("https://example.com\n");
}

#[test]
fn test_binary_resolve_url_keeps_allowed_scheme() {
    let tempdir = TempDir::new().unwrap();
    keyshell(&tempdir)
        .args(["resolve-url", "  http://example.com/a  "])
        .assert()
        .success()
        .stdout("http://example.com/a\n");
}

#[test]
fn test_binary_resolve_url_blank_prints_nothing() {
    let tempdir = TempDir::new().unwrap();
    keyshell(&tempdir)
        .args(["resolve-url", "   "])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_binary_resolve_url_uses_configured_scheme_and_allow_list() {
    let tempdir = TempDir::new().unwrap();
    write_keyshell_config(
        &tempdir.path().join("xdg-config"),
        "default_scheme = \"http\"\nsupported_protocols = [\"https\", \"gemini\"]\n",
    );
    keyshell(&tempdir)
        .args(["resolve-url", "gemini://capsule.test"])
        .assert()
        .success()
        .stdout("gemini://capsule.test\n");
    keyshell(&tempdir)
        .args(["resolve-url", "http://plain.test"])
        .assert()
        .success()
        .stdout("http://http://plain.test\n");
}

#[test]
fn test_binary_resolve_destination_skips_existing_files() {
    let tempdir = TempDir::new().unwrap();
    let dir = tempdir.path().join("dl");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("report.pdf"), b"x").unwrap();
    std::fs::write(dir.join("report.pdf.1"), b"x").unwrap();

    keyshell(&tempdir)
        .args(["resolve-destination", "report.pdf", "--dir"])
        .arg(&dir)
        .assert()
        .success()
        .stdout(format!("{}\n", dir.join("report.pdf.2").display()));
}

#[test]
fn test_binary_resolve_destination_defaults_to_downloads_dir() {
    let tempdir = TempDir::new().unwrap();
    let expected = tempdir.path().join("home").join("Downloads").join("notes.txt");
    keyshell(&tempdir)
        .args(["resolve-destination", "notes.txt"])
        .assert()
        .success()
        .stdout(format!("{}\n", expected.display()));
}

#[test]
fn test_binary_config_show_missing_file_uses_defaults() {
    let tempdir = TempDir::new().unwrap();
    keyshell(&tempdir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "config_file = not found (using defaults)",
        ))
        .stdout(predicate::str::contains("input_command = [\"dmenu\"]"))
        .stdout(predicate::str::contains("default_scheme = https"))
        .stdout(predicate::str::contains("zoom_step = 0.1"))
        .stdout(predicate::str::contains("web_process_count_limit = 4"))
        .stdout(predicate::str::contains("verbosity = default"))
        .stdout(predicate::str::contains("key_navigate = l"));
}

#[test]
fn test_binary_config_show_loads_xdg_file() {
    let tempdir = TempDir::new().unwrap();
    let configured_downloads = tempdir.path().join("configured-downloads");
    write_keyshell_config(
        &tempdir.path().join("xdg-config"),
        &format!(
            "downloads_dir = \"{}\"\ninput_command = [\"rofi\", \"-dmenu\"]\nzoom_step = 0.25\nverbosity = \"quiet\"\nkey_navigate = \"o\"\n",
            toml_path(&configured_downloads)
        ),
    );

    keyshell(&tempdir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config_file = loaded"))
        .stdout(predicate::str::contains(format!(
            "downloads_dir = {}",
            configured_downloads.display()
        )))
        .stdout(predicate::str::contains("input_command = [\"rofi\", \"-dmenu\"]"))
        .stdout(predicate::str::contains("zoom_step = 0.25"))
        .stdout(predicate::str::contains("verbosity = quiet"))
        .stdout(predicate::str::contains("key_navigate = o"));
}

#[test]
fn test_binary_config_show_cli_overrides_file() {
    let tempdir = TempDir::new().unwrap();
    write_keyshell_config(
        &tempdir.path().join("xdg-config"),
        "input_command = [\"rofi\"]\n",
    );
    keyshell(&tempdir)
        .args(["config", "show", "--input-command", "dmenu -i", "--downloads-dir", "/srv/dl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("input_command = [\"dmenu\", \"-i\"]"))
        .stdout(predicate::str::contains("downloads_dir = /srv/dl"));
}

#[test]
fn test_binary_invalid_config_reports_line() {
    let tempdir = TempDir::new().unwrap();
    write_keyshell_config(
        &tempdir.path().join("xdg-config"),
        "zoom_step = 0.1\nwarp_speed = 9\n",
    );
    keyshell(&tempdir)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"))
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn test_binary_explicit_config_path() {
    let tempdir = TempDir::new().unwrap();
    let path = tempdir.path().join("custom.toml");
    std::fs::write(&path, "web_process_count_limit = 8\n").unwrap();
    keyshell(&tempdir)
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config_file = loaded"))
        .stdout(predicate::str::contains("web_process_count_limit = 8"));
}

#[test]
fn test_binary_paths_json() {
    let tempdir = TempDir::new().unwrap();
    let output = keyshell(&tempdir)
        .args(["paths", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let extensions = tempdir
        .path()
        .join("xdg-config")
        .join("keyshell")
        .join("extensions");
    assert_eq!(value["extensions"], extensions.display().to_string());
    let downloads = tempdir.path().join("home").join("Downloads");
    assert_eq!(value["downloads"], downloads.display().to_string());
}

#[test]
fn test_binary_paths_text() {
    let tempdir = TempDir::new().unwrap();
    keyshell(&tempdir)
        .arg("paths")
        .assert()
        .success()
        .stdout(predicate::str::contains("cookies = "))
        .stdout(predicate::str::contains("cookies.txt"));
}

#[cfg(unix)]
#[test]
fn test_binary_prompt_round_trip_through_program() {
    let tempdir = TempDir::new().unwrap();
    keyshell(&tempdir)
        .args(["prompt", "--suggestion", "https://seed.test", "--input-command", "cat"])
        .assert()
        .success()
        .stdout("https://seed.test\n");
}

#[test]
fn test_binary_prompt_missing_program_fails() {
    let tempdir = TempDir::new().unwrap();
    keyshell(&tempdir)
        .args(["prompt", "--input-command", "keyshell-no-such-prompt-program"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Prompt program failed"));
}

#[test]
fn test_binary_simulate_from_stdin() {
    let tempdir = TempDir::new().unwrap();
    keyshell(&tempdir)
        .args([
            "simulate",
            "--start-url",
            "https://start.test",
            "--reply",
            "example.com",
        ])
        .write_stdin("key 1 ctrl+l\nkey 1 ctrl+=\nload 1 finished\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "window 1: uri=https://example.com zoom=1.10 title=keyshell | https://example.com",
        ))
        .stdout(predicate::str::contains("live_windows = 1"))
        .stdout(predicate::str::contains("exited = false"));
}

#[test]
fn test_binary_simulate_script_file_exits_on_last_close() {
    let tempdir = TempDir::new().unwrap();
    let script = tempdir.path().join("events.txt");
    std::fs::write(
        &script,
        "# two windows, both closed\nnew-window https://popup.test\nclose 1\nkey 2 ctrl+q\n",
    )
    .unwrap();
    keyshell(&tempdir)
        .arg("simulate")
        .arg(&script)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"exited\": true"))
        .stdout(predicate::str::contains("\"live_windows\": 0"));
}

#[test]
fn test_binary_simulate_rejects_bad_script_line() {
    let tempdir = TempDir::new().unwrap();
    keyshell(&tempdir)
        .arg("simulate")
        .write_stdin("close 1\nwobble 2\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}

//! CLI Integration Tests
//!
//! These tests run the `mcsettings` binary. None of them needs a running
//! MyController server.
//!
//! ```
//! cargo test --package mycontroller-cli --test cli_integration
//! ```

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn run_mcsettings(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mcsettings"))
        .args(args)
        .env_remove("MC_SERVER_URL")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to run mcsettings binary")
}

fn run_with_config(config: &Path, args: &[&str]) -> Output {
    let mut full = vec!["--config", config.to_str().expect("utf-8 temp path")];
    full.extend_from_slice(args);
    run_mcsettings(&full)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// =============================================================================
// Help and Version
// =============================================================================

#[test]
fn test_help_command() {
    let output = run_mcsettings(&["--help"]);
    assert!(output.status.success(), "Help should succeed");

    let text = stdout(&output);
    assert!(text.contains("mcsettings"), "Help should name the binary");
    assert!(text.contains("show"), "Help should list show command");
    assert!(text.contains("set"), "Help should list set command");
    assert!(text.contains("config"), "Help should list config command");
}

#[test]
fn test_version_command() {
    let output = run_mcsettings(&["--version"]);
    assert!(output.status.success(), "Version should succeed");
    assert!(stdout(&output).contains("mcsettings"));
}

#[test]
fn test_subcommand_help() {
    let subcommands: [&[&str]; 6] = [
        &["show", "--help"],
        &["set", "--help"],
        &["set", "retention", "--help"],
        &["set", "location", "--help"],
        &["config", "--help"],
        &["completions", "--help"],
    ];

    for args in subcommands {
        let output = run_mcsettings(args);
        assert!(output.status.success(), "{:?} should succeed", args);
        assert!(!stdout(&output).is_empty(), "{:?} should produce output", args);
    }
}

#[test]
fn test_completions_generate() {
    let output = run_mcsettings(&["completions", "bash"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("mcsettings"));
}

// =============================================================================
// Argument validation
// =============================================================================

#[test]
fn test_unknown_screen_rejected() {
    let output = run_mcsettings(&["show", "dashboard"]);
    assert!(!output.status.success());
}

#[test]
fn test_invalid_duration_rejected() {
    let output = run_mcsettings(&["set", "retention", "--raw-data", "12 fortnights"]);
    assert!(!output.status.success());
}

#[test]
fn test_latitude_requires_longitude() {
    let output = run_mcsettings(&["set", "location", "--latitude", "52.52"]);
    assert!(!output.status.success());
}

// =============================================================================
// Config command
// =============================================================================

#[test]
fn test_config_path_follows_flag() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let output = run_with_config(&path, &["config", "path"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), path.display().to_string());
}

#[test]
fn test_config_init_set_show() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let output = run_with_config(&path, &["config", "init"]);
    assert!(output.status.success());
    assert!(path.exists(), "init should create the file");

    let output = run_with_config(&path, &["config", "set", "server-url", "https://mc.local:8443"]);
    assert!(output.status.success());

    let output = run_with_config(&path, &["config", "set", "password", "secret"]);
    assert!(output.status.success());

    let output = run_with_config(&path, &["config", "show"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("server-url = https://mc.local:8443"));
    assert!(text.contains("password = ********"));
    assert!(!text.contains("secret"));
}

#[test]
fn test_config_set_rejects_bad_url() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let output = run_with_config(&path, &["config", "set", "server-url", "mc.local"]);
    assert!(!output.status.success());
    assert!(!path.exists());
}

// =============================================================================
// Server commands without a server
// =============================================================================

#[test]
fn test_show_unreachable_server_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let output = run_with_config(
        &path,
        &["show", "units", "--server", "http://127.0.0.1:1", "--quiet"],
    );
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_set_unreachable_server_saves_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let output = run_with_config(
        &path,
        &["set", "unit", "V_TEMP", "C", "--server", "http://127.0.0.1:1", "--quiet"],
    );
    assert!(!output.status.success());
    assert!(!dir.path().join("session.json").exists());
}

//! Integration tests for the `safeops` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling — all without requiring a live backend.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `safeops` binary with env isolation.
///
/// Clears all `SAFEOPS_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn safeops_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("safeops");
    cmd.env("HOME", "/tmp/safeops-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/safeops-cli-test-nonexistent")
        .env_remove("SAFEOPS_PROFILE")
        .env_remove("SAFEOPS_BACKEND")
        .env_remove("SAFEOPS_API_KEY")
        .env_remove("SAFEOPS_OUTPUT")
        .env_remove("SAFEOPS_INSECURE")
        .env_remove("SAFEOPS_TIMEOUT")
        .env_remove("SAFEOPS_ACCESS_TOKEN");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = safeops_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    safeops_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("risk-assessment")
            .and(predicate::str::contains("venues"))
            .and(predicate::str::contains("raws"))
            .and(predicate::str::contains("watch")),
    );
}

#[test]
fn test_version_flag() {
    safeops_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("safeops"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    safeops_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    safeops_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = safeops_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_venues_list_no_config() {
    safeops_cmd()
        .args(["venues", "list"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("config")
                .or(predicate::str::contains("Configuration"))
                .or(predicate::str::contains("profile")),
        );
}

#[test]
fn test_unknown_profile_is_its_own_error() {
    safeops_cmd()
        .args(["--profile", "nope", "venues", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_config_show_no_config() {
    // `config show` uses load_config_or_default() so it succeeds even
    // when no config file exists — it just renders the default config.
    safeops_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_path_prints_a_path() {
    safeops_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_invalid_output_format() {
    let output = safeops_cmd()
        .args(["--output", "invalid", "venues", "list"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid output format"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid")
            || text.contains("possible values")
            || text.contains("valid value"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_invalid_severity_value() {
    let output = safeops_cmd()
        .args([
            "venues",
            "add-hazard",
            "7a4e9ab9-9c36-4c6a-a6ac-8a8f205c5a8e",
            "--category",
            "electrical",
            "--description",
            "x",
            "--severity",
            "catastrophic",
            "--likelihood",
            "low",
        ])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid severity"
    );
}

#[test]
fn test_global_flags_parsing() {
    // All flags should parse — the failure should be about missing
    // backend config, not about argument parsing.
    safeops_cmd()
        .args([
            "--output",
            "json",
            "--verbose",
            "--insecure",
            "--timeout",
            "60",
            "raws",
            "list",
        ])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("config")
                .or(predicate::str::contains("Configuration"))
                .or(predicate::str::contains("profile")),
        );
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_venues_subcommands_exist() {
    safeops_cmd()
        .args(["venues", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("get"))
                .and(predicate::str::contains("create"))
                .and(predicate::str::contains("hazards"))
                .and(predicate::str::contains("add-hazard")),
        );
}

#[test]
fn test_raws_subcommands_exist() {
    safeops_cmd()
        .args(["raws", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("submit"))
                .and(predicate::str::contains("approve"))
                .and(predicate::str::contains("reject"))
                .and(predicate::str::contains("delete")),
        );
}

#[test]
fn test_config_subcommands_exist() {
    safeops_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("path")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("set-key")),
        );
}

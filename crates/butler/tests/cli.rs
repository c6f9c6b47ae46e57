// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runs the `butler` binary against throwaway config files.

use std::path::Path;
use std::process::{Command, Output};

fn butler(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_butler"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run butler binary")
}

fn write_config(dir: &Path, extra: &str) -> std::path::PathBuf {
    let path = dir.join("butler.toml");
    let body = format!(
        "[storage]\ndatabase_path = \"{}\"\n\n[door]\nbackend = \"dry_run\"\n{extra}",
        dir.join("ledger.db").display()
    );
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn invalid_config_exits_with_startup_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("butler.toml");
    std::fs::write(&path, "[door]\ngpio_pni = 4\n").unwrap();

    let out = butler(&path, &["config", "check"]);

    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("gpio_pni"));
}

#[test]
fn missing_config_file_exits_with_startup_code() {
    let out = butler(Path::new("/nonexistent/butler.toml"), &["config", "check"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn serve_without_credentials_is_a_startup_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "");

    let out = butler(&path, &["serve"]);

    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("twilio.account_sid"));
}

#[test]
fn config_check_masks_secrets() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "\n[twilio]\nauth_token = \"hunter2\"\n");

    let out = butler(&path, &["config", "check"]);

    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("twilio.auth_token = <set>"));
    assert!(!stdout.contains("hunter2"));
}

#[test]
fn authorized_numbers_round_trip_through_the_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "");

    let added = butler(&path, &["authorized", "add", "+1 469 555 1212", "--label", "Alice"]);
    assert_eq!(added.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&added.stdout).contains("authorized +14695551212"));

    let again = butler(&path, &["authorized", "add", "+14695551212"]);
    assert!(
        String::from_utf8_lossy(&again.stdout).contains("+14695551212 is already authorized as Alice")
    );

    let listed = butler(&path, &["authorized", "list"]);
    let stdout = String::from_utf8_lossy(&listed.stdout);
    assert!(stdout.contains("+14695551212"));
    assert!(stdout.contains("Alice"));

    let removed = butler(&path, &["authorized", "remove", "+14695551212"]);
    assert!(String::from_utf8_lossy(&removed.stdout).contains("revoked"));
    let listed = butler(&path, &["authorized", "list"]);
    assert!(String::from_utf8_lossy(&listed.stdout).contains("no authorized numbers"));
}

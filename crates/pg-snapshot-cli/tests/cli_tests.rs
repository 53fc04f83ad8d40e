//! CLI integration tests for pg-snapshot.
//!
//! These tests verify argument parsing, help output, and exit codes for
//! failures that happen before or at connection time.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

/// Get a command for the pg-snapshot binary.
fn cmd() -> Command {
    Command::cargo_bin("pg-snapshot").unwrap()
}

fn env_file(lines: &[&str]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_flags_and_defaults() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--env-file"))
        .stdout(predicate::str::contains("[default: .env]"))
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("[default: backups]"))
        .stdout(predicate::str::contains("--schema"))
        .stdout(predicate::str::contains("[default: public]"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pg-snapshot"));
}

#[test]
fn test_logging_flags_exist() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--log-format"))
        .stdout(predicate::str::contains("[default: text]"))
        .stdout(predicate::str::contains("--verbosity"))
        .stdout(predicate::str::contains("[default: info]"));
}

#[test]
fn test_invalid_ssl_mode_rejected_by_parser() {
    cmd()
        .args(["--ssl-mode", "disable"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("encrypted"));
}

#[test]
fn test_unknown_flag_exits_with_config_code() {
    cmd()
        .arg("--no-such-flag")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Backing up database...").not());
}

#[test]
fn test_help_explains_table_selection() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--include-views"))
        .stdout(predicate::str::contains("only base tables"))
        .stdout(predicate::str::contains("foreign tables are never included"));
}

// =============================================================================
// Exit Code Tests - Config Errors (Exit Code 1)
// =============================================================================

#[test]
fn test_missing_env_file_exits_with_code_1() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .args(["--env-file", "nonexistent.env", "--output-dir"])
        .arg(dir.path().join("backups"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Backing up database..."))
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_env_file_without_database_url_exits_with_code_1() {
    let file = env_file(&["SECRET_KEY=abc", "PORT=3000"]);
    cmd()
        .arg("--env-file")
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("DATABASE_URL"));
}

#[test]
fn test_database_url_with_extra_equals_is_ignored() {
    // Lines with more than one '=' are skipped, so DATABASE_URL is missing.
    let file = env_file(&["DATABASE_URL=postgres://u:p@localhost/app?sslmode=require"]);
    cmd()
        .arg("--env-file")
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("DATABASE_URL"));
}

// =============================================================================
// Exit Code Tests - Connection Errors (Exit Code 2)
// =============================================================================

#[test]
fn test_unreachable_database_exits_with_code_2() {
    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("backups");
    let file = env_file(&["DATABASE_URL=postgres://user:pw@127.0.0.1:1/app"]);

    cmd()
        .arg("--env-file")
        .arg(file.path())
        .arg("--output-dir")
        .arg(&output_dir)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Database connection failed"));

    // Nothing is written when the connection fails.
    assert!(!output_dir.exists());
}

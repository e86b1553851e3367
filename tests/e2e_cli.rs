//! CLI end-to-end tests
//!
//! Tests for the carmine command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the carmine binary
#[allow(deprecated)]
fn carmine_cmd() -> Command {
    Command::cargo_bin("carmine").unwrap()
}

/// Write a config with one relative root per collection and a few files.
fn media_fixture(dir: &Path) -> std::path::PathBuf {
    for (rel, bytes) in [
        ("videos/b.mkv", &b"12345"[..]),
        ("videos/a.mp4", &b"123"[..]),
        ("videos/.trash/old.mp4", &b"1"[..]),
        ("music/song.mp3", &b"1234"[..]),
        ("photos/pic.png", &b"12"[..]),
    ] {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, bytes).unwrap();
    }

    let config = dir.join("carmine.toml");
    fs::write(
        &config,
        r#"
[server]
host = "127.0.0.1"
port = 4010

[media]
videos = ["videos"]
music = ["music"]
photos = ["photos"]
"#,
    )
    .unwrap();
    config
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = carmine_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = carmine_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("carmine"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_flag() {
    let mut cmd = carmine_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("carmine"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = carmine_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_start_help() {
    let mut cmd = carmine_cmd();
    cmd.args(["start", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Start the media server"))
        .stdout(predicate::str::contains("--port"));
}

#[test]
fn test_cli_validate_config() {
    let dir = tempdir().unwrap();
    let config = media_fixture(dir.path());

    let mut cmd = carmine_cmd();
    cmd.arg("validate")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("127.0.0.1:4010"))
        .stdout(predicate::str::contains("videos roots: 1"));
}

#[test]
fn test_cli_validate_uses_global_config_flag() {
    let dir = tempdir().unwrap();
    let config = media_fixture(dir.path());

    let mut cmd = carmine_cmd();
    cmd.arg("--config")
        .arg(&config)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_cli_validate_invalid_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("carmine.toml");
    fs::write(&config, "[server]\nport = 0\n").unwrap();

    let mut cmd = carmine_cmd();
    cmd.arg("validate")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("port"));
}

#[test]
fn test_cli_validate_missing_file() {
    let mut cmd = carmine_cmd();
    cmd.args(["validate", "/nonexistent/carmine.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn test_cli_scan_text() {
    let dir = tempdir().unwrap();
    let config = media_fixture(dir.path());

    let mut cmd = carmine_cmd();
    cmd.arg("--config")
        .arg(&config)
        .arg("scan")
        .assert()
        .success()
        .stdout(predicate::str::contains("a.mp4"))
        .stdout(predicate::str::contains("song.mp3"))
        .stdout(predicate::str::contains("old.mp4").not())
        .stdout(predicate::str::contains("4 media files"));
}

#[test]
fn test_cli_scan_json_single_collection() {
    let dir = tempdir().unwrap();
    let config = media_fixture(dir.path());

    let output = carmine_cmd()
        .arg("--config")
        .arg(&config)
        .args(["scan", "--kind", "videos", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = records
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["a.mp4", "b.mkv"]);
    assert_eq!(records[1]["size"], 5);
    assert_eq!(records[1]["type"], "video");
}

#[test]
fn test_cli_scan_unknown_kind() {
    let dir = tempdir().unwrap();
    let config = media_fixture(dir.path());

    let mut cmd = carmine_cmd();
    cmd.arg("--config")
        .arg(&config)
        .args(["scan", "--kind", "podcasts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown media kind"));
}

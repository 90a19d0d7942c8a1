//! End-to-end tests for the focusbell binary.
//!
//! Each test runs the compiled binary:
//! - Help and shell completions
//! - `precache` against a temporary deployment
//! - `run` driven through stdin with every platform surface disabled
//! - Argument validation errors

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

/// Creates the binary command with logging silenced.
fn focusbell() -> Command {
    let mut cmd = Command::cargo_bin("focusbell").unwrap();
    cmd.env("RUST_LOG", "off");
    cmd
}

/// Writes a deployment with the worker script and every precached asset.
fn create_deployment() -> TempDir {
    let dir = TempDir::new().unwrap();
    for file in [
        "sw.js",
        "index.html",
        "timer-complete.mp3",
        "notification-sound.mp3",
        "icons/icon-192x192.png",
    ] {
        let path = dir.path().join(file);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"asset").unwrap();
    }
    dir
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

// ============================================================================
// Help and completions
// ============================================================================

mod help_e2e {
    use super::*;

    #[test]
    fn test_help_lists_subcommands() {
        focusbell()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("run"))
            .stdout(predicate::str::contains("precache"))
            .stdout(predicate::str::contains("completions"));
    }

    #[test]
    fn test_no_subcommand_prints_help() {
        focusbell()
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage"));
    }

    #[test]
    fn test_run_help_lists_durations() {
        focusbell()
            .args(["run", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--work"))
            .stdout(predicate::str::contains("--short-break"))
            .stdout(predicate::str::contains("--long-break"))
            .stdout(predicate::str::contains("--location"));
    }

    #[test]
    fn test_bash_completions() {
        focusbell()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("focusbell"));
    }
}

// ============================================================================
// precache
// ============================================================================

mod precache_e2e {
    use super::*;

    #[test]
    fn test_precache_lists_cached_assets() {
        let assets = create_deployment();
        let cache = TempDir::new().unwrap();

        focusbell()
            .args([
                "precache",
                "--location",
                "https://example.github.io/focusbell/index.html",
                "--assets",
                path_arg(assets.path()),
                "--cache-dir",
                path_arg(cache.path()),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "deployment root: https://example.github.io/focusbell/",
            ))
            .stdout(predicate::str::contains("pomodoro-timer-v1"))
            .stdout(predicate::str::contains(
                "https://example.github.io/focusbell/timer-complete.mp3",
            ));
    }

    #[test]
    fn test_precache_purges_old_versions() {
        let assets = create_deployment();
        let cache = TempDir::new().unwrap();
        std::fs::create_dir_all(cache.path().join("pomodoro-timer-v0")).unwrap();

        focusbell()
            .args([
                "precache",
                "--assets",
                path_arg(assets.path()),
                "--cache-dir",
                path_arg(cache.path()),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("pomodoro-timer-v0").not());

        assert!(!cache.path().join("pomodoro-timer-v0").exists());
    }

    #[test]
    fn test_precache_fails_on_missing_asset() {
        let assets = TempDir::new().unwrap();
        std::fs::write(assets.path().join("sw.js"), b"worker").unwrap();
        let cache = TempDir::new().unwrap();

        focusbell()
            .args([
                "precache",
                "--assets",
                path_arg(assets.path()),
                "--cache-dir",
                path_arg(cache.path()),
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::starts_with("error:"));
    }

    #[test]
    fn test_precache_fails_without_worker_script() {
        let assets = TempDir::new().unwrap();
        let cache = TempDir::new().unwrap();

        focusbell()
            .args([
                "precache",
                "--assets",
                path_arg(assets.path()),
                "--cache-dir",
                path_arg(cache.path()),
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("script not found"));
    }
}

// ============================================================================
// run
// ============================================================================

mod run_e2e {
    use super::*;

    fn quiet_run(cache: &TempDir) -> Command {
        let mut cmd = focusbell();
        cmd.args([
            "run",
            "--no-sound",
            "--no-notifications",
            "--cache-dir",
            path_arg(cache.path()),
        ]);
        cmd
    }

    #[test]
    fn test_run_quits_on_command() {
        let cache = TempDir::new().unwrap();

        quiet_run(&cache)
            .write_stdin("q\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("commands:"))
            .stdout(predicate::str::contains("[Focus]"))
            .stdout(predicate::str::contains("25:00"));
    }

    #[test]
    fn test_run_switches_modes() {
        let cache = TempDir::new().unwrap();

        quiet_run(&cache)
            .args(["--long-break", "20"])
            .write_stdin("long\nquit\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("[Long]"))
            .stdout(predicate::str::contains("20:00"));
    }

    #[test]
    fn test_run_reports_unknown_command() {
        let cache = TempDir::new().unwrap();

        quiet_run(&cache)
            .write_stdin("dance\nq\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("unknown command 'dance'"));
    }

    #[test]
    fn test_run_ends_with_input() {
        let cache = TempDir::new().unwrap();

        quiet_run(&cache).write_stdin("").assert().success();
    }

    #[test]
    fn test_run_rejects_zero_work() {
        focusbell()
            .args(["run", "--work", "0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--work"));
    }

    #[test]
    fn test_run_rejects_bad_location() {
        focusbell()
            .args(["run", "--location", "not a url"])
            .assert()
            .failure();
    }
}

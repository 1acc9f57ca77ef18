//! CLI integration tests.
//!
//! Runs the compiled binary; no server is started.

use std::process::Command;

/// CLI --help output should show expected options.
#[test]
fn test_cli_help_output() {
    let output = Command::new(env!("CARGO_BIN_EXE_lanstreamer"))
        .arg("--help")
        .output()
        .expect("failed to run");

    let stdout = String::from_utf8_lossy(&output.stdout);

    for option in ["--port", "--data-dir", "--log-level", "--identities-file"] {
        assert!(stdout.contains(option), "help should mention {option}");
    }
    assert!(
        stdout.contains("Lanstreamer") || stdout.contains("lanstreamer"),
        "help should mention Lanstreamer"
    );
}

/// CLI --version should show version.
#[test]
fn test_cli_version_output() {
    let output = Command::new(env!("CARGO_BIN_EXE_lanstreamer"))
        .arg("--version")
        .output()
        .expect("failed to run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("0.1.0"),
        "version output should contain version number: {}",
        stdout
    );
}

/// A zero cleanup interval is rejected before startup.
#[test]
fn test_cli_rejects_zero_cleanup_interval() {
    let output = Command::new(env!("CARGO_BIN_EXE_lanstreamer"))
        .args(["--cleanup-interval-secs", "0"])
        .output()
        .expect("failed to run");

    assert!(!output.status.success());
}

//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against a throwaway home directory so the
//! user's real configuration is never touched.

use std::io::Write;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_tapcoin"))
        .args(args)
        .env("HOME", home.path())
        .env_remove("TAPCOIN_ENV")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn parse(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_status_reports_seed() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&home, &["status", "--at", "2026-01-01T18:59:00Z"]);
    assert_eq!(code, 0, "status failed");
    let json = parse(&stdout);
    assert_eq!(json["points"], 420);
    assert_eq!(json["level_name"], "Bronze");
    assert_eq!(json["rate_label"], "+42.07K");
    assert_eq!(json["wallet_label"], "Connect Wallet");
}

#[test]
fn test_status_without_wallet_provider_prints_notice() {
    let home = TempDir::new().unwrap();
    let (stdout, stderr, code) = run_cli(&home, &["status", "--connect"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("notice:"), "stderr was {stderr:?}");
    assert_eq!(parse(&stdout)["wallet_connected"], false);
}

#[test]
fn test_status_with_wallet_address() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&home, &["status", "--connect", "--wallet", "9wFFyRfZBsuAha4YcuxcXLKwMxJR43S7fPfQLusDBzvT"]);
    assert_eq!(code, 0);
    assert_eq!(parse(&stdout)["wallet_label"], "Connected: 9wFFy...");
}

#[test]
fn test_simulate_single_tap() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&home, &["simulate", "--taps", "1"]);
    assert_eq!(code, 0);
    let json = parse(&stdout);
    assert_eq!(json["points"], 840);
    assert_eq!(json["level_index"], 0);
}

#[test]
fn test_simulate_reports_level_lag() {
    let home = TempDir::new().unwrap();
    let (_, _, code) = run_cli(&home, &["config", "set", "progress.tap_amount", "2000000"]);
    assert_eq!(code, 0);

    // One tap lands in Epic territory, but the level only moves one tier.
    let (stdout, _, code) = run_cli(&home, &["simulate", "--taps", "1"]);
    assert_eq!(code, 0);
    let json = parse(&stdout);
    assert_eq!(json["level_index"], 1);
    assert_eq!(json["true_level_index"], 5);
    assert_eq!(json["true_level_name"], "Epic");
    assert_eq!(json["level_changes"], 1);
}

#[test]
fn test_simulate_expires_coins() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&home, &["simulate", "--taps", "50", "--ticks", "3"]);
    assert_eq!(code, 0);
    let json = parse(&stdout);
    assert_eq!(json["floating"].as_array().unwrap().len(), 0);
    assert_eq!(json["points"], 420 + 50 * 420 + 3 * 11);
}

#[test]
fn test_play_exits_when_input_ends() {
    let home = TempDir::new().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_tapcoin"))
        .arg("play")
        .env("HOME", home.path())
        .env_remove("TAPCOIN_ENV")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to spawn play");

    {
        let mut stdin = child.stdin.take().unwrap();
        stdin.write_all(b"1 2\n").unwrap();
    }

    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        if child.try_wait().unwrap().is_some() {
            break;
        }
        if Instant::now() > deadline {
            let _ = child.kill();
            panic!("play still running after stdin closed");
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("Failed to parse JSON line"))
        .collect();

    let tap = lines
        .iter()
        .find(|v| v["type"] == "Tapped")
        .expect("no Tapped event");
    assert_eq!(tap["x"], 1.0);
    assert_eq!(tap["y"], 2.0);
    assert_eq!(lines.last().unwrap()["type"], "SessionEnded");
}

#[test]
fn test_countdown_json() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&home, &["countdown", "--json", "--at", "2026-01-01T18:59:00Z"]);
    assert_eq!(code, 0);
    let rows = parse(&stdout);
    let cipher = rows
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["label"] == "Daily Cipher")
        .unwrap();
    assert_eq!(cipher["remaining"], "00:01");
}

#[test]
fn test_config_set_and_get() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&home, &["config", "get", "progress.tap_amount"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "420");

    let (_, _, code) = run_cli(&home, &["config", "set", "progress.tap_amount", "1000"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(&home, &["config", "get", "progress.tap_amount"]);
    assert_eq!(stdout.trim(), "1000");

    let (_, stderr, code) = run_cli(&home, &["config", "set", "progress.nope", "1"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}

#![cfg(all(unix, feature = "cli"))]

use std::path::PathBuf;
use std::process::{Command, Output};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/vrlink-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn vrlink(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vrlink"))
        .args(["--log-level", "error"])
        .args(args)
        .output()
        .expect("vrlink should run")
}

#[test]
fn version_prints_package_version() {
    let output = vrlink(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), format!("vrlink {}", env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_extended_json_reports_protocol() {
    let output = vrlink(&["--format", "json", "version", "--extended"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"protocol_version\":1"));
    assert!(stdout.contains("\"magic\":\"0x5245504F5852\""));
}

#[test]
fn frames_lists_registry_in_tag_order() {
    let output = vrlink(&["--format", "raw", "frames"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let tags: Vec<&str> = stdout.lines().collect();
    assert_eq!(tags, vec!["1", "2", "3", "4", "5"]);
}

#[test]
fn frames_json_includes_shapes() {
    let output = vrlink(&["--format", "json", "frames"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"name\":\"RIG\""));
    assert!(stdout.contains("[\"vector3\",\"quaternion\",\"vector3\",\"quaternion\"]"));
}

#[test]
fn simulate_vr_players_see_each_other() {
    let output = vrlink(&[
        "--format", "raw", "simulate", "--vr", "2", "--vanilla", "1", "--ticks", "2",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let pairs: Vec<&str> = stdout.lines().collect();
    assert_eq!(pairs, vec!["1 2", "2 1"]);
}

#[test]
fn simulate_leave_removes_peer() {
    let output = vrlink(&[
        "--format", "raw", "simulate", "--vr", "3", "--vanilla", "0", "--leave", "2",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let pairs: Vec<&str> = stdout.lines().collect();
    assert_eq!(pairs, vec!["1 3", "3 1"]);
}

#[test]
fn simulate_json_counts_vanilla_skips() {
    let output = vrlink(&[
        "--format", "json", "simulate", "--vr", "1", "--vanilla", "1", "--ticks", "3",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"skipped\":3"));
    assert!(stdout.contains("\"malformed\":0"));
}

#[test]
fn simulate_rejects_unknown_leave_actor() {
    let output = vrlink(&["simulate", "--vr", "2", "--vanilla", "0", "--leave", "9"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn capture_then_decode_round_trips() {
    let dir = unique_temp_dir("capture");
    let capture = dir.join("tick.bin");
    let capture_arg = capture.to_str().expect("utf-8 temp path");

    let output = vrlink(&[
        "--format", "json", "simulate", "--vr", "2", "--vanilla", "0", "--ticks", "1",
        "--capture", capture_arg,
    ]);
    assert!(output.status.success());
    assert!(capture.exists());

    let output = vrlink(&["--format", "raw", "decode", capture_arg, "--offset", "2"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let tags: Vec<&str> = stdout.lines().collect();
    assert_eq!(tags, vec!["1", "2", "4", "5", "3"]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn decode_without_offset_reports_skip() {
    let dir = unique_temp_dir("skip");
    let capture = dir.join("tick.bin");
    let capture_arg = capture.to_str().expect("utf-8 temp path");

    let output = vrlink(&[
        "simulate", "--vr", "2", "--vanilla", "0", "--ticks", "1", "--capture", capture_arg,
    ]);
    assert!(output.status.success());

    let output = vrlink(&["--format", "json", "decode", capture_arg]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"skipped\":\"not_protocol_data\""));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn decode_garbage_is_data_invalid() {
    let dir = unique_temp_dir("garbage");
    let path = dir.join("garbage.bin");
    std::fs::write(&path, [0xFFu8, 0x00, 0x01]).expect("write garbage");

    let output = vrlink(&["decode", path.to_str().expect("utf-8 temp path")]);
    assert_eq!(output.status.code(), Some(60));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn decode_missing_file_fails() {
    let output = vrlink(&["decode", "/tmp/vrlink-cli-does-not-exist.bin"]);
    assert_eq!(output.status.code(), Some(1));
}

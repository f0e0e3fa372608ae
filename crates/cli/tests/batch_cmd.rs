//! CLI tests for `gs1 batch`.

use std::fs;
use std::process::Command;

use assert_cmd::cargo;

fn gs1_cmd() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("gs1"));
    cmd.env_remove("GS1_POLICY");
    cmd
}

fn write_temp_batch(content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("scans.txt");
    fs::write(&path, content).expect("write temp batch");
    (dir, path.to_string_lossy().to_string())
}

#[test]
fn batch_json_reports_each_line_and_summary() {
    let (_dir, path) = write_temp_batch(
        "(01)08699550011111(21)0000000000010158(10)173350(17)271229\n\
         \n\
         (01)08699550011111(17)271229\n",
    );

    let output = gs1_cmd()
        .args(["batch", &path, "--output", "json"])
        .output()
        .expect("run batch");

    assert_eq!(output.status.code(), Some(1), "one scan is rejected");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");

    assert_eq!(json["summary"]["total"], 2);
    assert_eq!(json["summary"]["accepted"], 1);
    assert_eq!(json["summary"]["rejected"], 1);

    let results = json["results"].as_array().expect("results array");
    assert_eq!(results[0]["line"], 1);
    assert_eq!(results[0]["outcome"]["status"], true);
    assert_eq!(results[1]["line"], 3, "blank lines keep numbering");
    assert_eq!(results[1]["outcome"]["status"], false);
}

#[test]
fn batch_all_accepted_exits_zero() {
    let (_dir, path) = write_temp_batch(
        "01086995500111112100000000000101581727122910173350\n\
         (01)08699550011111(10)A(21)B(17)270200\n",
    );

    let output = gs1_cmd()
        .args(["batch", &path, "--output", "pretty"])
        .output()
        .expect("run batch");

    assert!(
        output.status.success(),
        "stdout={}",
        String::from_utf8_lossy(&output.stdout)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("expiry=20270228"), "stdout={stdout}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("2 scans, 2 accepted, 0 rejected"), "stderr={stderr}");
}

#[test]
fn batch_missing_file_is_a_command_error() {
    let output = gs1_cmd()
        .args(["batch", "/nonexistent/scans.txt"])
        .output()
        .expect("run batch");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read batch file"), "stderr={stderr}");
}

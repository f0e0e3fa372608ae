//! CLI tests for `gs1 validate` (alias `check`), policies, and exit codes.

use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

use assert_cmd::cargo;

const PAREN_SCAN: &str = "(01)08699550011111(21)0000000000010158(10)173350(17)271229";
const CONCAT_SCAN: &str = "01086995500111112100000000000101581727122910173350";

fn gs1_cmd() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("gs1"));
    cmd.env_remove("GS1_POLICY");
    cmd
}

fn write_temp_policy(content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("policy.jsonc");
    fs::write(&path, content).expect("write temp policy");
    (dir, path.to_string_lossy().to_string())
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {stdout}"))
}

#[test]
fn validate_accepts_parenthesized_scan() {
    let output = gs1_cmd()
        .args(["validate", PAREN_SCAN, "--output", "json"])
        .output()
        .expect("run validate");

    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json = stdout_json(&output);
    assert_eq!(
        json,
        serde_json::json!({
            "status": true,
            "gtin": "08699550011111",
            "exp": "20271229",
            "lot": "173350",
            "serial": "0000000000010158",
        })
    );
}

#[test]
fn check_alias_validates_concatenated_scan() {
    let output = gs1_cmd()
        .args(["check", CONCAT_SCAN, "--output", "json"])
        .output()
        .expect("run check");

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["serial"], "0000000000010158");
    assert_eq!(json["exp"], "20271229");
}

#[test]
fn validate_rejection_exits_one_with_turkish_message() {
    let output = gs1_cmd()
        .args(["validate", "(01)08699550011111(17)271229", "--output", "json"])
        .output()
        .expect("run validate");

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["status"], false);
    assert_eq!(json["message"], "Lot (10) bulunamadı, Seri (21) bulunamadı");
}

#[test]
fn validate_reads_stdin_when_payload_omitted() {
    let mut child = gs1_cmd()
        .args(["validate", "--output", "json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn gs1 validate");
    child
        .stdin
        .as_mut()
        .expect("stdin handle")
        .write_all(format!("{PAREN_SCAN}\n").as_bytes())
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait for output");

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["status"], true);
}

#[test]
fn strict_gtin_flag_rejects_bad_check_digit() {
    let output = gs1_cmd()
        .args([
            "validate",
            PAREN_SCAN,
            "--strict-gtin",
            "--locale",
            "en",
            "--output",
            "json",
        ])
        .output()
        .expect("run validate");

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(
        json["message"],
        "GTIN (01) check digit mismatch: 08699550011111"
    );
}

#[test]
fn policy_file_enables_trailing_rejection() {
    let (_dir, path) = write_temp_policy(
        r#"{
            // line 3 rejects noisy scans
            "id": "press-line-3",
            "schema_version": "1.0.0",
            "reject_trailing_data": true,
            "locale": "en",
        }"#,
    );
    let noisy = "010869955001111110173350\u{1d}210000000000010158\u{1d}17271229XXXX";

    let accepted = gs1_cmd()
        .args(["validate", PAREN_SCAN, "--policy", &path, "--output", "json"])
        .output()
        .expect("run validate");
    assert!(accepted.status.success());

    let rejected = gs1_cmd()
        .args(["validate", noisy, "--policy", &path, "--output", "json"])
        .output()
        .expect("run validate");
    assert_eq!(rejected.status.code(), Some(1));
    assert_eq!(
        stdout_json(&rejected)["message"],
        "Unrecognized trailing data dropped (4 characters)"
    );
}

#[test]
fn policy_path_is_read_from_environment() {
    let (_dir, path) = write_temp_policy(
        r#"{"id":"qa","schema_version":"1.0.0","strict_gtin_checksum":true}"#,
    );

    let output = gs1_cmd()
        .env("GS1_POLICY", &path)
        .args(["validate", PAREN_SCAN, "--output", "json"])
        .output()
        .expect("run validate");

    assert_eq!(output.status.code(), Some(1));
    let message = stdout_json(&output)["message"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    assert!(message.contains("08699550011111"), "message={message}");
}

#[test]
fn unreadable_policy_is_a_command_error() {
    let output = gs1_cmd()
        .args(["validate", PAREN_SCAN, "--policy", "/nonexistent/policy.json"])
        .output()
        .expect("run validate");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load policy"), "stderr={stderr}");
}

#[test]
fn validate_pretty_prints_outcome_line() {
    let output = gs1_cmd()
        .args(["validate", PAREN_SCAN, "--output", "pretty"])
        .output()
        .expect("run validate");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.starts_with("ok gtin=08699550011111 expiry=20271229"),
        "unexpected output: {stdout}"
    );
}

use assert_cmd::prelude::*;
use rstest::rstest;
use serde_json::Value;
use std::process::Command;
use tempfile::tempdir;

fn windcal_json(args: &[&str]) -> std::process::Output {
    let dir = tempdir().unwrap();
    Command::cargo_bin("windcal")
        .unwrap()
        .current_dir(dir.path())
        .arg("--json")
        .args(args)
        .output()
        .unwrap()
}

fn last_json_line(bytes: &[u8]) -> Value {
    let text = String::from_utf8_lossy(bytes);
    let line = text
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .expect("some output");
    serde_json::from_str(line).expect("valid JSON line")
}

/// Validate the JSON schema for a single correction.
#[rstest]
fn correct_json_schema() {
    let out = windcal_json(&["correct", "--speed", "21", "--angle", "200"]);
    assert!(out.status.success());
    let v = last_json_line(&out.stdout);
    for key in [
        "raw_speed",
        "angle",
        "folded_angle",
        "bracket",
        "offset",
        "corrected",
    ] {
        assert!(v.get(key).is_some(), "missing key {key}: {v}");
    }
    assert_eq!(v["bracket"], serde_json::json!([1, 2]));
    assert!((v["folded_angle"].as_f64().unwrap() - 160.0).abs() < 1e-6);
    let corrected = v["corrected"].as_f64().unwrap();
    let offset = v["offset"].as_f64().unwrap();
    assert!((corrected - (21.0 + offset)).abs() < 1e-4);
}

#[rstest]
fn sweep_json_is_one_object_per_line() {
    let out = windcal_json(&["sweep", "--angle", "0", "--from", "0", "--to", "2", "--step", "0.5"]);
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    let rows: Vec<Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["corrected"].as_f64(), Some(0.0));
}

#[rstest]
fn table_json_lists_all_breakpoints() {
    let out = windcal_json(&["table"]);
    assert!(out.status.success());
    let v = last_json_line(&out.stdout);
    let rows = v.as_array().expect("array");
    assert_eq!(rows.len(), 29);
    assert_eq!(rows[28]["raw_speed"].as_f64(), Some(999.0));
}

#[rstest]
#[case(&["correct", "--speed", "20", "--angle", "361"], 3, "AngleOutOfRange")]
#[case(&["correct", "--speed", "-5", "--angle", "0"], 3, "NegativeSpeed")]
#[case(&["correct", "--speed", "NaN", "--angle", "0"], 3, "NonFiniteSpeed")]
fn json_error_schema(#[case] args: &[&str], #[case] code: i32, #[case] reason: &str) {
    let out = windcal_json(args);
    assert_eq!(out.status.code(), Some(code));
    let v = last_json_line(&out.stderr);
    assert_eq!(v["reason"], reason);
    assert!(v["message"].as_str().unwrap().contains("What happened"));
}

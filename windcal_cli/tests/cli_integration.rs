use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn windcal(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("windcal").unwrap();
    // Run in an empty directory so no stray ./windcal.toml is picked up
    cmd.current_dir(dir.path());
    cmd
}

fn write_file(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut f = fs::File::create(&path).unwrap();
    f.write_all(body.as_bytes()).unwrap();
    path
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["correct", "--speed", "20", "--angle", "0"], 0, "23.30", "stdout")]
#[case(&["correct", "--speed", "20", "--angle", "90"], 0, "17.70", "stdout")]
#[case(&["correct", "--speed", "100", "--angle", "0"], 0, "107.70", "stdout")]
#[case(&["correct", "--speed", "0", "--angle", "270"], 0, "0.00", "stdout")]
#[case(&["correct", "--speed", "-1", "--angle", "0"], 3, "negative", "stderr")]
#[case(&["correct", "--speed", "20", "--angle", "400"], 3, "outside [0, 360]", "stderr")]
#[case(&["correct", "--speed", "20", "--angle", "-10"], 3, "angle_policy", "stderr")]
#[case(&["correct", "--speed", "20"], 2, "required", "stderr")]
#[case(&["sweep", "--angle", "180", "--from", "20", "--to", "25"], 0, "21.00    17.20", "stdout")]
#[case(&["sweep", "--angle", "180", "--to", "5", "--step", "0"], 1, "step", "stderr")]
#[case(&["sweep", "--angle", "0", "--to", "3e38", "--step", "1e-30"], 1, "more than 100000 rows", "stderr")]
#[case(&["table"], 0, "999.0", "stdout")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let assert = windcal(&dir).args(args).assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[rstest]
fn sweep_prints_one_line_per_speed() {
    let dir = tempdir().unwrap();
    let out = windcal(&dir)
        .args(["sweep", "--angle", "180", "--from", "20", "--to", "25"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let corrected: Vec<f32> = stdout
        .lines()
        .map(|l| l.split_whitespace().nth(1).unwrap().parse().unwrap())
        .collect();
    let expected = [16.4, 17.2, 18.0, 18.8, 19.6, 20.4];
    assert_eq!(corrected.len(), expected.len());
    for (got, want) in corrected.iter().zip(expected) {
        assert!((got - want).abs() < 0.05, "{got} vs {want}");
    }
}

#[rstest]
fn config_wrap_policy_accepts_large_angles() {
    let dir = tempdir().unwrap();
    let cfg = write_file(&dir, "cfg.toml", "[correction]\nangle_policy = \"wrap\"\n");
    windcal(&dir)
        .arg("--config")
        .arg(&cfg)
        .args(["correct", "--speed", "20", "--angle", "450"])
        .assert()
        .success()
        .stdout(predicate::str::contains("17.70"));
}

#[rstest]
fn default_config_in_working_directory_is_used() {
    let dir = tempdir().unwrap();
    write_file(&dir, "windcal.toml", "[correction]\nangle_policy = \"wrap\"\n");
    windcal(&dir)
        .args(["correct", "--speed", "20", "--angle", "-270"])
        .assert()
        .success()
        .stdout(predicate::str::contains("17.70"));
}

#[rstest]
fn tenths_table_from_csv() {
    let dir = tempdir().unwrap();
    let csv = write_file(
        &dir,
        "tenths.csv",
        "raw_speed,offset_0,offset_90,offset_180\n0,0,0,0\n20,33,-23,-36\n25,35,-27,-46\n255,35,-27,-46\n",
    );
    windcal(&dir)
        .arg("--table")
        .arg(&csv)
        .args(["--offset-scale", "10"])
        .args(["correct", "--speed", "21", "--angle", "180"])
        .assert()
        .success()
        .stdout(predicate::str::contains("17.20"));
}

#[rstest]
fn relative_csv_in_config_resolves_next_to_config() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("conf");
    fs::create_dir(&sub).unwrap();
    fs::write(
        sub.join("table.csv"),
        "raw_speed,offset_0,offset_90,offset_180\n0,0,0,0\n10,1,1,1\n",
    )
    .unwrap();
    fs::write(sub.join("cfg.toml"), "[table]\ncsv = \"table.csv\"\n").unwrap();
    windcal(&dir)
        .args(["--config", "conf/cfg.toml", "correct", "--speed", "5", "--angle", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5.50"));
}

#[rstest]
fn cli_reports_bad_table_header() {
    let dir = tempdir().unwrap();
    let csv = write_file(&dir, "bad.csv", "speed,a,b,c\n0,0,0,0\n");
    windcal(&dir)
        .arg("--table")
        .arg(&csv)
        .arg("table")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid headers in calibration CSV"));
}

#[rstest]
fn cli_reports_unordered_table() {
    let dir = tempdir().unwrap();
    let csv = write_file(
        &dir,
        "unordered.csv",
        "raw_speed,offset_0,offset_90,offset_180\n0,0,0,0\n30,1,1,1\n20,1,1,1\n",
    );
    windcal(&dir)
        .arg("--table")
        .arg(&csv)
        .arg("table")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Calibration table rejected"));
}

#[rstest]
fn missing_config_file_is_reported() {
    let dir = tempdir().unwrap();
    windcal(&dir)
        .args(["--config", "nope.toml", "table"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not be opened"));
}

#[rstest]
fn offset_scale_requires_table() {
    let dir = tempdir().unwrap();
    windcal(&dir)
        .args(["--offset-scale", "10", "table"])
        .assert()
        .code(2);
}

//! Configuration file discovery, overrides and errors

use crate::common::{relaymq, run};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_default_config_location_is_used() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("relaymq");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("relaymq.toml"), "[queue]\ntimeout_ms = 321\n").unwrap();

    let (output, stdout, stderr) = run(relaymq(home.path()).arg("info"));

    assert!(output.status.success(), "stderr: {}", stderr);
    assert!(stdout.contains("timeout_ms = 321"), "Got: {}", stdout);
}

#[test]
fn test_missing_explicit_config_file() {
    let home = TempDir::new().unwrap();
    let missing = home.path().join("nope.toml");

    let (output, _stdout, stderr) = run(relaymq(home.path())
        .arg("--config-file")
        .arg(&missing)
        .arg("info"));

    assert_eq!(output.status.code(), Some(2));
    assert!(
        stderr.contains("FATAL: Check the --config-file path"),
        "stderr: {}",
        stderr
    );
}

#[test]
fn test_malformed_config_file() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("bad.toml");
    fs::write(&path, "[queue\ntimeout_ms = ").unwrap();

    let (output, _stdout, stderr) =
        run(relaymq(home.path()).arg("-c").arg(&path).arg("info"));

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("FATAL"), "stderr: {}", stderr);
}

#[test]
fn test_flags_override_file_values() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("levels.toml");
    fs::write(&path, "[logging]\nlevel = \"error\"\nformat = \"json\"\n").unwrap();

    let (output, stdout, stderr) = run(relaymq(home.path())
        .arg("-c")
        .arg(&path)
        .args(["--log-format", "ext", "info"]));

    assert!(output.status.success(), "stderr: {}", stderr);
    assert!(stdout.contains("level = \"error\""), "Got: {}", stdout);
    assert!(stdout.contains("format = \"ext\""), "Got: {}", stdout);
}

#[test]
fn test_log_file_receives_output() {
    let home = TempDir::new().unwrap();
    let log_path = home.path().join("relaymq.log");

    let (output, _stdout, stderr) = run(relaymq(home.path())
        .arg("--log-file")
        .arg(&log_path)
        .args(["--log-level", "debug", "info"]));

    assert!(output.status.success(), "stderr: {}", stderr);
    let contents = fs::read_to_string(&log_path).unwrap_or_default();
    assert!(
        contents.contains("Effective configuration"),
        "Log file contents: {}",
        contents
    );
}

//! `relaymq soak` tests

use crate::common::{relaymq, run};
use tempfile::TempDir;

#[test]
fn test_soak_passes_and_reports_every_queue() {
    let home = TempDir::new().unwrap();
    let (output, stdout, stderr) = run(relaymq(home.path()).args([
        "soak",
        "--producers",
        "2",
        "--consumers",
        "2",
        "--messages",
        "1000",
        "--topics",
        "alpha,beta",
        "--queues-per-topic",
        "2",
        "--log-level",
        "warn",
    ]));

    assert!(output.status.success(), "stdout: {}\nstderr: {}", stdout, stderr);
    for queue in ["alpha-0", "alpha-1", "beta-0", "beta-1"] {
        assert!(stdout.contains(queue), "Missing {} in: {}", queue, stdout);
    }
    assert!(
        stdout.contains("PASS 1000 message(s), 2000 delivery(ies) across 4 relation(s)"),
        "Got: {}",
        stdout
    );
}

#[test]
fn test_soak_defaults_from_config_file() {
    let home = TempDir::new().unwrap();
    let config_path = home.path().join("soak.toml");
    std::fs::write(
        &config_path,
        "[soak]\nproducers = 1\nconsumers = 1\nmessages = 50\ntopics = [\"cfg\"]\n",
    )
    .unwrap();

    let (output, stdout, stderr) = run(relaymq(home.path())
        .arg("--config-file")
        .arg(&config_path)
        .arg("soak"));

    assert!(output.status.success(), "stderr: {}", stderr);
    assert!(stdout.contains("cfg-0"));
    assert!(stdout.contains("PASS 50 message(s)"), "Got: {}", stdout);
}

#[test]
fn test_soak_rejects_zero_consumers() {
    let home = TempDir::new().unwrap();
    let (output, _stdout, stderr) =
        run(relaymq(home.path()).args(["soak", "--consumers", "0"]));

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("FATAL"), "stderr: {}", stderr);
}

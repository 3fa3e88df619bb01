//! `relaymq info` tests

use crate::common::{relaymq, run};
use tempfile::TempDir;

#[test]
fn test_info_prints_version_and_defaults() {
    let home = TempDir::new().unwrap();
    let (output, stdout, stderr) = run(relaymq(home.path()).arg("info"));

    assert!(output.status.success(), "stderr: {}", stderr);
    assert!(
        stdout.starts_with(&format!("relaymq {}", env!("CARGO_PKG_VERSION"))),
        "Got: {}",
        stdout
    );
    assert!(stdout.contains("Build time: "));
    assert!(stdout.contains("Git hash: "));
    assert!(stdout.contains("(built-in defaults)"));
    assert!(stdout.contains("drain_timeout_ms = 5000"));
    assert!(!stdout.contains("\x1b["), "Piped output must not be colored");
}

#[test]
fn test_no_subcommand_shows_usage() {
    let home = TempDir::new().unwrap();
    let (output, _stdout, stderr) = run(&mut relaymq(home.path()));

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("Usage"), "stderr: {}", stderr);
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    let (output, stdout, _) = run(relaymq(home.path()).arg("--version"));

    assert!(output.status.success());
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

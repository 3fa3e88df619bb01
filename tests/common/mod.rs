//! Common test utilities and helpers
//!
//! Shared by the broker and CLI integration suites. Not every suite uses
//! every helper.
#![allow(dead_code)]

use relaymq::queue::{Message, MessageQueueManager, Queue, Topic};
use std::path::Path;
use std::process::{Command, Output};
use std::sync::Arc;

/// `relaymq` binary with its config lookup pointed at `config_home`
///
/// Keeps a developer's own `relaymq.toml` out of the tests.
pub fn relaymq(config_home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_relaymq"));
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env("NO_COLOR", "1");
    cmd
}

pub fn run(cmd: &mut Command) -> (Output, String, String) {
    let output = cmd.output().expect("failed to run relaymq binary");
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    (output, stdout, stderr)
}

/// Private registry with `count` fresh queues related to `topic`
pub fn related_queues<T: Message>(
    topic: &Topic,
    count: usize,
) -> (Arc<MessageQueueManager<T>>, Vec<Arc<Queue<T>>>) {
    let manager = Arc::new(MessageQueueManager::new());
    let queues = (0..count)
        .map(|i| {
            let queue = Arc::new(Queue::new(format!("{}-{}", topic, i)));
            manager.relate(topic, &queue).unwrap();
            queue
        })
        .collect();
    (manager, queues)
}

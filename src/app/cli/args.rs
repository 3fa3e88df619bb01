//! Command-line arguments
//!
//! Global flags override the matching configuration file values. Soak flags
//! override the `[soak]` section.

use crate::core::config::{BrokerConfig, ConfigError, LOG_LEVELS};
use crate::core::logging::LogFormat;
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "relaymq")]
#[command(about = "In-process topic/queue broker with a concurrency soak harness")]
#[command(version)]
#[command(subcommand_required = true, arg_required_else_help = true)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Force colored output
    #[arg(short = 'g', long = "color", action = ArgAction::SetTrue, conflicts_with = "no_color", global = true)]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color", action = ArgAction::SetTrue, global = true)]
    pub no_color: bool,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = LOG_LEVELS.to_vec(), global = true)]
    pub log_level: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = LogFormat::names(), global = true)]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run producers and consumers against a private registry and verify delivery
    Soak(SoakArgs),
    /// Show version, build metadata and the effective configuration
    Info,
}

#[derive(ClapArgs, Debug, Clone, Default, PartialEq, Eq)]
pub struct SoakArgs {
    /// Number of producer threads
    #[arg(short = 'p', long, value_name = "COUNT")]
    pub producers: Option<usize>,

    /// Number of consumer threads
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub consumers: Option<usize>,

    /// Number of messages to publish in total
    #[arg(short = 'm', long, value_name = "COUNT")]
    pub messages: Option<u64>,

    /// Topics to publish to, round-robin (comma-separated)
    #[arg(short = 't', long, value_name = "NAMES", value_delimiter = ',')]
    pub topics: Vec<String>,

    /// Queues related to each topic
    #[arg(short = 'q', long = "queues-per-topic", value_name = "COUNT")]
    pub queues_per_topic: Option<usize>,

    /// Per-queue fetch timeout in milliseconds
    #[arg(long = "timeout-ms", value_name = "MS")]
    pub timeout_ms: Option<u32>,
}

impl Args {
    /// `Some(true)` for --color, `Some(false)` for --no-color, `None` for auto
    pub fn color_override(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Apply flags on top of values loaded from the configuration file
    ///
    /// The merged configuration is validated again since flags may carry
    /// values the file never had.
    pub fn apply_to(&self, config: &mut BrokerConfig) -> Result<(), ConfigError> {
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
        if let Some(path) = &self.log_file {
            config.logging.file = if path.to_string_lossy() == "none" {
                None
            } else {
                Some(path.clone())
            };
        }
        if let Some(color) = self.color_override() {
            config.logging.color = Some(color);
        }

        if let Command::Soak(soak) = &self.command {
            soak.apply_to(config);
        }

        config.validate()
    }
}

impl SoakArgs {
    fn apply_to(&self, config: &mut BrokerConfig) {
        if let Some(producers) = self.producers {
            config.soak.producers = producers;
        }
        if let Some(consumers) = self.consumers {
            config.soak.consumers = consumers;
        }
        if let Some(messages) = self.messages {
            config.soak.messages = messages;
        }
        if !self.topics.is_empty() {
            config.soak.topics = self.topics.clone();
        }
        if let Some(queues) = self.queues_per_topic {
            config.soak.queues_per_topic = queues;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.queue.timeout_ms = timeout_ms;
        }
    }
}

//! Logging setup on top of flexi_logger
//!
//! Three output formats are supported: `text` (timestamp, level, message),
//! `ext` (text plus the source location) and `json` (one compact object per
//! line). Text formats come in plain and colored variants.

use crate::core::config::LoggingConfig;
use crate::core::sync;
use flexi_logger::{DeferredNow, FileSpec, Logger, LoggerHandle};
use std::sync::{Mutex, OnceLock};

static LOGGER_HANDLE: OnceLock<Mutex<LoggerHandle>> = OnceLock::new();

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::EnumIter,
    strum_macros::EnumString,
    strum_macros::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    Text,
    Ext,
    Json,
}

impl LogFormat {
    /// Accepted `--log-format` / `logging.format` values
    pub fn names() -> Vec<&'static str> {
        use strum::IntoEnumIterator;
        Self::iter().map(Into::into).collect()
    }
}

/// Start the global logger
///
/// May only succeed once per process; later calls return the underlying
/// flexi_logger error.
pub fn init_logging(
    config: &LoggingConfig,
    color_enabled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let format: LogFormat = config.format.parse()?;
    let mut logger = Logger::try_with_str(&config.level)?;

    logger = match (format, color_enabled) {
        (LogFormat::Json, _) => logger.format(json_format),
        (LogFormat::Ext, true) => logger.format(extended_color_format),
        (LogFormat::Ext, false) => logger.format(extended_format),
        (LogFormat::Text, true) => logger.format(simple_color_format),
        (LogFormat::Text, false) => logger.format(simple_format),
    };

    if let Some(file_path) = &config.file {
        logger = logger.log_to_file(FileSpec::try_from(file_path)?);
    }

    let handle = logger.start()?;
    let _ = LOGGER_HANDLE.set(Mutex::new(handle));
    Ok(())
}

/// Change the log level of a running logger
///
/// Only the level can change at runtime; format and output target are fixed
/// when the logger starts.
pub fn reconfigure_logging(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let handle_mutex = LOGGER_HANDLE
        .get()
        .ok_or("Logger handle not initialised. Call init_logging first.")?;
    let mut handle = sync::lock(handle_mutex, "logger handle");
    handle.parse_and_push_temp_spec(level)?;
    Ok(())
}

fn level_abbr(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERR",
        log::Level::Warn => "WRN",
        log::Level::Info => "INF",
        log::Level::Debug => "DBG",
        log::Level::Trace => "TRC",
    }
}

fn level_colored(level: log::Level) -> colored::ColoredString {
    use colored::Colorize;

    match level {
        log::Level::Error => "ERR".red().bold(),
        log::Level::Warn => "WRN".yellow(),
        log::Level::Info => "INF".green(),
        log::Level::Debug => "DBG".blue(),
        log::Level::Trace => "TRC".magenta(),
    }
}

// "YYYY-MM-DD HH:mm:ss.fff INF message"
fn simple_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        level_abbr(record.level()),
        record.args()
    )
}

fn simple_color_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use colored::Colorize;

    write!(
        w,
        "{} {} {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f").to_string().dimmed(),
        level_colored(record.level()),
        record.args()
    )
}

// "YYYY-MM-DD HH:mm:ss.fff INF message (queue/manager.rs:42)"
fn extended_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} {} ({})",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        level_abbr(record.level()),
        record.args(),
        format_target_as_path(record.target(), record.line())
    )
}

fn extended_color_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use colored::Colorize;

    write!(
        w,
        "{} {} {} ({})",
        now.format("%Y-%m-%d %H:%M:%S%.3f").to_string().dimmed(),
        level_colored(record.level()),
        record.args(),
        format_target_as_path(record.target(), record.line()).dimmed()
    )
}

fn json_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    let json_obj = serde_json::json!({
        "timestamp": now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        "level": level_abbr(record.level()),
        "message": record.args().to_string(),
        "target": format_target_as_path(record.target(), record.line()),
    });

    match serde_json::to_string(&json_obj) {
        Ok(json_string) => w.write_all(json_string.as_bytes()),
        Err(_) => w.write_all(b"{\"error\":\"Failed to serialize log message\"}"),
    }
}

/// `relaymq::queue::manager` + line 42 -> `queue/manager.rs:42`
fn format_target_as_path(target: &str, line: Option<u32>) -> String {
    let path_like = match target.strip_prefix("relaymq::") {
        Some(without_prefix) => without_prefix.replace("::", "/") + ".rs",
        None => target.replace("::", "/"),
    };

    match line {
        Some(line_num) => format!("{}:{}", path_like, line_num),
        None => path_like,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(
        format: fn(&mut dyn std::io::Write, &mut DeferredNow, &log::Record) -> Result<(), std::io::Error>,
        level: log::Level,
    ) -> String {
        let mut buffer = Vec::new();
        let mut now = DeferredNow::new();
        let record = log::Record::builder()
            .level(level)
            .target("relaymq::queue::manager")
            .line(Some(42))
            .args(format_args!("Related queue 'q' to topic 't'"))
            .build();
        format(&mut buffer, &mut now, &record).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_log_format_names() {
        assert_eq!(LogFormat::names(), vec!["text", "ext", "json"]);
        assert_eq!("ext".parse::<LogFormat>(), Ok(LogFormat::Ext));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_format_target_as_path() {
        assert_eq!(
            format_target_as_path("relaymq::queue::manager", Some(7)),
            "queue/manager.rs:7"
        );
        assert_eq!(format_target_as_path("relaymq::app", None), "app.rs");
        assert_eq!(format_target_as_path("other::crate", None), "other/crate");
    }

    #[test]
    fn test_simple_format_omits_location() {
        let output = render(simple_format, log::Level::Info);
        assert!(
            output.contains("INF Related queue 'q' to topic 't'"),
            "Unexpected output: {}",
            output
        );
        assert!(!output.contains("queue/manager.rs"));
    }

    #[test]
    fn test_extended_format_includes_location() {
        let output = render(extended_format, log::Level::Warn);
        assert!(output.contains("WRN Related queue"));
        assert!(
            output.ends_with("(queue/manager.rs:42)"),
            "Unexpected output: {}",
            output
        );
    }

    #[test]
    fn test_json_format_is_valid_json() {
        let output = render(json_format, log::Level::Debug);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["level"], "DBG");
        assert_eq!(value["message"], "Related queue 'q' to topic 't'");
        assert_eq!(value["target"], "queue/manager.rs:42");
        assert!(!output.contains('\n'), "JSON lines must be compact");
    }

    #[test]
    fn test_reconfigure_before_init() {
        // No test initializes the global logger, so the handle is absent
        if LOGGER_HANDLE.get().is_none() {
            assert!(reconfigure_logging("debug").is_err());
        }
    }
}

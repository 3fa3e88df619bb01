//! Application startup
//!
//! Parses arguments, loads and merges configuration, starts logging and
//! dispatches to the selected command. Returns the process exit code:
//! 0 on success, 1 when a command fails, 2 for configuration errors.

use super::cli::args::{Args, Command};
use super::cli::display;
use super::soak;
use crate::core::config::{BrokerConfig, ConfigError, LoggingConfig};
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::core::styles::palette_to_clap;
use clap::{CommandFactory, FromArgMatches};
use std::io::IsTerminal;
use std::process::ExitCode;

pub fn startup() -> ExitCode {
    let matches = Args::command().styles(palette_to_clap(true)).get_matches();
    let args = match Args::from_arg_matches(&matches) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            // Logging from flags alone so the failure is still reported
            let fallback = LoggingConfig {
                level: args.log_level.clone().unwrap_or_else(|| "info".to_string()),
                format: args.log_format.clone().unwrap_or_else(|| "text".to_string()),
                file: None,
                color: args.color_override(),
            };
            let use_color = resolve_color(fallback.color);
            if let Err(log_err) = init_logging(&fallback, use_color) {
                eprintln!("Failed to initialise logging: {}", log_err);
            }
            log_error_with_context(&e, "Loading configuration");
            log::logger().flush();
            return ExitCode::from(2);
        }
    };

    let use_color = resolve_color(config.logging.color);
    if let Err(e) = init_logging(&config.logging, use_color) {
        eprintln!("Failed to initialise logging: {}", e);
        return ExitCode::FAILURE;
    }
    log::debug!("Effective configuration: {:?}", config);

    let code = run_command(&args, &config, use_color);
    log::logger().flush();
    code
}

fn run_command(args: &Args, config: &BrokerConfig, use_color: bool) -> ExitCode {
    match &args.command {
        Command::Info => {
            println!(
                "{}",
                display::info_text(config, args.config_file.as_deref(), use_color)
            );
            ExitCode::SUCCESS
        }
        Command::Soak(_) => match soak::run_soak(config) {
            Ok(report) => {
                display::print_soak_report(&report, use_color);
                if report.is_clean() {
                    ExitCode::SUCCESS
                } else {
                    log::error!("Soak detected lost, duplicated or reordered messages");
                    ExitCode::FAILURE
                }
            }
            Err(e) => {
                log_error_with_context(&e, "Soak run");
                ExitCode::FAILURE
            }
        },
    }
}

fn load_config(args: &Args) -> Result<BrokerConfig, ConfigError> {
    let mut config = BrokerConfig::load(args.config_file.as_deref())?;
    args.apply_to(&mut config)?;
    Ok(config)
}

/// Explicit setting wins, otherwise color only when stdout is a terminal
fn resolve_color(setting: Option<bool>) -> bool {
    setting.unwrap_or_else(|| std::io::stdout().is_terminal())
}

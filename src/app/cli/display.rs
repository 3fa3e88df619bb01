//! CLI display utilities for formatting output

use crate::app::soak::{QueueOutcome, SoakReport};
use crate::core::config::BrokerConfig;
use crate::core::styles::StyleRole;
use crate::core::version;
use prettytable::{format, Cell, Row, Table};
use std::path::Path;

fn cell(text: &str, role: StyleRole, use_color: bool) -> Cell {
    let cell = Cell::new(text);
    match role.table_spec() {
        Some(spec) if use_color => cell.style_spec(spec),
        _ => cell,
    }
}

fn count_cell(count: u64, use_color: bool) -> Cell {
    let role = if count == 0 {
        StyleRole::Value
    } else {
        StyleRole::Fail
    };
    cell(&count.to_string(), role, use_color)
}

fn outcome_row(outcome: &QueueOutcome, use_color: bool) -> Row {
    let status = if outcome.is_clean() {
        cell("ok", StyleRole::Pass, use_color)
    } else {
        cell("FAIL", StyleRole::Fail, use_color)
    };

    Row::new(vec![
        Cell::new(outcome.topic.name()),
        Cell::new(&outcome.stats.name),
        Cell::new(&outcome.expected.to_string()),
        Cell::new(&outcome.received.to_string()),
        count_cell(outcome.missing, use_color),
        count_cell(outcome.duplicated, use_color),
        count_cell(outcome.unexpected, use_color),
        count_cell(outcome.reordered, use_color),
        Cell::new(&outcome.stats.timeouts.to_string()),
        status,
    ])
}

/// Per-queue table for a soak report
pub fn soak_table(report: &SoakReport, use_color: bool) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

    let titles = [
        "Topic", "Queue", "Expected", "Received", "Missing", "Dup", "Foreign", "Reorder",
        "Timeouts", "Status",
    ];
    table.set_titles(Row::new(
        titles
            .iter()
            .map(|title| cell(title, StyleRole::Header, use_color))
            .collect(),
    ));

    for outcome in &report.outcomes {
        table.add_row(outcome_row(outcome, use_color));
    }
    table
}

/// One-line verdict printed under the table
pub fn soak_summary(report: &SoakReport, use_color: bool) -> String {
    let verdict = if report.is_clean() {
        StyleRole::Pass.paint("PASS", use_color)
    } else {
        StyleRole::Fail.paint("FAIL", use_color)
    };
    let rate = if report.elapsed.as_secs_f64() > 0.0 {
        report.deliveries as f64 / report.elapsed.as_secs_f64()
    } else {
        0.0
    };

    format!(
        "{} {} message(s), {} delivery(ies) across {} relation(s) in {:.3}s ({:.0}/s) with {} producer(s) and {} consumer(s)",
        verdict,
        report.messages,
        report.deliveries,
        report.registry.relations,
        report.elapsed.as_secs_f64(),
        rate,
        report.producers,
        report.consumers
    )
}

pub fn print_soak_report(report: &SoakReport, use_color: bool) {
    let table = soak_table(report, use_color);
    if let Err(e) = table.print_tty(use_color) {
        log::warn!("Could not print soak table: {}", e);
    }
    println!("{}", soak_summary(report, use_color));
}

/// Version, build metadata and effective configuration
pub fn info_text(config: &BrokerConfig, config_path: Option<&Path>, use_color: bool) -> String {
    let key = |k: &str| StyleRole::Key.paint(k, use_color);
    let source = match config_path {
        Some(path) => path.display().to_string(),
        None => StyleRole::Dim.paint("(built-in defaults)", use_color),
    };

    format!(
        "{} {}\n{}: {}\n{}: {}\n{}: {}\n\n{}",
        StyleRole::Header.paint("relaymq", use_color),
        version::version(),
        key("Build time"),
        version::build_time(),
        key("Git hash"),
        version::git_hash(),
        key("Config"),
        source,
        config.to_toml_string()
    )
}

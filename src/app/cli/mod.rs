//! CLI module containing argument parsing and output helpers

pub mod args;
pub mod display;

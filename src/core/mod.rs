//! Core services and infrastructure

pub mod config;
pub mod error_handling;
pub mod logging;
pub mod styles; // styling palette for CLI output
pub mod sync;
pub mod version;

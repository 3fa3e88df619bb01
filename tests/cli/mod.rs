//! CLI Integration Test Modules

pub mod info;
pub mod soak;
pub mod toml_config;

//! Application module

pub mod cli;
pub mod soak;
pub mod startup;

//! CLI library components for the snomap batch mapper.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;

//! CLI definitions and phase commands

pub mod args;
pub mod commands;

pub use args::{CacheArgs, Cli, Commands, RunArgs, SaveArgs};

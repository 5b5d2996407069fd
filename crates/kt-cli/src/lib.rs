//! keytally CLI library.
//!
//! Argument definitions, configuration and the subcommand implementations
//! behind the `kt` binary.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::{CaptureSection, Config};

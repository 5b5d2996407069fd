//! CLI subcommand implementations.

pub mod capture;
pub mod devices;
pub mod events;
pub mod report;
pub mod serve;
pub mod status;

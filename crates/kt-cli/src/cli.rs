//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kt_core::{Action, EventKind};

/// Keyboard and mouse activity tally.
///
/// Records every key and mouse-button press from local input devices and
/// charts how often each one was used.
#[derive(Debug, Parser)]
#[command(name = "kt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Capture input and serve the usage charts over HTTP.
    Serve {
        /// Address to listen on, overriding the configured `bind`.
        #[arg(long)]
        bind: Option<String>,

        /// Serve charts only, without starting the input listeners.
        #[arg(long)]
        no_capture: bool,
    },

    /// Capture input until interrupted.
    Capture,

    /// Print per-button counts for a day or for all time.
    Report {
        /// Report yesterday instead of today.
        #[arg(long, conflicts_with = "all")]
        yesterday: bool,

        /// Report every recorded event.
        #[arg(long)]
        all: bool,

        /// Device class to count (keyboard or mouse).
        #[arg(long)]
        kind: Option<EventKind>,

        /// Action to count (press, release or move).
        #[arg(long)]
        action: Option<Action>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Dump stored events as JSON lines.
    Events {
        /// Only events at or after this Unix timestamp.
        #[arg(long)]
        after: Option<i64>,

        /// Only events before this Unix timestamp.
        #[arg(long)]
        before: Option<i64>,
    },

    /// Show database location and totals.
    Status,

    /// List detected input devices and how they are classified.
    Devices,
}

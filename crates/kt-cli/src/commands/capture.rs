//! Capture command: run the input listeners in the foreground.

use anyhow::{Context, Result};
use kt_capture::{CaptureConfig, Listener};
use kt_core::SystemClock;
use kt_db::Store;
use tracing::{error, info};

pub fn run(store: &Store, config: &CaptureConfig) -> Result<()> {
    let listeners = start(store, config)?;
    info!("capturing input, press Ctrl-C to stop");
    wait(listeners);
    Ok(())
}

/// Starts every configured listener against `store`.
pub fn start(store: &Store, config: &CaptureConfig) -> Result<Vec<Listener>> {
    let listeners =
        kt_capture::start(store, config, &SystemClock).context("failed to start input capture")?;
    for listener in &listeners {
        info!(
            listener = %listener.name,
            kind = %listener.kind,
            device = %listener.path.display(),
            "listener started"
        );
    }
    Ok(listeners)
}

/// Blocks until every listener has stopped.
///
/// A listener stops on its own only when its device goes away, so this
/// normally runs until the process is interrupted.
pub fn wait(listeners: Vec<Listener>) {
    for listener in listeners {
        match listener.handle.join() {
            Ok(stats) => info!(listener = %listener.name, ?stats, "listener exited"),
            Err(_) => error!(listener = %listener.name, "listener panicked"),
        }
    }
    info!("all listeners have stopped");
}

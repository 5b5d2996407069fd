//! Events command for dumping stored events as JSON lines.

use std::io::Write;

use anyhow::Result;
use kt_core::TimeWindow;
use kt_db::Database;

/// Builds the window for `--after` / `--before`.
pub const fn window(after: Option<i64>, before: Option<i64>) -> TimeWindow {
    TimeWindow {
        from: after,
        to: before,
    }
}

pub fn run<W: Write>(writer: &mut W, db: &Database, window: TimeWindow) -> Result<()> {
    let events = db.list_events(window)?;
    tracing::debug!(count = events.len(), "dumping events");
    for event in &events {
        serde_json::to_writer(&mut *writer, event)?;
        writeln!(writer)?;
    }
    Ok(())
}

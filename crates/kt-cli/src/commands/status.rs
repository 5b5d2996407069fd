//! Status command for showing what the store holds.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use chrono::DateTime;
use kt_db::Database;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    database_path: &Path,
    time_zone: &str,
) -> Result<()> {
    let summary = db.summary()?;

    writeln!(writer, "keytally status")?;
    writeln!(writer, "Database: {}", database_path.display())?;
    writeln!(writer, "Time zone: {time_zone}")?;

    if summary.total == 0 {
        writeln!(writer, "No events recorded.")?;
        return Ok(());
    }

    writeln!(writer, "Events: {}", summary.total)?;
    for kind in &summary.by_kind {
        writeln!(writer, "- {}: {}", kind.kind, kind.count)?;
    }
    if let Some(ts) = summary.last_event_at {
        let when = DateTime::from_timestamp(ts, 0)
            .map_or_else(|| ts.to_string(), |dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string());
        writeln!(writer, "Last event: {when}")?;
    }

    Ok(())
}

/// The host's IANA time zone name, which decides where "today" starts.
pub fn local_time_zone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|err| {
        tracing::debug!(error = %err, "could not determine time zone");
        "unknown".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use kt_core::{Action, Event, EventKind};

    #[test]
    fn status_command_outputs_totals_per_kind() {
        let mut db = Database::open_in_memory().unwrap();
        for (kind, ts) in [
            (EventKind::Mouse, 1_741_608_000),
            (EventKind::Keyboard, 1_741_564_810),
            (EventKind::Keyboard, 1_741_564_820),
        ] {
            db.add_event(&Event::new(kind, Action::Press, "x", ts).unwrap())
                .unwrap();
        }

        let mut output = Vec::new();
        run(&mut output, &db, Path::new("/data/keytally.db"), "Europe/Berlin").unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        keytally status
        Database: /data/keytally.db
        Time zone: Europe/Berlin
        Events: 3
        - keyboard: 2
        - mouse: 1
        Last event: 2025-03-10 12:00:00 UTC
        ");
    }

    #[test]
    fn status_command_on_empty_store() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        run(&mut output, &db, Path::new("/data/keytally.db"), "UTC").unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        keytally status
        Database: /data/keytally.db
        Time zone: UTC
        No events recorded.
        ");
    }
}

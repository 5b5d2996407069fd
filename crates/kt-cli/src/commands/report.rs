//! Report command for printing per-button counts.

use std::io::Write;

use anyhow::Result;
use kt_core::{DayBoundaries, View};
use kt_db::Database;
use kt_web::{Report, ReportFilter};

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    view: View,
    filter: ReportFilter,
    bounds: &DayBoundaries,
    json: bool,
) -> Result<()> {
    let report = Report::build(db, view, filter, bounds)?;

    if json {
        serde_json::to_writer_pretty(&mut *writer, &report)?;
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(writer, "{}", report.title())?;
    if report.counts.is_empty() {
        writeln!(writer, "No events recorded.")?;
        return Ok(());
    }
    for count in &report.counts {
        writeln!(writer, "- {}: {}", count.button, count.count)?;
    }
    writeln!(writer, "Total: {}", report.total)?;

    Ok(())
}

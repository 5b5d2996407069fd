//! Mapping reporting views onto aggregation queries.

use kt_core::{Action, DayBoundaries, EventKind, TimeWindow, View};
use kt_db::{ButtonCount, Database, StoreError};
use serde::{Deserialize, Serialize};

/// The event dimension a report counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub kind: EventKind,
    pub action: Action,
}

impl Default for ReportFilter {
    fn default() -> Self {
        Self {
            kind: EventKind::Keyboard,
            action: Action::Press,
        }
    }
}

impl ReportFilter {
    /// Replaces whichever fields are given.
    #[must_use]
    pub fn with_overrides(self, kind: Option<EventKind>, action: Option<Action>) -> Self {
        Self {
            kind: kind.unwrap_or(self.kind),
            action: action.unwrap_or(self.action),
        }
    }
}

/// Per-button counts for one view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub view: View,
    pub filter: ReportFilter,
    pub window: TimeWindow,
    pub total: i64,
    pub counts: Vec<ButtonCount>,
}

impl Report {
    /// Runs the query behind `view`, windowed by `bounds`.
    pub fn build(
        db: &Database,
        view: View,
        filter: ReportFilter,
        bounds: &DayBoundaries,
    ) -> Result<Self, StoreError> {
        let window = bounds.window(view);
        let counts = db.count_by_button(filter.kind, filter.action, window)?;
        let total = counts.iter().map(|c| c.count).sum();
        Ok(Self {
            view,
            filter,
            window,
            total,
            counts,
        })
    }

    /// Chart title, e.g. `Today: keyboard press`.
    pub fn title(&self) -> String {
        format!(
            "{}: {} {}",
            self.view.title(),
            self.filter.kind,
            self.filter.action
        )
    }
}

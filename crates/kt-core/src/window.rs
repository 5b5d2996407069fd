//! Clock access and the time windows that scope aggregations.
//!
//! Window boundaries are computed once per request as a [`DayBoundaries`]
//! snapshot and passed down, so a request that straddles midnight still
//! uses a single notion of "today".

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::event::ValidationError;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current Unix timestamp, second resolution.
    fn now(&self) -> i64;

    /// Day boundaries for the current instant, all in one time zone.
    fn boundaries(&self) -> DayBoundaries;
}

/// The host clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }

    fn boundaries(&self) -> DayBoundaries {
        DayBoundaries::at(&Local::now())
    }
}

/// A clock frozen at one instant in a fixed time zone.
#[derive(Debug, Clone)]
pub struct FixedClock<Tz: TimeZone> {
    instant: DateTime<Tz>,
}

impl<Tz: TimeZone> FixedClock<Tz> {
    pub const fn new(instant: DateTime<Tz>) -> Self {
        Self { instant }
    }
}

impl<Tz> Clock for FixedClock<Tz>
where
    Tz: TimeZone + Send + Sync,
    Tz::Offset: Send + Sync,
{
    fn now(&self) -> i64 {
        self.instant.timestamp()
    }

    fn boundaries(&self) -> DayBoundaries {
        DayBoundaries::at(&self.instant)
    }
}

/// Local-midnight boundaries for one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayBoundaries {
    pub now: i64,
    pub start_of_today: i64,
    pub start_of_yesterday: i64,
}

impl DayBoundaries {
    /// Computes boundaries in the time zone carried by `instant`.
    pub fn at<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        let tz = instant.timezone();
        let today = instant.date_naive();
        let yesterday = today.pred_opt().unwrap_or(today);
        Self {
            now: instant.timestamp(),
            start_of_today: local_midnight(&tz, today),
            start_of_yesterday: local_midnight(&tz, yesterday),
        }
    }

    #[must_use]
    pub const fn window(&self, view: View) -> TimeWindow {
        match view {
            View::Today => TimeWindow::since(self.start_of_today),
            View::Yesterday => TimeWindow::between(self.start_of_yesterday, self.start_of_today),
            View::AllTime => TimeWindow::unbounded(),
        }
    }
}

/// Unix timestamp of midnight on `date` in `tz`.
///
/// On a DST fall-back the earlier instant wins. When midnight falls in a
/// spring-forward gap, 01:00 is used instead.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.timestamp(),
        LocalResult::None => {
            let one_am = midnight + chrono::Duration::hours(1);
            tz.from_local_datetime(&one_am)
                .earliest()
                .map_or_else(|| midnight.and_utc().timestamp(), |dt| dt.timestamp())
        }
    }
}

/// Half-open interval `[from, to)` over `occurred_at`. Missing bounds are open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TimeWindow {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

impl TimeWindow {
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            from: None,
            to: None,
        }
    }

    #[must_use]
    pub const fn since(from: i64) -> Self {
        Self {
            from: Some(from),
            to: None,
        }
    }

    #[must_use]
    pub const fn between(from: i64, to: i64) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    #[must_use]
    pub fn contains(&self, ts: i64) -> bool {
        self.from.is_none_or(|from| ts >= from) && self.to.is_none_or(|to| ts < to)
    }
}

/// A named reporting view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Today,
    Yesterday,
    #[serde(rename = "all", alias = "all_time")]
    AllTime,
}

impl View {
    pub const ALL: [Self; 3] = [Self::Today, Self::Yesterday, Self::AllTime];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::AllTime => "all",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::AllTime => "All time",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for View {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(Self::Today),
            "yesterday" => Ok(Self::Yesterday),
            "all" | "all_time" => Ok(Self::AllTime),
            _ => Err(ValidationError::UnknownName {
                field: "view",
                value: s.to_string(),
            }),
        }
    }
}

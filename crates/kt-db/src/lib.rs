//! Storage layer for keytally.
//!
//! Provides persistence for captured events and the aggregation queries
//! behind reports, using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! Concurrent use goes through a [`Store`] handle instead: every listener thread and
//! every report request takes its own connection from [`Store::connect`].
//!
//! - The database runs in WAL mode, so readers never block the writer and see only
//!   committed rows as of the start of their statement.
//! - Writes use `BEGIN IMMEDIATE`, so concurrent writers queue on SQLite's write lock
//!   rather than failing half-way through a transaction.
//! - Every connection carries a busy timeout. Waiting longer than that surfaces as
//!   [`StoreError::Timeout`] instead of blocking the caller indefinitely.
//!
//! # Schema
//!
//! ## Events
//!
//! `event_record(id, event_type, event_at, button, button_event_type)` is
//! append-only. Triggers reject `UPDATE` and `DELETE`, and `AUTOINCREMENT`
//! guarantees an id is never handed out twice.
//!
//! `event_type` and `button_event_type` hold integer codes (see
//! [`EventKind::code`] and [`Action::code`]). `event_at` is a Unix timestamp in
//! seconds. CHECK constraints reject the reserved "none" code `0` and negative
//! timestamps.
//!
//! An existing `event_record` table is used as found, including one created
//! without the constraints above. Reads address rows by `rowid`, and rows with
//! a NULL `button` carry no usable key, so every read skips them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use kt_core::{Action, Event, EventId, EventKind, EventSink, StoredEvent, TimeWindow, ValidationError};
use rusqlite::{Connection, ErrorCode, Row, TransactionBehavior, params};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[source] rusqlite::Error),
    /// The database stayed locked for longer than the busy timeout.
    #[error("timed out waiting for the database: {0}")]
    Timeout(#[source] rusqlite::Error),
    /// A stored value does not map to a known variant.
    #[error("invalid stored value: {0}")]
    InvalidValue(#[from] ValidationError),
    /// A stored row does not describe a valid event.
    #[error("invalid event record {id}: {source}")]
    InvalidRecord {
        id: i64,
        #[source]
        source: ValidationError,
    },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => Self::Timeout(err),
            _ => Self::Sqlite(err),
        }
    }
}

impl StoreError {
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Connection settings shared by every connection a [`Store`] opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// How long a statement waits on a locked database before giving up.
    pub busy_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// Handle to an on-disk event store.
///
/// Cheap to clone. Hands out one [`Database`] connection per caller.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    options: StoreOptions,
}

impl Store {
    /// Opens the store at `path`, creating the file and schema if necessary.
    pub fn open(path: impl Into<PathBuf>, options: StoreOptions) -> Result<Self, StoreError> {
        let store = Self {
            path: path.into(),
            options,
        };
        store.connect()?;
        Ok(store)
    }

    /// Opens a new connection to the store.
    pub fn connect(&self) -> Result<Database, StoreError> {
        Database::open(&self.path, &self.options)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub const fn options(&self) -> &StoreOptions {
        &self.options
    }
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// Number of events recorded for one button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonCount {
    pub button: String,
    pub count: i64,
}

/// Event total for one device class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindTotal {
    pub kind: EventKind,
    pub count: i64,
}

/// Overview of the store's contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: i64,
    pub by_kind: Vec<KindTotal>,
    pub last_event_at: Option<i64>,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path, options: &StoreOptions) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(options.busy_timeout)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!(path = %path.display(), journal_mode = %mode, "opened database");
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "
            -- One row per captured key or button transition
            -- event_type: 1 = mouse, 2 = keyboard
            -- button_event_type: 1 = release, 2 = press, 3 = move
            -- event_at: Unix seconds
            CREATE TABLE IF NOT EXISTS event_record (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                event_type INTEGER NOT NULL CHECK (event_type IN (1, 2)),
                event_at INTEGER NOT NULL CHECK (event_at >= 0),
                button TEXT NOT NULL DEFAULT '',
                button_event_type INTEGER NOT NULL CHECK (button_event_type IN (1, 2, 3))
            );

            CREATE INDEX IF NOT EXISTS idx_event_record_filter
                ON event_record(event_type, button_event_type, event_at);
            CREATE INDEX IF NOT EXISTS idx_event_record_event_at ON event_record(event_at);

            CREATE TRIGGER IF NOT EXISTS event_record_no_update
            BEFORE UPDATE ON event_record
            BEGIN
                SELECT RAISE(ABORT, 'events are append-only');
            END;

            CREATE TRIGGER IF NOT EXISTS event_record_no_delete
            BEFORE DELETE ON event_record
            BEGIN
                SELECT RAISE(ABORT, 'events are append-only');
            END;
            ",
        )?;
        Ok(())
    }

    /// Appends one event and commits it.
    ///
    /// The id is assigned by the store. A failed call leaves nothing behind.
    pub fn add_event(&mut self, event: &Event) -> Result<EventId, StoreError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO event_record (event_type, event_at, button, button_event_type)
             VALUES (?, ?, ?, ?)",
            params![
                event.kind().code(),
                event.occurred_at(),
                event.button(),
                event.action().code(),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(EventId::new(id))
    }

    /// Counts events of one kind and action per button within a window.
    ///
    /// Results are ordered by button name (byte-wise, ascending).
    pub fn count_by_button(
        &self,
        kind: EventKind,
        action: Action,
        window: TimeWindow,
    ) -> Result<Vec<ButtonCount>, StoreError> {
        let mut stmt = self.conn.prepare_cached(
            "
            SELECT button, COUNT(*)
            FROM event_record
            WHERE event_type = ?1
              AND button_event_type = ?2
              AND button IS NOT NULL
              AND (?3 IS NULL OR event_at >= ?3)
              AND (?4 IS NULL OR event_at < ?4)
            GROUP BY button
            ORDER BY button ASC
            ",
        )?;
        let rows = stmt.query_map(
            params![kind.code(), action.code(), window.from, window.to],
            |row| {
                Ok(ButtonCount {
                    button: row.get(0)?,
                    count: row.get(1)?,
                })
            },
        )?;
        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }
        Ok(counts)
    }

    /// Lists events within a window, ordered by time then id.
    pub fn list_events(&self, window: TimeWindow) -> Result<Vec<StoredEvent>, StoreError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT rowid, event_type, event_at, button, button_event_type
            FROM event_record
            WHERE button IS NOT NULL
              AND event_at IS NOT NULL
              AND (?1 IS NULL OR event_at >= ?1)
              AND (?2 IS NULL OR event_at < ?2)
            ORDER BY event_at ASC, rowid ASC
            ",
        )?;
        let rows = stmt.query_map(params![window.from, window.to], raw_event_row)?;
        let mut events = Vec::new();
        for row in rows {
            events.push(row?.into_stored()?);
        }
        Ok(events)
    }

    /// Totals per device class and the time of the latest event.
    pub fn summary(&self) -> Result<Summary, StoreError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT event_type, COUNT(*)
            FROM event_record
            WHERE button IS NOT NULL
            GROUP BY event_type
            ORDER BY event_type DESC
            ",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?;
        let mut by_kind = Vec::new();
        let mut total = 0;
        for row in rows {
            let (code, count) = row?;
            let kind = EventKind::from_code(code)?;
            total += count;
            by_kind.push(KindTotal { kind, count });
        }
        let last_event_at: Option<i64> = self.conn.query_row(
            "SELECT MAX(event_at) FROM event_record WHERE button IS NOT NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(Summary {
            total,
            by_kind,
            last_event_at,
        })
    }
}

impl EventSink for Database {
    type Error = StoreError;

    fn add_event(&mut self, event: &Event) -> Result<EventId, Self::Error> {
        Self::add_event(self, event)
    }
}

#[derive(Debug)]
struct RawEventRow {
    id: i64,
    kind: i64,
    occurred_at: i64,
    button: String,
    action: i64,
}

impl RawEventRow {
    fn into_stored(self) -> Result<StoredEvent, StoreError> {
        let id = self.id;
        let invalid = |source| StoreError::InvalidRecord { id, source };
        let kind = EventKind::from_code(self.kind).map_err(invalid)?;
        let action = Action::from_code(self.action).map_err(invalid)?;
        let event = Event::new(kind, action, self.button, self.occurred_at).map_err(invalid)?;
        Ok(StoredEvent {
            id: EventId::new(id),
            event,
        })
    }
}

fn raw_event_row(row: &Row<'_>) -> rusqlite::Result<RawEventRow> {
    Ok(RawEventRow {
        id: row.get(0)?,
        kind: row.get(1)?,
        occurred_at: row.get(2)?,
        button: row.get(3)?,
        action: row.get(4)?,
    })
}

//! Captured input events.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for event fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Timestamps are Unix seconds and cannot precede the epoch.
    #[error("occurred_at must be non-negative, got {value}")]
    NegativeTimestamp { value: i64 },

    /// A stored code does not map to a known variant.
    #[error("unknown {field} code: {code}")]
    UnknownCode { field: &'static str, code: i64 },

    /// A name does not map to a known variant.
    #[error("unknown {field}: {value}")]
    UnknownName { field: &'static str, value: String },
}

/// The device class that produced an event.
///
/// There is no "none" variant: an event without a source cannot be built.
/// Code `0` is reserved for it in storage and rejected on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Keyboard,
    Mouse,
}

impl EventKind {
    /// Integer code used in the `event_record.event_type` column.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Mouse => 1,
            Self::Keyboard => 2,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, ValidationError> {
        match code {
            1 => Ok(Self::Mouse),
            2 => Ok(Self::Keyboard),
            _ => Err(ValidationError::UnknownCode { field: "kind", code }),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keyboard => "keyboard",
            Self::Mouse => "mouse",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keyboard" => Ok(Self::Keyboard),
            "mouse" => Ok(Self::Mouse),
            _ => Err(ValidationError::UnknownName {
                field: "kind",
                value: s.to_string(),
            }),
        }
    }
}

/// The nature of a button transition.
///
/// Key-down and mouse-button-down are `Press`; key-up and mouse-button-up
/// are `Release`, for both device classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Press,
    Release,
    Move,
}

impl Action {
    /// Integer code used in the `event_record.button_event_type` column.
    ///
    /// Press is stored as `2` and Release as `1`, matching what earlier
    /// databases recorded for down and up transitions.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Release => 1,
            Self::Press => 2,
            Self::Move => 3,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, ValidationError> {
        match code {
            1 => Ok(Self::Release),
            2 => Ok(Self::Press),
            3 => Ok(Self::Move),
            _ => Err(ValidationError::UnknownCode {
                field: "action",
                code,
            }),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Press => "press",
            Self::Release => "release",
            Self::Move => "move",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "press" => Ok(Self::Press),
            "release" => Ok(Self::Release),
            "move" => Ok(Self::Move),
            _ => Err(ValidationError::UnknownName {
                field: "action",
                value: s.to_string(),
            }),
        }
    }
}

/// An input occurrence that has not been persisted yet.
///
/// Fields are private so the timestamp invariant holds for every instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    kind: EventKind,
    action: Action,
    button: String,
    occurred_at: i64,
}

impl Event {
    pub fn new(
        kind: EventKind,
        action: Action,
        button: impl Into<String>,
        occurred_at: i64,
    ) -> Result<Self, ValidationError> {
        if occurred_at < 0 {
            return Err(ValidationError::NegativeTimestamp { value: occurred_at });
        }
        Ok(Self {
            kind,
            action,
            button: button.into(),
            occurred_at,
        })
    }

    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    #[must_use]
    pub const fn action(&self) -> Action {
        self.action
    }

    /// The key or button name. Empty when the name could not be determined.
    #[must_use]
    pub fn button(&self) -> &str {
        &self.button
    }

    /// Unix timestamp in seconds.
    #[must_use]
    pub const fn occurred_at(&self) -> i64 {
        self.occurred_at
    }
}

/// Store-assigned event identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(i64);

impl EventId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An event read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredEvent {
    pub id: EventId,
    #[serde(flatten)]
    pub event: Event,
}

/// Destination for captured events.
///
/// Each successful call persists exactly one record and commits it before
/// returning. Implementations own their write transaction.
pub trait EventSink {
    type Error: std::error::Error + Send + Sync + 'static;

    fn add_event(&mut self, event: &Event) -> Result<EventId, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_codes_roundtrip_and_reject_none() {
        for kind in [EventKind::Keyboard, EventKind::Mouse] {
            assert_eq!(EventKind::from_code(kind.code()), Ok(kind));
        }
        assert_eq!(
            EventKind::from_code(0),
            Err(ValidationError::UnknownCode {
                field: "kind",
                code: 0
            })
        );
    }

    #[test]
    fn action_codes_keep_stored_numbering() {
        assert_eq!(Action::Release.code(), 1);
        assert_eq!(Action::Press.code(), 2);
        assert_eq!(Action::Move.code(), 3);
        assert!(Action::from_code(0).is_err());
        assert!(Action::from_code(4).is_err());
    }

    #[test]
    fn names_parse_case_sensitively() {
        assert_eq!("mouse".parse::<EventKind>(), Ok(EventKind::Mouse));
        assert_eq!("release".parse::<Action>(), Ok(Action::Release));
        let err = "Mouse".parse::<EventKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown kind: Mouse");
    }

    #[test]
    fn event_rejects_negative_timestamp() {
        let err = Event::new(EventKind::Keyboard, Action::Press, "a", -1).unwrap_err();
        assert_eq!(err, ValidationError::NegativeTimestamp { value: -1 });
    }

    #[test]
    fn event_allows_empty_button() {
        let event = Event::new(EventKind::Mouse, Action::Release, "", 0).unwrap();
        assert_eq!(event.button(), "");
        assert_eq!(event.occurred_at(), 0);
    }

    #[test]
    fn stored_event_serializes_flat() {
        let stored = StoredEvent {
            id: EventId::new(7),
            event: Event::new(EventKind::Keyboard, Action::Press, "space", 1_700_000_000).unwrap(),
        };
        let json = serde_json::to_string(&stored).unwrap();
        assert_eq!(
            json,
            r#"{"id":7,"kind":"keyboard","action":"press","button":"space","occurred_at":1700000000}"#
        );
    }
}

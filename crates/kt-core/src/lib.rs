//! Core domain logic for keytally.
//!
//! This crate contains the fundamental types and logic for:
//! - Events: the captured input model and the sink they are written to
//! - Windows: clock access, day boundaries and reporting views
//! - Capture: translating raw device input through per-class adapters

pub mod capture;
pub mod event;
pub mod keymap;
pub mod window;

pub use capture::{
    Adapter, InputSource, ListenerError, ListenerStats, RawInput, Transition, Translation,
    run_listener, spawn_listener,
};
pub use event::{Action, Event, EventId, EventKind, EventSink, StoredEvent, ValidationError};
pub use keymap::{KeyResolver, LinuxKeymap, ResolvedKey};
pub use window::{Clock, DayBoundaries, FixedClock, SystemClock, TimeWindow, View};

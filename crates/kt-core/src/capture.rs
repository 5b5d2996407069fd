//! Translating raw device input into events and feeding them to a sink.
//!
//! An [`Adapter`] is bound to one device class. [`run_listener`] drives an
//! [`InputSource`] until it closes, handing every translated event to the
//! sink as its own call. Nothing is queued or batched on the way.

use std::io;
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::event::{Action, Event, EventKind, EventSink, ValidationError};
use crate::keymap::{KeyResolver, ResolvedKey};
use crate::window::Clock;

/// Direction of a key or button transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Down,
    Up,
    /// Auto-repeat while a key is held.
    Repeat,
}

/// One raw notification from the host input subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawInput {
    Key { code: u16, transition: Transition },
    Motion,
    Scroll,
}

/// What an adapter made of a raw notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Event(Event),
    /// Input this adapter does not record (motion, scroll, repeats).
    Ignored,
    /// A key or button with no known name.
    Unresolvable { code: u16 },
    /// The event could not be built, e.g. the clock reads before the epoch.
    Invalid(ValidationError),
}

/// Turns raw notifications from one device class into events.
#[derive(Debug, Clone)]
pub struct Adapter<R> {
    kind: EventKind,
    resolver: R,
}

impl<R: KeyResolver> Adapter<R> {
    pub const fn keyboard(resolver: R) -> Self {
        Self {
            kind: EventKind::Keyboard,
            resolver,
        }
    }

    pub const fn mouse(resolver: R) -> Self {
        Self {
            kind: EventKind::Mouse,
            resolver,
        }
    }

    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn translate(&self, raw: RawInput, occurred_at: i64) -> Translation {
        let RawInput::Key { code, transition } = raw else {
            return Translation::Ignored;
        };
        let action = match transition {
            Transition::Down => Action::Press,
            Transition::Up => Action::Release,
            Transition::Repeat => return Translation::Ignored,
        };
        let Some(button) = self.resolve(code).name() else {
            return Translation::Unresolvable { code };
        };
        match Event::new(self.kind, action, button, occurred_at) {
            Ok(event) => Translation::Event(event),
            Err(err) => Translation::Invalid(err),
        }
    }

    pub fn resolve(&self, code: u16) -> ResolvedKey {
        match self.kind {
            EventKind::Keyboard => self.resolver.resolve_key(code),
            EventKind::Mouse => self.resolver.resolve_button(code),
        }
    }
}

/// A blocking stream of raw notifications from one device.
pub trait InputSource {
    /// Waits for the next batch of notifications.
    ///
    /// Returns `Ok(None)` once the source is closed.
    fn wait(&mut self) -> io::Result<Option<Vec<RawInput>>>;
}

/// Counters for one listener's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerStats {
    pub stored: u64,
    pub ignored: u64,
    pub unresolvable: u64,
    pub invalid: u64,
    pub failed: u64,
}

/// A source failure, with the counters gathered before it.
#[derive(Debug, Error)]
#[error("input source failed after {} stored events: {source}", .stats.stored)]
pub struct ListenerError {
    pub stats: ListenerStats,
    #[source]
    pub source: io::Error,
}

/// Runs a listener until its source closes or fails.
///
/// Unresolvable input is logged and dropped. Sink failures are logged and
/// the event is lost; the listener keeps running.
pub fn run_listener<R, S, K, C>(
    adapter: &Adapter<R>,
    source: &mut S,
    sink: &mut K,
    clock: &C,
) -> Result<ListenerStats, ListenerError>
where
    R: KeyResolver,
    S: InputSource + ?Sized,
    K: EventSink + ?Sized,
    C: Clock + ?Sized,
{
    let mut stats = ListenerStats::default();
    loop {
        let batch = match source.wait() {
            Ok(Some(batch)) => batch,
            Ok(None) => return Ok(stats),
            Err(err) => return Err(ListenerError { stats, source: err }),
        };
        for raw in batch {
            match adapter.translate(raw, clock.now()) {
                Translation::Event(event) => match sink.add_event(&event) {
                    Ok(id) => {
                        stats.stored += 1;
                        debug!(%id, kind = %event.kind(), action = %event.action(), button = event.button(), "event stored");
                    }
                    Err(err) => {
                        stats.failed += 1;
                        warn!(error = %err, kind = %event.kind(), button = event.button(), "failed to store event");
                    }
                },
                Translation::Ignored => stats.ignored += 1,
                Translation::Unresolvable { code } => {
                    stats.unresolvable += 1;
                    warn!(kind = %adapter.kind(), code, "dropping input with unresolvable button");
                }
                Translation::Invalid(err) => {
                    stats.invalid += 1;
                    warn!(kind = %adapter.kind(), error = %err, "dropping invalid event");
                }
            }
        }
    }
}

/// Starts a listener on its own named thread.
///
/// The thread is detached from process shutdown: returning from `main`
/// does not wait for it.
pub fn spawn_listener<R, S, K, C>(
    name: String,
    adapter: Adapter<R>,
    mut source: S,
    mut sink: K,
    clock: C,
) -> io::Result<JoinHandle<ListenerStats>>
where
    R: KeyResolver + 'static,
    S: InputSource + Send + 'static,
    K: EventSink + Send + 'static,
    C: Clock + 'static,
{
    thread::Builder::new().name(name).spawn(move || {
        let name = thread::current().name().unwrap_or("listener").to_string();
        info!(listener = %name, kind = %adapter.kind(), "listener starting");
        match run_listener(&adapter, &mut source, &mut sink, &clock) {
            Ok(stats) => {
                info!(listener = %name, ?stats, "listener source closed");
                stats
            }
            Err(err) => {
                error!(
                    listener = %name,
                    error = %err.source,
                    stats = ?err.stats,
                    "listener stopped"
                );
                err.stats
            }
        }
    })
}

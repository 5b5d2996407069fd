//! Listener threads writing into one on-disk store.

use std::collections::VecDeque;
use std::io;

use kt_core::keymap::BTN_MOUSE;
use kt_core::{
    Action, Adapter, EventKind, InputSource, LinuxKeymap, RawInput, SystemClock, TimeWindow,
    Transition, spawn_listener,
};
use kt_db::{ButtonCount, KindTotal, Store, StoreOptions};

const BATCHES: usize = 40;

/// Each batch is one full click or keystroke: a press then a release.
struct ScriptedSource {
    batches: VecDeque<Vec<RawInput>>,
}

impl ScriptedSource {
    fn clicks(code: u16, times: usize) -> Self {
        let click = vec![
            RawInput::Key {
                code,
                transition: Transition::Down,
            },
            RawInput::Motion,
            RawInput::Key {
                code,
                transition: Transition::Up,
            },
        ];
        Self {
            batches: std::iter::repeat_n(click, times).collect(),
        }
    }
}

impl InputSource for ScriptedSource {
    fn wait(&mut self) -> io::Result<Option<Vec<RawInput>>> {
        Ok(self.batches.pop_front())
    }
}

#[test]
fn concurrent_listeners_store_every_event() {
    let temp = tempfile::tempdir().unwrap();
    let store = Store::open(temp.path().join("kt.db"), StoreOptions::default()).unwrap();

    let keyboard = spawn_listener(
        "kt-keyboard-test".to_string(),
        Adapter::keyboard(LinuxKeymap),
        ScriptedSource::clicks(30, BATCHES),
        store.connect().unwrap(),
        SystemClock,
    )
    .unwrap();
    let mouse = spawn_listener(
        "kt-mouse-test".to_string(),
        Adapter::mouse(LinuxKeymap),
        ScriptedSource::clicks(BTN_MOUSE, BATCHES),
        store.connect().unwrap(),
        SystemClock,
    )
    .unwrap();

    let keyboard = keyboard.join().unwrap();
    let mouse = mouse.join().unwrap();
    let per_listener = 2 * BATCHES as u64;
    assert_eq!((keyboard.stored, keyboard.failed), (per_listener, 0));
    assert_eq!((mouse.stored, mouse.failed), (per_listener, 0));
    assert_eq!(mouse.ignored, BATCHES as u64);

    let db = store.connect().unwrap();
    let summary = db.summary().unwrap();
    assert_eq!(summary.total, 2 * per_listener as i64);
    assert_eq!(
        summary.by_kind,
        vec![
            KindTotal {
                kind: EventKind::Keyboard,
                count: per_listener as i64,
            },
            KindTotal {
                kind: EventKind::Mouse,
                count: per_listener as i64,
            },
        ]
    );

    let presses = db
        .count_by_button(EventKind::Keyboard, Action::Press, TimeWindow::unbounded())
        .unwrap();
    assert_eq!(
        presses,
        vec![ButtonCount {
            button: "a".to_string(),
            count: BATCHES as i64,
        }]
    );

    let events = db.list_events(TimeWindow::unbounded()).unwrap();
    assert_eq!(events.len(), 2 * BATCHES * 2);
    let mut ids: Vec<i64> = events.iter().map(|e| e.id.get()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), events.len());
}

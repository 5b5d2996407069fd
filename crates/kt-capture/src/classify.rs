//! Device classification and raw event decoding.
//!
//! Works on the numeric values from `linux/input-event-codes.h` so it can be
//! exercised without a device.

use kt_core::{EventKind, RawInput, Transition};

pub const EV_KEY: u16 = 0x01;
pub const EV_REL: u16 = 0x02;

pub const KEY_SPACE: u16 = 57;
pub const KEY_A: u16 = 30;
pub const BTN_LEFT: u16 = 0x110;
pub const BTN_TOOL_FINGER: u16 = 0x145;

const BTN_MISC: u16 = 0x100;
const BTN_MOUSE_LAST: u16 = 0x117;
/// First code after the button blocks where keyboard keys resume.
const KEY_OK: u16 = 0x160;

/// `KEY_A` through `KEY_Z`, in alphabetical order.
const LETTERS: [u16; 26] = [
    30, 48, 46, 32, 18, 33, 34, 35, 23, 36, 37, 38, 50, 49, 24, 25, 16, 19, 31, 20, 22, 47, 17,
    45, 21, 44,
];

const REL_X: u16 = 0x00;
const REL_Y: u16 = 0x01;
const ABS_X: u16 = 0x00;
const ABS_Y: u16 = 0x01;

/// How a device reports pointer position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerAxes {
    /// `REL_X` and `REL_Y`, as on a mouse or trackball.
    pub relative: bool,
    /// `ABS_X` and `ABS_Y`.
    pub absolute: bool,
    /// `INPUT_PROP_POINTER`: the absolute axes move a cursor rather than
    /// mapping onto a screen.
    pub pointer_property: bool,
}

impl PointerAxes {
    /// Relative motion, or absolute motion that drives a cursor the way a
    /// touchpad does. Touchscreens and tablets fail the second test.
    fn moves_cursor(self, has_key: impl Fn(u16) -> bool) -> bool {
        self.relative || (self.absolute && (self.pointer_property || has_key(BTN_TOOL_FINGER)))
    }
}

/// Device classes a device can feed, keyboard first.
pub fn classify(has_key: impl Fn(u16) -> bool, pointer: PointerAxes) -> Vec<EventKind> {
    let mut classes = Vec::new();
    if has_key(KEY_SPACE) && LETTERS.iter().all(|&code| has_key(code)) {
        classes.push(EventKind::Keyboard);
    }
    if has_key(BTN_LEFT) && pointer.moves_cursor(&has_key) {
        classes.push(EventKind::Mouse);
    }
    classes
}

/// Decodes one kernel event for a listener of the given class.
///
/// Returns `None` for events that class never sees, such as sync reports or
/// keyboard keys on a mouse listener.
pub const fn decode(class: EventKind, event_type: u16, code: u16, value: i32) -> Option<RawInput> {
    match (class, event_type) {
        (EventKind::Keyboard, EV_KEY) if code < BTN_MISC || code >= KEY_OK => key(code, value),
        (EventKind::Mouse, EV_KEY) if code >= BTN_LEFT && code <= BTN_MOUSE_LAST => {
            key(code, value)
        }
        (EventKind::Mouse, EV_REL) => match code {
            REL_X | REL_Y => Some(RawInput::Motion),
            _ => Some(RawInput::Scroll),
        },
        _ => None,
    }
}

const fn key(code: u16, value: i32) -> Option<RawInput> {
    let transition = match value {
        0 => Transition::Up,
        1 => Transition::Down,
        2 => Transition::Repeat,
        _ => return None,
    };
    Some(RawInput::Key { code, transition })
}

/// Whether relative axis `code` marks a pointer.
pub const fn is_pointer_axis(code: u16) -> bool {
    matches!(code, REL_X | REL_Y)
}

/// Whether absolute axis `code` is a position axis.
pub const fn is_position_axis(code: u16) -> bool {
    matches!(code, ABS_X | ABS_Y)
}

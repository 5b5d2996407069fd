//! Mapping raw key and button codes to button names.
//!
//! Printable keys resolve to the character they produce without modifiers
//! on a US layout; everything else gets a symbolic name. Codes with no
//! known name resolve to [`ResolvedKey::Unresolvable`] so callers can drop
//! them explicitly.

use std::fmt;

/// The outcome of resolving a raw code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedKey {
    Char(char),
    Named(&'static str),
    Unresolvable(u16),
}

impl ResolvedKey {
    /// The stored button name, or `None` when unresolvable.
    #[must_use]
    pub fn name(self) -> Option<String> {
        match self {
            Self::Char(c) => Some(c.to_string()),
            Self::Named(name) => Some(name.to_string()),
            Self::Unresolvable(_) => None,
        }
    }
}

impl fmt::Display for ResolvedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{c}"),
            Self::Named(name) => write!(f, "{name}"),
            Self::Unresolvable(code) => write!(f, "<unresolvable {code}>"),
        }
    }
}

/// Platform-specific key and button naming.
pub trait KeyResolver: Send + Sync {
    fn resolve_key(&self, code: u16) -> ResolvedKey;

    fn resolve_button(&self, code: u16) -> ResolvedKey;
}

/// Names for Linux input-event codes (`linux/input-event-codes.h`).
#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxKeymap;

/// Lowest code in the `BTN_MOUSE` block.
pub const BTN_MOUSE: u16 = 0x110;

impl KeyResolver for LinuxKeymap {
    fn resolve_key(&self, code: u16) -> ResolvedKey {
        if let Some(c) = linux_key_char(code) {
            return ResolvedKey::Char(c);
        }
        linux_key_name(code).map_or(ResolvedKey::Unresolvable(code), ResolvedKey::Named)
    }

    fn resolve_button(&self, code: u16) -> ResolvedKey {
        let name = match code {
            0x110 => "left",
            0x111 => "right",
            0x112 => "middle",
            0x113 | 0x116 => "x1",
            0x114 | 0x115 => "x2",
            _ => return ResolvedKey::Unresolvable(code),
        };
        ResolvedKey::Named(name)
    }
}

const fn linux_key_char(code: u16) -> Option<char> {
    let c = match code {
        2 => '1',
        3 => '2',
        4 => '3',
        5 => '4',
        6 => '5',
        7 => '6',
        8 => '7',
        9 => '8',
        10 => '9',
        11 => '0',
        12 | 74 => '-',
        13 | 117 => '=',
        16 => 'q',
        17 => 'w',
        18 => 'e',
        19 => 'r',
        20 => 't',
        21 => 'y',
        22 => 'u',
        23 => 'i',
        24 => 'o',
        25 => 'p',
        26 => '[',
        27 => ']',
        30 => 'a',
        31 => 's',
        32 => 'd',
        33 => 'f',
        34 => 'g',
        35 => 'h',
        36 => 'j',
        37 => 'k',
        38 => 'l',
        39 => ';',
        40 => '\'',
        41 => '`',
        43 => '\\',
        44 => 'z',
        45 => 'x',
        46 => 'c',
        47 => 'v',
        48 => 'b',
        49 => 'n',
        50 => 'm',
        51 => ',',
        52 | 83 => '.',
        53 | 98 => '/',
        55 => '*',
        71 => '7',
        72 => '8',
        73 => '9',
        75 => '4',
        76 => '5',
        77 => '6',
        78 => '+',
        79 => '1',
        80 => '2',
        81 => '3',
        82 => '0',
        86 => '<',
        _ => return None,
    };
    Some(c)
}

const fn linux_key_name(code: u16) -> Option<&'static str> {
    let name = match code {
        1 => "esc",
        14 => "backspace",
        15 => "tab",
        28 | 96 => "enter",
        29 => "ctrl_l",
        42 => "shift",
        54 => "shift_r",
        56 => "alt_l",
        57 => "space",
        58 => "caps_lock",
        59 => "f1",
        60 => "f2",
        61 => "f3",
        62 => "f4",
        63 => "f5",
        64 => "f6",
        65 => "f7",
        66 => "f8",
        67 => "f9",
        68 => "f10",
        69 => "num_lock",
        70 => "scroll_lock",
        87 => "f11",
        88 => "f12",
        97 => "ctrl_r",
        99 => "print_screen",
        100 => "alt_gr",
        102 => "home",
        103 => "up",
        104 => "page_up",
        105 => "left",
        106 => "right",
        107 => "end",
        108 => "down",
        109 => "page_down",
        110 => "insert",
        111 => "delete",
        113 => "media_volume_mute",
        114 => "media_volume_down",
        115 => "media_volume_up",
        119 => "pause",
        125 => "cmd",
        126 => "cmd_r",
        127 => "menu",
        163 => "media_next",
        164 => "media_play_pause",
        165 => "media_previous",
        183 => "f13",
        184 => "f14",
        185 => "f15",
        186 => "f16",
        187 => "f17",
        188 => "f18",
        189 => "f19",
        190 => "f20",
        191 => "f21",
        192 => "f22",
        193 => "f23",
        194 => "f24",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_and_digits_resolve_to_chars() {
        let keymap = LinuxKeymap;
        assert_eq!(keymap.resolve_key(30), ResolvedKey::Char('a'));
        assert_eq!(keymap.resolve_key(50), ResolvedKey::Char('m'));
        assert_eq!(keymap.resolve_key(11), ResolvedKey::Char('0'));
        assert_eq!(keymap.resolve_key(79), ResolvedKey::Char('1'));
    }

    #[test]
    fn symbolic_keys_resolve_to_names() {
        let keymap = LinuxKeymap;
        assert_eq!(keymap.resolve_key(57), ResolvedKey::Named("space"));
        assert_eq!(keymap.resolve_key(96), ResolvedKey::Named("enter"));
        assert_eq!(keymap.resolve_key(54), ResolvedKey::Named("shift_r"));
        assert_eq!(keymap.resolve_key(194), ResolvedKey::Named("f24"));
    }

    #[test]
    fn unknown_codes_are_unresolvable() {
        let keymap = LinuxKeymap;
        assert_eq!(keymap.resolve_key(84), ResolvedKey::Unresolvable(84));
        assert_eq!(keymap.resolve_key(BTN_MOUSE), ResolvedKey::Unresolvable(BTN_MOUSE));
        assert_eq!(keymap.resolve_button(30), ResolvedKey::Unresolvable(30));
        assert_eq!(ResolvedKey::Unresolvable(84).name(), None);
    }

    #[test]
    fn mouse_buttons_resolve_to_names() {
        let keymap = LinuxKeymap;
        assert_eq!(keymap.resolve_button(BTN_MOUSE).name().as_deref(), Some("left"));
        assert_eq!(keymap.resolve_button(0x111).name().as_deref(), Some("right"));
        assert_eq!(keymap.resolve_button(0x112).name().as_deref(), Some("middle"));
        assert_eq!(keymap.resolve_button(0x115).name().as_deref(), Some("x2"));
    }
}

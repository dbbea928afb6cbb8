//! Scancode set 1 constants and US layout tables.

#![allow(missing_docs)]

/// Prefix byte announcing an extended key.
pub const EXTENDED_PREFIX: u8 = 0xE0;

/// Bit set on the second byte of every key release.
pub const RELEASE_BIT: u8 = 0x80;

pub const ESCAPE: u8 = 0x01;
pub const BACKSPACE: u8 = 0x0E;
pub const TAB: u8 = 0x0F;
pub const ENTER: u8 = 0x1C;
pub const LEFT_CTRL: u8 = 0x1D;
pub const LEFT_SHIFT: u8 = 0x2A;
pub const RIGHT_SHIFT: u8 = 0x36;
pub const LEFT_ALT: u8 = 0x38;
pub const SPACE: u8 = 0x39;
pub const CAPS_LOCK: u8 = 0x3A;
pub const NUM_LOCK: u8 = 0x45;
pub const SCROLL_LOCK: u8 = 0x46;

/// Extended (`0xE0`-prefixed) codes.
pub mod extended {
    /// Keypad `/`.
    pub const KEYPAD_SLASH: u8 = 0x35;
    pub const UP: u8 = 0x48;
    pub const DOWN: u8 = 0x50;
}

/// Unshifted US layout, indexed by make code. Zero means no character.
///
/// Backspace and Enter are decoded as control keys before the table is
/// consulted, so their slots stay empty.
static UNSHIFTED: [u8; 58] = [
    0, 0, b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', b'0', b'-', b'=', 0,
    0, b'q', b'w', b'e', b'r', b't', b'y', b'u', b'i', b'o', b'p', b'[', b']', 0,
    0, b'a', b's', b'd', b'f', b'g', b'h', b'j', b'k', b'l', b';', b'\'', b'`',
    0, b'\\', b'z', b'x', b'c', b'v', b'b', b'n', b'm', b',', b'.', b'/', 0,
    b'*', 0, b' ',
];

/// Shifted US layout, indexed by make code. Zero means no character.
static SHIFTED: [u8; 58] = [
    0, 0, b'!', b'@', b'#', b'$', b'%', b'^', b'&', b'*', b'(', b')', b'_', b'+', 0,
    0, b'Q', b'W', b'E', b'R', b'T', b'Y', b'U', b'I', b'O', b'P', b'{', b'}', 0,
    0, b'A', b'S', b'D', b'F', b'G', b'H', b'J', b'K', b'L', b':', b'"', b'~',
    0, b'|', b'Z', b'X', b'C', b'V', b'B', b'N', b'M', b'<', b'>', b'?', 0,
    b'*', 0, b' ',
];

/// Looks up the character for a make code in one of the two layouts.
///
/// Codes past the end of the table and unmapped keys yield `None`.
pub fn lookup(code: u8, shifted: bool) -> Option<u8> {
    let table = if shifted { &SHIFTED } else { &UNSHIFTED };
    table.get(usize::from(code)).copied().filter(|&c| c != 0)
}

/// Finds the make code that produces `c`, and whether shift is needed.
///
/// Inverse of [`lookup`], used to synthesise key presses.
pub fn make_code_for(c: u8) -> Option<(u8, bool)> {
    if c == 0 {
        return None;
    }
    let position = |table: &[u8; 58]| table.iter().position(|&entry| entry == c);
    position(&UNSHIFTED)
        .map(|code| (code as u8, false))
        .or_else(|| position(&SHIFTED).map(|code| (code as u8, true)))
}

//! Scancode state machine.

use super::scancode::{self, extended};
use minios_common::Modifiers;

/// A decoded key press that the command line acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// A printable character.
    Char(u8),
    /// Delete the character left of the cursor.
    Backspace,
    /// Submit the current line.
    Enter,
    /// Recall the previous history entry.
    HistoryOlder,
    /// Recall the next history entry.
    HistoryNewer,
}

/// Modifier, lock and prefix state carried between scancode bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModifierState {
    modifiers: Modifiers,
    extended_pending: bool,
}

impl ModifierState {
    /// Current modifier and lock flags.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Whether the previous byte was an `0xE0` prefix.
    pub fn extended_pending(&self) -> bool {
        self.extended_pending
    }

    /// Shift held.
    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Caps lock engaged.
    pub fn caps_lock(&self) -> bool {
        self.modifiers.contains(Modifiers::CAPS_LOCK)
    }
}

/// Decodes set-1 scancodes one byte at a time.
#[derive(Debug, Default)]
pub struct KeyboardDecoder {
    state: ModifierState,
}

impl KeyboardDecoder {
    /// Creates a decoder in the power-on state (num lock on, nothing held).
    pub fn new() -> Self {
        Self::default()
    }

    /// The modifier state accumulated so far.
    pub fn state(&self) -> &ModifierState {
        &self.state
    }

    /// Current modifier and lock flags.
    pub fn modifiers(&self) -> Modifiers {
        self.state.modifiers
    }

    /// Consumes one scancode byte.
    ///
    /// Returns the key event it completes, if any. Prefix bytes, modifier
    /// and lock keys, releases, and unmapped keys all yield `None`.
    pub fn consume(&mut self, byte: u8) -> Option<KeyEvent> {
        if byte == scancode::EXTENDED_PREFIX {
            self.state.extended_pending = true;
            return None;
        }

        let extended = core::mem::take(&mut self.state.extended_pending);
        let released = byte & scancode::RELEASE_BIT != 0;
        let code = byte & !scancode::RELEASE_BIT;

        if let Some(modifier) = held_modifier(code) {
            self.state.modifiers.set(modifier, !released);
            return None;
        }

        if let Some(lock) = lock_key(code) {
            if !released {
                self.state.modifiers.toggle(lock);
                log::trace!("lock toggled: {:?}", self.state.modifiers & Modifiers::LOCKS);
            }
            return None;
        }

        if released {
            return None;
        }

        if extended {
            return match code {
                scancode::ENTER => Some(KeyEvent::Enter),
                extended::KEYPAD_SLASH => Some(KeyEvent::Char(b'/')),
                extended::UP => Some(KeyEvent::HistoryOlder),
                extended::DOWN => Some(KeyEvent::HistoryNewer),
                _ => None,
            };
        }

        match code {
            scancode::BACKSPACE => Some(KeyEvent::Backspace),
            scancode::ENTER => Some(KeyEvent::Enter),
            _ => self.resolve(code).map(KeyEvent::Char),
        }
    }

    /// Applies the layout tables and caps lock to a make code.
    fn resolve(&self, code: u8) -> Option<u8> {
        let c = scancode::lookup(code, self.state.shift())?;
        // Caps lock inverts letter case on top of shift.
        if self.state.caps_lock() && c.is_ascii_alphabetic() {
            Some(c ^ 0x20)
        } else {
            Some(c)
        }
    }
}

/// Momentary modifier driven by `code`, with or without the extended prefix.
fn held_modifier(code: u8) -> Option<Modifiers> {
    match code {
        scancode::LEFT_SHIFT | scancode::RIGHT_SHIFT => Some(Modifiers::SHIFT),
        scancode::LEFT_CTRL => Some(Modifiers::CTRL),
        scancode::LEFT_ALT => Some(Modifiers::ALT),
        _ => None,
    }
}

/// Lock flag toggled by `code`.
fn lock_key(code: u8) -> Option<Modifiers> {
    match code {
        scancode::CAPS_LOCK => Some(Modifiers::CAPS_LOCK),
        scancode::NUM_LOCK => Some(Modifiers::NUM_LOCK),
        scancode::SCROLL_LOCK => Some(Modifiers::SCROLL_LOCK),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::scancode::{
        BACKSPACE, CAPS_LOCK, ENTER, EXTENDED_PREFIX, LEFT_CTRL, LEFT_SHIFT, NUM_LOCK,
        RELEASE_BIT, RIGHT_SHIFT,
    };

    const KEY_A: u8 = 0x1E;
    const KEY_1: u8 = 0x02;

    fn feed(decoder: &mut KeyboardDecoder, bytes: &[u8]) -> Option<KeyEvent> {
        let mut last = None;
        for &byte in bytes {
            last = decoder.consume(byte);
        }
        last
    }

    #[test]
    fn plain_letter() {
        let mut decoder = KeyboardDecoder::new();
        assert_eq!(decoder.consume(KEY_A), Some(KeyEvent::Char(b'a')));
    }

    #[test]
    fn releases_of_ordinary_keys_produce_nothing() {
        let mut decoder = KeyboardDecoder::new();
        let before = *decoder.state();
        for code in 0x01..0x59u8 {
            if held_modifier(code).is_some() || lock_key(code).is_some() {
                continue;
            }
            assert_eq!(decoder.consume(code | RELEASE_BIT), None, "code {:#x}", code);
        }
        assert_eq!(*decoder.state(), before);
    }

    #[test]
    fn caps_lock_toggles_on_press_edge_only() {
        let mut decoder = KeyboardDecoder::new();
        assert!(!decoder.state().caps_lock());

        decoder.consume(CAPS_LOCK);
        assert!(decoder.state().caps_lock());
        decoder.consume(CAPS_LOCK | RELEASE_BIT);
        assert!(decoder.state().caps_lock());
        decoder.consume(CAPS_LOCK);
        assert!(!decoder.state().caps_lock());
        decoder.consume(CAPS_LOCK | RELEASE_BIT);
        decoder.consume(CAPS_LOCK);
        assert!(decoder.state().caps_lock());
    }

    #[test]
    fn shift_and_caps_combinations() {
        // neither
        let mut decoder = KeyboardDecoder::new();
        assert_eq!(decoder.consume(KEY_A), Some(KeyEvent::Char(b'a')));

        // shift only
        let mut decoder = KeyboardDecoder::new();
        decoder.consume(LEFT_SHIFT);
        assert_eq!(decoder.consume(KEY_A), Some(KeyEvent::Char(b'A')));

        // caps only
        let mut decoder = KeyboardDecoder::new();
        feed(&mut decoder, &[CAPS_LOCK, CAPS_LOCK | RELEASE_BIT]);
        assert_eq!(decoder.consume(KEY_A), Some(KeyEvent::Char(b'A')));

        // shift + caps
        let mut decoder = KeyboardDecoder::new();
        feed(&mut decoder, &[CAPS_LOCK, CAPS_LOCK | RELEASE_BIT, RIGHT_SHIFT]);
        assert_eq!(decoder.consume(KEY_A), Some(KeyEvent::Char(b'a')));
    }

    #[test]
    fn caps_lock_leaves_symbols_alone() {
        let mut decoder = KeyboardDecoder::new();
        decoder.consume(CAPS_LOCK);
        assert_eq!(decoder.consume(KEY_1), Some(KeyEvent::Char(b'1')));
        decoder.consume(LEFT_SHIFT);
        assert_eq!(decoder.consume(KEY_1), Some(KeyEvent::Char(b'!')));
    }

    #[test]
    fn shift_release_restores_lowercase() {
        let mut decoder = KeyboardDecoder::new();
        decoder.consume(LEFT_SHIFT);
        assert!(decoder.state().shift());
        decoder.consume(LEFT_SHIFT | RELEASE_BIT);
        assert!(!decoder.state().shift());
        assert_eq!(decoder.consume(KEY_A), Some(KeyEvent::Char(b'a')));
    }

    #[test]
    fn control_keys_fire_on_press_only() {
        let mut decoder = KeyboardDecoder::new();
        assert_eq!(decoder.consume(BACKSPACE), Some(KeyEvent::Backspace));
        assert_eq!(decoder.consume(BACKSPACE | RELEASE_BIT), None);
        assert_eq!(decoder.consume(ENTER), Some(KeyEvent::Enter));
        assert_eq!(decoder.consume(ENTER | RELEASE_BIT), None);
    }

    #[test]
    fn extended_prefix_is_consumed_silently() {
        let mut decoder = KeyboardDecoder::new();
        assert_eq!(decoder.consume(EXTENDED_PREFIX), None);
        assert!(decoder.state().extended_pending());
        assert_eq!(decoder.consume(extended::UP), Some(KeyEvent::HistoryOlder));
        assert!(!decoder.state().extended_pending());
        // The prefix applied to one byte only: 0x48 alone is keypad 8, unmapped.
        assert_eq!(decoder.consume(extended::UP), None);
    }

    #[test]
    fn extended_modifier_clears_prefix() {
        let mut decoder = KeyboardDecoder::new();
        feed(&mut decoder, &[EXTENDED_PREFIX, LEFT_CTRL]);
        assert!(decoder.modifiers().contains(Modifiers::CTRL));
        assert!(!decoder.state().extended_pending());
        feed(&mut decoder, &[EXTENDED_PREFIX, LEFT_CTRL | RELEASE_BIT]);
        assert!(!decoder.modifiers().contains(Modifiers::CTRL));
    }

    #[test]
    fn extended_release_produces_nothing() {
        let mut decoder = KeyboardDecoder::new();
        assert_eq!(feed(&mut decoder, &[EXTENDED_PREFIX, extended::UP | RELEASE_BIT]), None);
        assert!(!decoder.state().extended_pending());
    }

    #[test]
    fn keypad_enter_and_slash() {
        let mut decoder = KeyboardDecoder::new();
        assert_eq!(feed(&mut decoder, &[EXTENDED_PREFIX, ENTER]), Some(KeyEvent::Enter));
        assert_eq!(
            feed(&mut decoder, &[EXTENDED_PREFIX, extended::KEYPAD_SLASH]),
            Some(KeyEvent::Char(b'/'))
        );
    }

    #[test]
    fn num_lock_starts_on() {
        let mut decoder = KeyboardDecoder::new();
        assert!(decoder.modifiers().contains(Modifiers::NUM_LOCK));
        decoder.consume(NUM_LOCK);
        assert!(!decoder.modifiers().contains(Modifiers::NUM_LOCK));
    }
}

//! Keyboard modifier and lock state flags.

use bitflags::bitflags;

bitflags! {
    /// Modifier keys currently held and lock keys currently engaged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Modifiers: u8 {
        /// Either shift key.
        const SHIFT       = 1 << 0;
        /// Either control key.
        const CTRL        = 1 << 1;
        /// Either alt key.
        const ALT         = 1 << 2;
        /// Caps lock engaged.
        const CAPS_LOCK   = 1 << 3;
        /// Num lock engaged.
        const NUM_LOCK    = 1 << 4;
        /// Scroll lock engaged.
        const SCROLL_LOCK = 1 << 5;

        /// The momentary modifiers, active only while held.
        const HELD = Self::SHIFT.bits() | Self::CTRL.bits() | Self::ALT.bits();
        /// The toggled lock keys.
        const LOCKS = Self::CAPS_LOCK.bits() | Self::NUM_LOCK.bits() | Self::SCROLL_LOCK.bits();
    }
}

impl Default for Modifiers {
    /// Power-on state: num-lock engaged, everything else off.
    fn default() -> Self {
        Modifiers::NUM_LOCK
    }
}

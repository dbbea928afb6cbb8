//! VGA text mode buffer at 0xB8000.

use super::port::outb;
use crate::display::{CellBuffer, ScreenChar, BUFFER_WIDTH};
use core::ptr;

/// VGA text buffer memory-mapped I/O address.
const VGA_BUFFER_ADDR: usize = 0xB8000;

/// CRT controller index and data ports.
const CRTC_INDEX: u16 = 0x3D4;
const CRTC_DATA: u16 = 0x3D5;

const CURSOR_LOCATION_HIGH: u8 = 0x0E;
const CURSOR_LOCATION_LOW: u8 = 0x0F;

/// The VGA text buffer and hardware cursor.
pub struct VgaBuffer {
    base: *mut ScreenChar,
}

// SAFETY: the buffer is plain memory-mapped I/O with no thread affinity; all
// access is serialised by whoever owns the `VgaBuffer`.
unsafe impl Send for VgaBuffer {}

impl VgaBuffer {
    /// The buffer at its fixed physical address.
    pub fn new() -> Self {
        VgaBuffer {
            base: VGA_BUFFER_ADDR as *mut ScreenChar,
        }
    }
}

impl Default for VgaBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl CellBuffer for VgaBuffer {
    fn read(&self, x: usize, y: usize) -> ScreenChar {
        // SAFETY: callers keep `x` and `y` inside the 80x25 buffer, which is
        // identity mapped.
        unsafe { ptr::read_volatile(self.base.add(y * BUFFER_WIDTH + x)) }
    }

    fn write(&mut self, x: usize, y: usize, cell: ScreenChar) {
        // SAFETY: as for `read`.
        unsafe { ptr::write_volatile(self.base.add(y * BUFFER_WIDTH + x), cell) }
    }

    fn move_cursor(&mut self, x: usize, y: usize) {
        let position = (y * BUFFER_WIDTH + x) as u16;
        outb(CRTC_INDEX, CURSOR_LOCATION_LOW);
        outb(CRTC_DATA, position as u8);
        outb(CRTC_INDEX, CURSOR_LOCATION_HIGH);
        outb(CRTC_DATA, (position >> 8) as u8);
    }
}

//! `in`/`out` port instructions.

use minios_hal::PortIo;

/// Write a byte to an I/O port.
#[inline(always)]
pub fn outb(port: u16, value: u8) {
    // SAFETY: the kernel runs at ring 0 with full I/O port access.
    unsafe {
        core::arch::asm!(
            "out dx, al",
            in("dx") port,
            in("al") value,
            options(nomem, nostack, preserves_flags),
        );
    }
}

/// Read a byte from an I/O port.
#[inline(always)]
pub fn inb(port: u16) -> u8 {
    let value: u8;
    // SAFETY: the kernel runs at ring 0 with full I/O port access.
    unsafe {
        core::arch::asm!(
            "in al, dx",
            in("dx") port,
            out("al") value,
            options(nomem, nostack, preserves_flags),
        );
    }
    value
}

/// The machine's I/O port space.
#[derive(Debug, Clone, Copy, Default)]
pub struct X86Ports;

impl PortIo for X86Ports {
    fn read_u8(&mut self, port: u16) -> u8 {
        inb(port)
    }

    fn write_u8(&mut self, port: u16, value: u8) {
        outb(port, value);
    }
}

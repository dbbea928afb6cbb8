//! 32-bit x86 support.
//!
//! Port I/O, the processor controls, the VGA text buffer, COM1 serial
//! output with the `log` backend on top of it, and the trap entry stubs.

pub mod cpu;
pub mod interrupts;
pub mod logger;
pub mod port;
pub mod serial;
pub mod vga;

pub use cpu::X86Cpu;
pub use port::X86Ports;
pub use vga::VgaBuffer;

/// Halts the CPU until the next interrupt.
///
/// Used in idle loops to reduce power consumption.
#[inline]
pub fn hlt() {
    // SAFETY: `hlt` only waits for the next interrupt.
    unsafe { core::arch::asm!("hlt", options(nomem, nostack, preserves_flags)) };
}

/// Halts the CPU with interrupts disabled, forever.
///
/// Used after unrecoverable errors (fatal traps, panics).
pub fn halt_loop() -> ! {
    loop {
        // SAFETY: masking interrupts and halting touches no memory.
        unsafe { core::arch::asm!("cli", "hlt", options(nomem, nostack)) };
    }
}

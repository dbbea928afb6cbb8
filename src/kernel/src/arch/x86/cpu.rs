//! Processor control: the IDTR, interrupt flag and halting.

use minios_hal::Cpu;

/// Operand of `lidt`.
#[repr(C, packed)]
struct DescriptorTablePointer {
    limit: u16,
    base: u32,
}

/// The boot processor.
#[derive(Debug, Clone, Copy, Default)]
pub struct X86Cpu;

impl X86Cpu {
    /// The code-segment selector currently in use.
    pub fn code_selector() -> u16 {
        let selector: u16;
        // SAFETY: reading CS has no side effects.
        unsafe {
            core::arch::asm!("mov {0:x}, cs", out(reg) selector, options(nomem, nostack, preserves_flags));
        }
        selector
    }

    /// Set the interrupt flag.
    pub fn enable_interrupts() {
        // SAFETY: the vector table is loaded before this is called.
        unsafe { core::arch::asm!("sti", options(nomem, nostack)) };
    }

    /// Clear the interrupt flag.
    pub fn disable_interrupts() {
        // SAFETY: masking interrupts cannot break memory safety.
        unsafe { core::arch::asm!("cli", options(nomem, nostack)) };
    }
}

impl Cpu for X86Cpu {
    fn load_vector_table(&mut self, base: usize, limit: u16) {
        let pointer = DescriptorTablePointer {
            limit,
            base: base as u32,
        };
        // SAFETY: the caller passes a table that stays put for the kernel's lifetime.
        unsafe {
            core::arch::asm!("lidt [{}]", in(reg) &pointer, options(readonly, nostack, preserves_flags));
        }
    }

    fn halt(&mut self) {
        super::halt_loop();
    }
}

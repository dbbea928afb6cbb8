//! MiniOS Hardware Abstraction Layer (HAL) traits.
//!
//! This crate defines traits that abstract away platform-specific hardware details.
//! The kernel's input pipeline is written against these traits only, so the
//! same code runs on the i386 target and against mocks in host tests.

#![no_std]

mod display;

pub use display::{Color, ColorCode, DisplaySink};

/// Trait for raw access to the x86 I/O port space.
pub trait PortIo {
    /// Reads a byte from the given port.
    fn read_u8(&mut self, port: u16) -> u8;
    /// Writes a byte to the given port.
    fn write_u8(&mut self, port: u16, value: u8);
}

/// Trait for controlling interrupts.
pub trait InterruptController {
    /// Unmasks all interrupt lines at the controller.
    fn enable(&mut self);
    /// Masks all interrupt lines at the controller.
    fn disable(&mut self);
    /// Signals the end of an interrupt to the controller.
    fn end_of_interrupt(&mut self, irq: u8);
}

/// Trait for the keyboard controller.
pub trait KeyboardController {
    /// Reads the pending scancode byte.
    ///
    /// Only meaningful from the keyboard interrupt path, where exactly one byte
    /// is waiting in the controller's output buffer.
    fn read_scancode(&mut self) -> u8;
    /// Pulses the controller's CPU reset line.
    fn reset_system(&mut self);
}

/// Trait for the processor itself.
pub trait Cpu {
    /// Publishes an interrupt descriptor table to the processor.
    ///
    /// `base` is the linear address of the first descriptor and `limit` is the
    /// table size in bytes minus one.
    fn load_vector_table(&mut self, base: usize, limit: u16);
    /// Stops instruction execution.
    ///
    /// On hardware this disables interrupts and never returns.
    fn halt(&mut self);
}

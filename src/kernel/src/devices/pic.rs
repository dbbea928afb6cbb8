//! Support for the primary and secondary 8259 Programmable Interrupt Controllers (PICs).

use minios_hal::{InterruptController, PortIo};

/// The offset of the first PIC (primary).
///
/// IRQs 0..7 are mapped to interrupts 32..39.
pub const PIC_1_OFFSET: u8 = 32;

/// The offset of the second PIC (secondary).
///
/// IRQs 8..15 are mapped to interrupts 40..47.
pub const PIC_2_OFFSET: u8 = PIC_1_OFFSET + 8;

const PIC_1_COMMAND: u16 = 0x20;
const PIC_1_DATA: u16 = 0x21;
const PIC_2_COMMAND: u16 = 0xA0;
const PIC_2_DATA: u16 = 0xA1;

/// Unused port written to give the controllers time to settle.
const WAIT_PORT: u16 = 0x80;

const ICW1_INIT: u8 = 0x10;
const ICW1_ICW4: u8 = 0x01;
const ICW4_8086: u8 = 0x01;
const END_OF_INTERRUPT: u8 = 0x20;

/// The chained primary/secondary pair found on every PC.
pub struct Pic8259Pair<P> {
    ports: P,
}

impl<P: PortIo> Pic8259Pair<P> {
    /// Wraps the port accessor. Nothing is written until [`initialize`](Self::initialize).
    pub fn new(ports: P) -> Self {
        Pic8259Pair { ports }
    }

    /// Remap IRQ 0-15 to vectors 32-47 and mask every line.
    ///
    /// Lines stay masked until [`InterruptController::enable`].
    pub fn initialize(&mut self) {
        // ICW1: start initialization, expect ICW4.
        self.write(PIC_1_COMMAND, ICW1_INIT | ICW1_ICW4);
        self.write(PIC_2_COMMAND, ICW1_INIT | ICW1_ICW4);
        // ICW2: vector offsets.
        self.write(PIC_1_DATA, PIC_1_OFFSET);
        self.write(PIC_2_DATA, PIC_2_OFFSET);
        // ICW3: secondary on primary line 2.
        self.write(PIC_1_DATA, 1 << 2);
        self.write(PIC_2_DATA, 2);
        // ICW4: 8086 mode.
        self.write(PIC_1_DATA, ICW4_8086);
        self.write(PIC_2_DATA, ICW4_8086);

        self.set_masks(0xFF, 0xFF);
        log::debug!("pic remapped to {}/{}", PIC_1_OFFSET, PIC_2_OFFSET);
    }

    /// Current masks as `(primary, secondary)`.
    pub fn masks(&mut self) -> (u8, u8) {
        (self.ports.read_u8(PIC_1_DATA), self.ports.read_u8(PIC_2_DATA))
    }

    /// The port accessor.
    pub fn ports(&self) -> &P {
        &self.ports
    }

    fn set_masks(&mut self, primary: u8, secondary: u8) {
        self.ports.write_u8(PIC_1_DATA, primary);
        self.ports.write_u8(PIC_2_DATA, secondary);
    }

    fn write(&mut self, port: u16, value: u8) {
        self.ports.write_u8(port, value);
        self.ports.write_u8(WAIT_PORT, 0);
    }
}

impl<P: PortIo> InterruptController for Pic8259Pair<P> {
    fn enable(&mut self) {
        self.set_masks(0x00, 0x00);
    }

    fn disable(&mut self) {
        self.set_masks(0xFF, 0xFF);
    }

    fn end_of_interrupt(&mut self, irq: u8) {
        if irq >= 8 {
            self.ports.write_u8(PIC_2_COMMAND, END_OF_INTERRUPT);
        }
        self.ports.write_u8(PIC_1_COMMAND, END_OF_INTERRUPT);
    }
}

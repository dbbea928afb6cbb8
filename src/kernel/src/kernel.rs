//! The kernel context: everything the trap path reads and writes.

use crate::keyboard::{KeyEvent, KeyboardDecoder};
use crate::terminal::{Command, Session, Shell};
use crate::trap::{report_fatal, Device, DeviceTable, TrapKind, TrapOutcome, TrapStats, VectorTable};
use minios_common::{FatalTrap, Irq, TrapError, TrapFrame};
use minios_hal::{Cpu, DisplaySink, InterruptController, KeyboardController};

/// Machine services the kernel needs from its platform.
pub trait Hardware: InterruptController + KeyboardController + Cpu {}

impl<T: InterruptController + KeyboardController + Cpu> Hardware for T {}

/// Owned kernel state.
///
/// Traps are handled one at a time on a single thread of control, so the
/// decoder, line editor and screen are only reached through `&mut self`.
///
/// The vector table is borrowed rather than owned: once activated, the
/// processor holds its address, so it must stay put while the kernel (which
/// may itself move) is alive.
pub struct Kernel<'t, D, H> {
    vectors: &'t mut VectorTable,
    devices: DeviceTable,
    stats: TrapStats,
    keyboard: KeyboardDecoder,
    shell: Shell,
    display: D,
    hardware: H,
}

impl<'t, D: DisplaySink, H: Hardware> Kernel<'t, D, H> {
    /// Build a kernel around a filled vector table, with the keyboard on IRQ 1.
    pub fn new(display: D, hardware: H, vectors: &'t mut VectorTable) -> Self {
        let mut devices = DeviceTable::new();
        devices.register(Irq::KEYBOARD, Device::Keyboard);
        Kernel {
            vectors,
            devices,
            stats: TrapStats::default(),
            keyboard: KeyboardDecoder::new(),
            shell: Shell::new(),
            display,
            hardware,
        }
    }

    /// Publish the vector table and unmask the interrupt controller.
    ///
    /// The processor's interrupt flag is left alone; the caller sets it once
    /// it no longer holds the kernel.
    pub fn activate(&mut self) -> Result<(), TrapError> {
        self.vectors.activate(&mut self.hardware)?;
        self.hardware.enable();
        log::info!("trap delivery enabled");
        Ok(())
    }

    /// Show the first prompt.
    pub fn start_shell(&mut self) {
        self.shell.prompt(&mut self.display);
    }

    /// Handle one trap.
    pub fn dispatch(&mut self, frame: &TrapFrame) -> TrapOutcome {
        let vector = frame.vector();
        if !self.vectors.is_active() {
            return self.fatal(FatalTrap::NotActivated(vector), frame);
        }

        match TrapKind::classify(vector) {
            TrapKind::Fault(_) => self.fatal(
                FatalTrap::Fault {
                    vector,
                    error_code: frame.error_code(),
                    eip: frame.eip,
                },
                frame,
            ),
            TrapKind::Device(irq) => {
                self.stats.device_traps = self.stats.device_traps.wrapping_add(1);
                match self.devices.get(irq) {
                    Some(Device::Keyboard) => {
                        self.stats.keyboard = self.stats.keyboard.wrapping_add(1);
                        self.keyboard_interrupt();
                    }
                    None => {
                        self.stats.ignored = self.stats.ignored.wrapping_add(1);
                        log::trace!("irq {} ignored", irq.as_u8());
                    }
                }
                self.hardware.end_of_interrupt(irq.as_u8());
                TrapOutcome::Resume
            }
            TrapKind::Unhandled => self.fatal(FatalTrap::UnhandledVector(vector), frame),
        }
    }

    fn fatal(&mut self, fatal: FatalTrap, frame: &TrapFrame) -> TrapOutcome {
        report_fatal(&mut self.display, &fatal, frame);
        TrapOutcome::Halt(fatal)
    }

    fn keyboard_interrupt(&mut self) {
        let scancode = self.hardware.read_scancode();
        if let Some(event) = self.keyboard.consume(scancode) {
            self.key_event(event);
        }
    }

    /// Feed a decoded key to the line editor, running the command it submits.
    pub fn key_event(&mut self, event: KeyEvent) {
        let Some(line) = self.shell.handle_key(event, &mut self.display) else {
            return;
        };
        let mut session = Session {
            display: &mut self.display,
            hardware: &mut self.hardware,
            history: self.shell.history(),
            modifiers: self.keyboard.modifiers(),
            stats: self.stats,
        };
        Command::parse(line.as_str()).execute(&mut session);
        self.shell.prompt(&mut self.display);
    }

    /// Stop the processor.
    pub fn halt(&mut self) {
        self.hardware.halt();
    }

    /// The screen.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// The screen, mutably.
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// The platform.
    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    /// The platform, mutably.
    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }

    /// The line editor.
    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    /// The scancode decoder.
    pub fn keyboard(&self) -> &KeyboardDecoder {
        &self.keyboard
    }

    /// Trap counters.
    pub fn stats(&self) -> TrapStats {
        self.stats
    }

    /// The vector table.
    pub fn vectors(&self) -> &VectorTable {
        self.vectors
    }

    /// The vector table, mutably, for installing gates before activation.
    pub fn vectors_mut(&mut self) -> &mut VectorTable {
        self.vectors
    }
}

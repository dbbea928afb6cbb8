//! Trap classification and the device routing table.

use minios_common::trap::IRQ_COUNT;
use minios_common::{Exception, FatalTrap, Irq, TrapFrame, Vector};
use minios_hal::{Color, ColorCode, DisplaySink};

/// What a vector number means to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapKind {
    /// Processor exception, vectors 0-31.
    Fault(Exception),
    /// Remapped controller line, vectors 32-47.
    Device(Irq),
    /// Anything above 47.
    Unhandled,
}

impl TrapKind {
    /// Classify a vector.
    pub fn classify(vector: Vector) -> TrapKind {
        if let Some(exception) = Exception::from_vector(vector) {
            TrapKind::Fault(exception)
        } else if let Some(irq) = Irq::from_vector(vector) {
            TrapKind::Device(irq)
        } else {
            TrapKind::Unhandled
        }
    }
}

/// Result of dispatching one trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapOutcome {
    /// Return to the interrupted code.
    Resume,
    /// Stop the machine.
    Halt(FatalTrap),
}

/// Device handlers that can be attached to an IRQ line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    /// PS/2 keyboard: read a scancode and feed the decoder.
    Keyboard,
}

/// Which device, if any, handles each IRQ line.
#[derive(Debug, Clone, Default)]
pub struct DeviceTable {
    lines: [Option<Device>; IRQ_COUNT as usize],
}

impl DeviceTable {
    /// A table with no devices attached.
    pub const fn new() -> Self {
        DeviceTable {
            lines: [None; IRQ_COUNT as usize],
        }
    }

    /// Attach `device` to `irq`, replacing any previous handler.
    pub fn register(&mut self, irq: Irq, device: Device) {
        self.lines[irq.index()] = Some(device);
    }

    /// The device attached to `irq`.
    pub fn get(&self, irq: Irq) -> Option<Device> {
        self.lines[irq.index()]
    }
}

/// Trap counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrapStats {
    /// Device interrupts of any line.
    pub device_traps: u32,
    /// Keyboard interrupts.
    pub keyboard: u32,
    /// Device interrupts with no handler attached.
    pub ignored: u32,
}

const FAULT_COLOR: ColorCode = ColorCode::new(Color::LightRed, Color::Black);

/// Describe a fatal trap on screen and in the log.
pub fn report_fatal(display: &mut impl DisplaySink, fatal: &FatalTrap, frame: &TrapFrame) {
    log::error!("{}", fatal);
    log::error!("{:#x?}", frame);

    if display.cursor().0 != 0 {
        display.newline();
    }
    match *fatal {
        FatalTrap::Fault {
            vector, error_code, ..
        } => {
            let name = Exception::from_vector(vector)
                .map(Exception::name)
                .unwrap_or("Unknown Exception");
            display.write_colored("EXCEPTION: ", FAULT_COLOR);
            display.write_colored(name, FAULT_COLOR);
            display.write_colored(" (vector ", FAULT_COLOR);
            write_number(display, vector.as_u8() as u32);
            display.write_colored(")", FAULT_COLOR);
            display.newline();
            if let Some(code) = error_code {
                display.write_text("  error code ");
                display.write_hex(code);
                display.newline();
            }
            display.write_text("  eip ");
            display.write_hex(frame.eip);
            display.write_text("  cs ");
            display.write_hex(frame.cs);
            display.write_text("  eflags ");
            display.write_hex(frame.eflags);
            display.newline();
        }
        FatalTrap::UnhandledVector(vector) => {
            display.write_colored("unhandled vector ", FAULT_COLOR);
            write_number(display, vector.as_u8() as u32);
            display.newline();
        }
        FatalTrap::NotActivated(vector) => {
            display.write_colored("trap before activation, vector ", FAULT_COLOR);
            write_number(display, vector.as_u8() as u32);
            display.newline();
        }
    }
    display.write_colored("System halted.", FAULT_COLOR);
    display.newline();
}

fn write_number(display: &mut impl DisplaySink, value: u32) {
    let color = display.color();
    display.set_color(FAULT_COLOR);
    display.write_dec(value);
    display.set_color(color);
}

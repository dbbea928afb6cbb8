//! 8042 PS/2 controller: keyboard data and the CPU reset line.

use minios_hal::{KeyboardController, PortIo};

const DATA_PORT: u16 = 0x60;
const STATUS_PORT: u16 = 0x64;
const COMMAND_PORT: u16 = 0x64;

/// Controller input buffer still holds a byte.
const STATUS_INPUT_FULL: u8 = 1 << 1;

/// Pulse the reset line.
const COMMAND_RESET: u8 = 0xFE;

/// How many status polls to make before sending the reset anyway.
const RESET_SPIN_LIMIT: u32 = 0x10000;

/// The PS/2 controller at ports 0x60/0x64.
pub struct Ps2Controller<P> {
    ports: P,
}

impl<P: PortIo> Ps2Controller<P> {
    /// Wraps the port accessor.
    pub fn new(ports: P) -> Self {
        Ps2Controller { ports }
    }

    /// The port accessor.
    pub fn ports(&self) -> &P {
        &self.ports
    }
}

impl<P: PortIo> KeyboardController for Ps2Controller<P> {
    fn read_scancode(&mut self) -> u8 {
        self.ports.read_u8(DATA_PORT)
    }

    fn reset_system(&mut self) {
        for _ in 0..RESET_SPIN_LIMIT {
            if self.ports.read_u8(STATUS_PORT) & STATUS_INPUT_FULL == 0 {
                break;
            }
            core::hint::spin_loop();
        }
        self.ports.write_u8(COMMAND_PORT, COMMAND_RESET);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::RecordingPorts;

    #[test]
    fn scancode_comes_from_data_port() {
        let mut ports = RecordingPorts::new();
        ports.set_input(DATA_PORT, 0x1E);
        let mut controller = Ps2Controller::new(ports);
        assert_eq!(controller.read_scancode(), 0x1E);
    }

    #[test]
    fn reset_pulses_command_port() {
        let mut controller = Ps2Controller::new(RecordingPorts::new());
        controller.reset_system();
        assert_eq!(controller.ports().writes().last(), Some((COMMAND_PORT, COMMAND_RESET)));
    }
}

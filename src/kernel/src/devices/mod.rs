//! PC platform devices.
//!
//! Drivers are written against [`PortIo`] so they run on real ports or on
//! recorded ones in tests.

pub mod pic;
pub mod ps2;

pub use pic::{Pic8259Pair, PIC_1_OFFSET, PIC_2_OFFSET};
pub use ps2::Ps2Controller;

use minios_hal::{Cpu, InterruptController, KeyboardController, PortIo};

/// A PC: chained PICs, the PS/2 controller and a processor.
pub struct PcPlatform<P, C> {
    pic: Pic8259Pair<P>,
    ps2: Ps2Controller<P>,
    cpu: C,
}

impl<P: PortIo + Clone, C: Cpu> PcPlatform<P, C> {
    /// Builds the platform; `ports` is cloned for each driver.
    pub fn new(ports: P, cpu: C) -> Self {
        PcPlatform {
            pic: Pic8259Pair::new(ports.clone()),
            ps2: Ps2Controller::new(ports),
            cpu,
        }
    }

    /// The interrupt controllers, for remapping during boot.
    pub fn pic_mut(&mut self) -> &mut Pic8259Pair<P> {
        &mut self.pic
    }
}

impl<P: PortIo, C> InterruptController for PcPlatform<P, C> {
    fn enable(&mut self) {
        self.pic.enable();
    }

    fn disable(&mut self) {
        self.pic.disable();
    }

    fn end_of_interrupt(&mut self, irq: u8) {
        self.pic.end_of_interrupt(irq);
    }
}

impl<P: PortIo, C> KeyboardController for PcPlatform<P, C> {
    fn read_scancode(&mut self) -> u8 {
        self.ps2.read_scancode()
    }

    fn reset_system(&mut self) {
        self.ps2.reset_system();
    }
}

impl<P, C: Cpu> Cpu for PcPlatform<P, C> {
    fn load_vector_table(&mut self, base: usize, limit: u16) {
        self.cpu.load_vector_table(base, limit);
    }

    fn halt(&mut self) {
        self.cpu.halt();
    }
}

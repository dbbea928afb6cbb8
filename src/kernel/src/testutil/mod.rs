//! Test infrastructure for the MiniOS kernel.
//!
//! Mock hardware for driving a [`Kernel`](crate::kernel::Kernel) on the host,
//! a port recorder for the device drivers, and the QEMU exit helpers used by
//! the in-kernel self tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use minios_kernel::testutil::{frame_for, test_kernel, test_vectors, type_text};
//! ```

use crate::display::{MemoryBuffer, TextScreen};
use crate::kernel::Kernel;
use crate::keyboard::scancode::{self, make_code_for};
use crate::trap::VectorTable;
use minios_common::trap::{IRQ_BASE, IRQ_COUNT};
use minios_common::{GateFlags, Irq, TrapFrame, Vector, VectorDescriptor};
use minios_hal::{Cpu, InterruptController, KeyboardController, PortIo};

/// QEMU exit codes for signaling test results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum QemuExitCode {
    /// All tests passed.
    Success = 0x10,
    /// One or more tests failed.
    Failed = 0x11,
}

/// The isa-debug-exit device port.
const QEMU_EXIT_PORT: u16 = 0xf4;

/// Exit QEMU with the given exit code.
///
/// QEMU must be started with `-device isa-debug-exit,iobase=0xf4,iosize=0x04`.
/// The process exit status is `(value << 1) | 1`: 33 for success, 35 for
/// failure.
pub fn exit_qemu(ports: &mut impl PortIo, exit_code: QemuExitCode) {
    ports.write_u8(QEMU_EXIT_PORT, exit_code as u8);
}

/// Capacity of the queued scancode ring.
const SCANCODE_QUEUE: usize = 256;

/// Scripted platform that records everything the kernel asks of it.
#[derive(Debug, Clone)]
pub struct MockHardware {
    scancodes: [u8; SCANCODE_QUEUE],
    head: u8,
    tail: u8,
    /// End-of-interrupt count per IRQ line.
    pub eoi_counts: [u32; IRQ_COUNT as usize],
    /// Last `(base, limit)` passed to the IDTR.
    pub loaded: Option<(usize, u16)>,
    /// How many times the IDTR was loaded.
    pub load_count: u32,
    /// Whether the controller lines are unmasked.
    pub enabled: bool,
    /// Reset requests.
    pub resets: u32,
    /// Halt requests.
    pub halts: u32,
}

impl MockHardware {
    /// A platform with no pending input.
    pub fn new() -> Self {
        MockHardware {
            scancodes: [0; SCANCODE_QUEUE],
            head: 0,
            tail: 0,
            eoi_counts: [0; IRQ_COUNT as usize],
            loaded: None,
            load_count: 0,
            enabled: false,
            resets: 0,
            halts: 0,
        }
    }

    /// Queue a byte for the next [`KeyboardController::read_scancode`].
    pub fn queue_scancode(&mut self, byte: u8) {
        self.scancodes[self.tail as usize] = byte;
        self.tail = self.tail.wrapping_add(1);
    }

    /// Bytes queued but not yet read.
    pub fn pending(&self) -> usize {
        self.tail.wrapping_sub(self.head) as usize
    }

    /// End-of-interrupt count for `irq`.
    pub fn eoi_count(&self, irq: Irq) -> u32 {
        self.eoi_counts[irq.index()]
    }

    /// End-of-interrupt count over all lines.
    pub fn total_eois(&self) -> u32 {
        self.eoi_counts.iter().sum()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptController for MockHardware {
    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn end_of_interrupt(&mut self, irq: u8) {
        if let Some(count) = self.eoi_counts.get_mut(irq as usize) {
            *count += 1;
        }
    }
}

impl KeyboardController for MockHardware {
    fn read_scancode(&mut self) -> u8 {
        if self.head == self.tail {
            return 0;
        }
        let byte = self.scancodes[self.head as usize];
        self.head = self.head.wrapping_add(1);
        byte
    }

    fn reset_system(&mut self) {
        self.resets += 1;
    }
}

impl Cpu for MockHardware {
    fn load_vector_table(&mut self, base: usize, limit: u16) {
        self.loaded = Some((base, limit));
        self.load_count += 1;
    }

    fn halt(&mut self) {
        self.halts += 1;
    }
}

/// Capacity of the recorded write log.
const RECORD_CAPACITY: usize = 64;

/// Number of distinct ports whose last value is remembered.
const LATCH_CAPACITY: usize = 16;

/// Port accessor that logs writes and answers reads with the last value
/// written (or set) on that port.
#[derive(Debug, Clone)]
pub struct RecordingPorts {
    writes: [(u16, u8); RECORD_CAPACITY],
    len: usize,
    latches: [(u16, u8); LATCH_CAPACITY],
    latched: usize,
}

impl RecordingPorts {
    /// An accessor with nothing recorded; every port reads 0.
    pub fn new() -> Self {
        RecordingPorts {
            writes: [(0, 0); RECORD_CAPACITY],
            len: 0,
            latches: [(0, 0); LATCH_CAPACITY],
            latched: 0,
        }
    }

    /// Make reads of `port` return `value`.
    pub fn set_input(&mut self, port: u16, value: u8) {
        if let Some(slot) = self.latches[..self.latched].iter_mut().find(|(p, _)| *p == port) {
            slot.1 = value;
        } else if self.latched < LATCH_CAPACITY {
            self.latches[self.latched] = (port, value);
            self.latched += 1;
        }
    }

    /// Recorded `(port, value)` writes in order.
    pub fn writes(&self) -> impl Iterator<Item = (u16, u8)> + '_ {
        self.writes[..self.len].iter().copied()
    }
}

impl Default for RecordingPorts {
    fn default() -> Self {
        Self::new()
    }
}

impl PortIo for RecordingPorts {
    fn read_u8(&mut self, port: u16) -> u8 {
        self.latches[..self.latched]
            .iter()
            .find(|(p, _)| *p == port)
            .map_or(0, |&(_, value)| value)
    }

    fn write_u8(&mut self, port: u16, value: u8) {
        if self.len < RECORD_CAPACITY {
            self.writes[self.len] = (port, value);
            self.len += 1;
        }
        self.set_input(port, value);
    }
}

/// Code selector used for test descriptors.
pub const TEST_SELECTOR: u16 = 0x08;

/// Fake stub address for `vector`.
pub fn stub_address(vector: Vector) -> u32 {
    0x0010_0000 + vector.as_u8() as u32 * 16
}

/// A vector table filled with fake stub addresses.
pub fn test_vectors() -> VectorTable {
    VectorTable::new(|vector| {
        VectorDescriptor::new(stub_address(vector), TEST_SELECTOR, GateFlags::KERNEL_INTERRUPT)
    })
}

/// Host kernel type.
pub type TestKernel<'t> = Kernel<'t, TextScreen<MemoryBuffer>, MockHardware>;

/// A kernel on a blank memory screen and mock hardware, not yet activated.
///
/// `vectors` is usually [`test_vectors`]; it is borrowed for the kernel's
/// lifetime so it cannot move after activation.
pub fn test_kernel(vectors: &mut VectorTable) -> TestKernel<'_> {
    let mut screen = TextScreen::new(MemoryBuffer::new());
    minios_hal::DisplaySink::clear(&mut screen);
    Kernel::new(screen, MockHardware::new(), vectors)
}

/// The frame the entry stubs would build for `vector`.
pub fn frame_for(vector: u8) -> TrapFrame {
    TrapFrame {
        vector: vector as u32,
        eip: 0x0010_2000,
        cs: TEST_SELECTOR as u32,
        eflags: 0x202,
        ..TrapFrame::default()
    }
}

/// Deliver one keyboard interrupt carrying `byte`.
pub fn press_byte(kernel: &mut TestKernel<'_>, byte: u8) {
    kernel.hardware_mut().queue_scancode(byte);
    kernel.dispatch(&frame_for(IRQ_BASE + Irq::KEYBOARD.as_u8()));
}

/// Press and release the key producing `c`, wrapping it in shift if needed.
///
/// Characters with no key on the layout are skipped.
pub fn type_char(kernel: &mut TestKernel<'_>, c: u8) {
    let Some((code, shifted)) = make_code_for(c) else {
        return;
    };
    if shifted {
        press_byte(kernel, scancode::LEFT_SHIFT);
    }
    press_byte(kernel, code);
    press_byte(kernel, code | scancode::RELEASE_BIT);
    if shifted {
        press_byte(kernel, scancode::LEFT_SHIFT | scancode::RELEASE_BIT);
    }
}

/// Type `text` one key at a time.
pub fn type_text(kernel: &mut TestKernel<'_>, text: &str) {
    for &c in text.as_bytes() {
        type_char(kernel, c);
    }
}

/// Press and release Enter.
pub fn press_enter(kernel: &mut TestKernel<'_>) {
    press_byte(kernel, scancode::ENTER);
    press_byte(kernel, scancode::ENTER | scancode::RELEASE_BIT);
}

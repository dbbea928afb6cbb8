//! Trap frame, descriptor and vector types for i386 protected mode.

use bitflags::bitflags;

/// Number of entries in the interrupt descriptor table.
pub const VECTOR_COUNT: usize = 256;

/// Number of processor exception vectors (0-31).
pub const EXCEPTION_COUNT: u8 = 32;

/// First vector used by device interrupts once the PICs are remapped.
pub const IRQ_BASE: u8 = 32;

/// Number of device interrupt lines on a chained 8259 pair.
pub const IRQ_COUNT: u8 = 16;

/// An interrupt vector, 0-255.
///
/// Every `u8` is a valid vector, so indexing the vector table with one can
/// never go out of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector(u8);

impl Vector {
    /// Wraps a vector number.
    pub const fn new(number: u8) -> Self {
        Vector(number)
    }

    /// Returns the vector number.
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Returns the vector number as a table index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether the processor pushes an error code for this vector.
    pub const fn pushes_error_code(self) -> bool {
        matches!(self.0, 8 | 10..=14 | 17 | 21 | 29 | 30)
    }

    /// Iterates over all 256 vectors in ascending order.
    pub fn all() -> impl Iterator<Item = Vector> {
        (0..=u8::MAX).map(Vector)
    }
}

impl From<u8> for Vector {
    fn from(number: u8) -> Self {
        Vector(number)
    }
}

/// A device interrupt line, 0-15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Irq(u8);

impl Irq {
    /// Programmable interval timer.
    pub const TIMER: Irq = Irq(0);
    /// PS/2 keyboard.
    pub const KEYBOARD: Irq = Irq(1);
    /// Cascade line from the secondary controller.
    pub const CASCADE: Irq = Irq(2);

    /// Wraps an IRQ line number, rejecting lines past 15.
    pub const fn new(line: u8) -> Option<Self> {
        if line < IRQ_COUNT {
            Some(Irq(line))
        } else {
            None
        }
    }

    /// Maps a remapped device vector (32-47) back to its IRQ line.
    pub const fn from_vector(vector: Vector) -> Option<Self> {
        match vector.as_u8().checked_sub(IRQ_BASE) {
            Some(line) => Irq::new(line),
            None => None,
        }
    }

    /// Returns the line number.
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Returns the line number as a table index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the vector this line is delivered on.
    pub const fn vector(self) -> Vector {
        Vector(IRQ_BASE + self.0)
    }

    /// Whether the line belongs to the secondary controller.
    pub const fn is_secondary(self) -> bool {
        self.0 >= 8
    }
}

/// Processor exceptions, vectors 0-31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Exception {
    /// #DE, vector 0.
    DivideError,
    /// #DB, vector 1.
    Debug,
    /// NMI, vector 2.
    NonMaskableInterrupt,
    /// #BP, vector 3.
    Breakpoint,
    /// #OF, vector 4.
    Overflow,
    /// #BR, vector 5.
    BoundRangeExceeded,
    /// #UD, vector 6.
    InvalidOpcode,
    /// #NM, vector 7.
    DeviceNotAvailable,
    /// #DF, vector 8.
    DoubleFault,
    /// Vector 9, legacy.
    CoprocessorSegmentOverrun,
    /// #TS, vector 10.
    InvalidTss,
    /// #NP, vector 11.
    SegmentNotPresent,
    /// #SS, vector 12.
    StackSegmentFault,
    /// #GP, vector 13.
    GeneralProtection,
    /// #PF, vector 14.
    PageFault,
    /// #MF, vector 16.
    X87FloatingPoint,
    /// #AC, vector 17.
    AlignmentCheck,
    /// #MC, vector 18.
    MachineCheck,
    /// #XM, vector 19.
    SimdFloatingPoint,
    /// #VE, vector 20.
    Virtualization,
    /// #CP, vector 21.
    ControlProtection,
    /// #HV, vector 28.
    HypervisorInjection,
    /// #VC, vector 29.
    VmmCommunication,
    /// #SX, vector 30.
    Security,
    /// Vectors 15, 22-27 and 31.
    Reserved,
}

impl Exception {
    /// Classifies an exception vector. Returns `None` for vectors 32 and up.
    pub const fn from_vector(vector: Vector) -> Option<Self> {
        let exception = match vector.as_u8() {
            0 => Exception::DivideError,
            1 => Exception::Debug,
            2 => Exception::NonMaskableInterrupt,
            3 => Exception::Breakpoint,
            4 => Exception::Overflow,
            5 => Exception::BoundRangeExceeded,
            6 => Exception::InvalidOpcode,
            7 => Exception::DeviceNotAvailable,
            8 => Exception::DoubleFault,
            9 => Exception::CoprocessorSegmentOverrun,
            10 => Exception::InvalidTss,
            11 => Exception::SegmentNotPresent,
            12 => Exception::StackSegmentFault,
            13 => Exception::GeneralProtection,
            14 => Exception::PageFault,
            16 => Exception::X87FloatingPoint,
            17 => Exception::AlignmentCheck,
            18 => Exception::MachineCheck,
            19 => Exception::SimdFloatingPoint,
            20 => Exception::Virtualization,
            21 => Exception::ControlProtection,
            28 => Exception::HypervisorInjection,
            29 => Exception::VmmCommunication,
            30 => Exception::Security,
            15 | 22..=27 | 31 => Exception::Reserved,
            _ => return None,
        };
        Some(exception)
    }

    /// Human-readable exception name.
    pub const fn name(self) -> &'static str {
        match self {
            Exception::DivideError => "Divide Error",
            Exception::Debug => "Debug",
            Exception::NonMaskableInterrupt => "Non-Maskable Interrupt",
            Exception::Breakpoint => "Breakpoint",
            Exception::Overflow => "Overflow",
            Exception::BoundRangeExceeded => "Bound Range Exceeded",
            Exception::InvalidOpcode => "Invalid Opcode",
            Exception::DeviceNotAvailable => "Device Not Available",
            Exception::DoubleFault => "Double Fault",
            Exception::CoprocessorSegmentOverrun => "Coprocessor Segment Overrun",
            Exception::InvalidTss => "Invalid TSS",
            Exception::SegmentNotPresent => "Segment Not Present",
            Exception::StackSegmentFault => "Stack-Segment Fault",
            Exception::GeneralProtection => "General Protection Fault",
            Exception::PageFault => "Page Fault",
            Exception::X87FloatingPoint => "x87 Floating-Point Exception",
            Exception::AlignmentCheck => "Alignment Check",
            Exception::MachineCheck => "Machine Check",
            Exception::SimdFloatingPoint => "SIMD Floating-Point Exception",
            Exception::Virtualization => "Virtualization Exception",
            Exception::ControlProtection => "Control Protection Exception",
            Exception::HypervisorInjection => "Hypervisor Injection Exception",
            Exception::VmmCommunication => "VMM Communication Exception",
            Exception::Security => "Security Exception",
            Exception::Reserved => "Reserved",
        }
    }
}

/// Register snapshot built by the trap entry stubs.
///
/// Field order is the stack layout after `pusha`, the stub's vector and
/// error-code pushes, and the processor's own `eip`/`cs`/`eflags` push.
/// `user_esp` and `user_ss` are only written by the processor when the trap
/// crossed a privilege boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct TrapFrame {
    /// Saved `edi`.
    pub edi: u32,
    /// Saved `esi`.
    pub esi: u32,
    /// Saved `ebp`.
    pub ebp: u32,
    /// `esp` as saved by `pusha`; points into the trap stack, not the interrupted one.
    pub esp: u32,
    /// Saved `ebx`.
    pub ebx: u32,
    /// Saved `edx`.
    pub edx: u32,
    /// Saved `ecx`.
    pub ecx: u32,
    /// Saved `eax`.
    pub eax: u32,
    /// Vector number pushed by the entry stub.
    pub vector: u32,
    /// Error code pushed by the processor, or a zero placeholder from the stub.
    pub error_code: u32,
    /// Interrupted instruction pointer.
    pub eip: u32,
    /// Interrupted code segment.
    pub cs: u32,
    /// Interrupted flags register.
    pub eflags: u32,
    /// Interrupted stack pointer (privilege change only).
    pub user_esp: u32,
    /// Interrupted stack segment (privilege change only).
    pub user_ss: u32,
}

impl TrapFrame {
    /// The vector that was raised.
    ///
    /// Stubs push a value below 256; anything larger is truncated.
    pub fn vector(&self) -> Vector {
        Vector(self.vector as u8)
    }

    /// The hardware error code, for vectors where the processor supplies one.
    pub fn error_code(&self) -> Option<u32> {
        if self.vector().pushes_error_code() {
            Some(self.error_code)
        } else {
            None
        }
    }

    /// Privilege level of the interrupted code.
    pub fn privilege_level(&self) -> u8 {
        (self.cs & 0b11) as u8
    }

    /// Interrupted stack pointer and segment, present only after a privilege change.
    pub fn user_stack(&self) -> Option<(u32, u16)> {
        if self.privilege_level() != 0 {
            Some((self.user_esp, self.user_ss as u16))
        } else {
            None
        }
    }
}

bitflags! {
    /// Type and attribute byte of an interrupt descriptor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct GateFlags: u8 {
        /// 32-bit interrupt gate; clears IF on entry.
        const INTERRUPT_32 = 0x0E;
        /// 32-bit trap gate; leaves IF alone.
        const TRAP_32 = 0x0F;
        /// Descriptor privilege level 3.
        const DPL_3 = 0x60;
        /// Segment present.
        const PRESENT = 0x80;
    }
}

impl GateFlags {
    /// Present ring-0 32-bit interrupt gate (`0x8E`).
    pub const KERNEL_INTERRUPT: GateFlags =
        GateFlags::from_bits_retain(GateFlags::PRESENT.bits() | GateFlags::INTERRUPT_32.bits());

    /// Descriptor privilege level, 0-3.
    pub const fn dpl(self) -> u8 {
        (self.bits() >> 5) & 0b11
    }
}

/// One 8-byte i386 gate descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct VectorDescriptor {
    offset_low: u16,
    selector: u16,
    zero: u8,
    flags: u8,
    offset_high: u16,
}

impl VectorDescriptor {
    /// A non-present descriptor.
    pub const MISSING: VectorDescriptor = VectorDescriptor {
        offset_low: 0,
        selector: 0,
        zero: 0,
        flags: 0,
        offset_high: 0,
    };

    /// Builds a gate descriptor for `target` in code segment `selector`.
    pub const fn new(target: u32, selector: u16, flags: GateFlags) -> Self {
        VectorDescriptor {
            offset_low: target as u16,
            selector,
            zero: 0,
            flags: flags.bits(),
            offset_high: (target >> 16) as u16,
        }
    }

    /// Handler entry address.
    pub const fn target(&self) -> u32 {
        (self.offset_high as u32) << 16 | self.offset_low as u32
    }

    /// Code-segment selector loaded on entry.
    pub const fn selector(&self) -> u16 {
        self.selector
    }

    /// Gate type and attribute flags.
    pub const fn flags(&self) -> GateFlags {
        GateFlags::from_bits_retain(self.flags)
    }

    /// Whether the present bit is set.
    pub const fn is_present(&self) -> bool {
        self.flags & GateFlags::PRESENT.bits() != 0
    }
}

//! Trap entry stubs and the global kernel instance they dispatch into.
//!
//! Each of the 256 vectors gets a 16-byte stub that pushes a zero error code
//! (unless the processor already pushed one) and the vector number, then
//! jumps to `trap_common`. That routine saves the general registers with
//! `pusha`, hands the resulting [`TrapFrame`] to [`trap_entry`], and unwinds
//! with `iret`.

use super::{halt_loop, X86Cpu, X86Ports, VgaBuffer};
use crate::devices::PcPlatform;
use crate::display::TextScreen;
use crate::kernel::Kernel;
use crate::trap::{TrapOutcome, VectorTable};
use lazy_static::lazy_static;
use minios_common::{GateFlags, TrapFrame, Vector, VectorDescriptor};
use spin::Mutex;

/// Distance between consecutive entry stubs.
const STUB_SIZE: u32 = 16;

core::arch::global_asm!(
    r#"
    .section .text
    .balign 16
    .global trap_stubs
trap_stubs:
    .set vector, 0
    .rept 256
    .balign 16
    .if (vector == 8) || ((vector >= 10) && (vector <= 14)) || (vector == 17) || (vector == 21) || (vector == 29) || (vector == 30)
    .else
    pushl $0
    .endif
    pushl $vector
    jmp trap_common
    .set vector, vector + 1
    .endr

trap_common:
    pushal
    cld
    pushl %esp
    call trap_entry
    addl $4, %esp
    popal
    addl $8, %esp
    iretl
"#,
    options(att_syntax)
);

extern "C" {
    static trap_stubs: u8;
}

/// The kernel as it runs on a PC.
pub type PcKernel = Kernel<'static, TextScreen<VgaBuffer>, PcPlatform<X86Ports, X86Cpu>>;

/// Storage for the interrupt descriptor table, at a fixed address.
static VECTOR_TABLE: Mutex<VectorTable> = Mutex::new(VectorTable::empty());

lazy_static! {
    /// The kernel instance reached from every trap.
    ///
    /// Boot code holds the lock only while interrupts are disabled.
    pub static ref KERNEL: Mutex<PcKernel> = Mutex::new(Kernel::new(
        TextScreen::new(VgaBuffer::new()),
        PcPlatform::new(X86Ports, X86Cpu),
        stub_vectors(),
    ));
}

/// Entry address of the stub for `vector`.
pub fn stub_address(vector: Vector) -> u32 {
    // SAFETY: only the address of the symbol is taken.
    let base = unsafe { core::ptr::addr_of!(trap_stubs) } as u32;
    base + vector.as_u8() as u32 * STUB_SIZE
}

/// The static vector table, routing every vector to its entry stub.
///
/// The lock guard is leaked so the kernel holds the table for good; this runs
/// once, from the `KERNEL` initializer.
fn stub_vectors() -> &'static mut VectorTable {
    let table = spin::MutexGuard::leak(VECTOR_TABLE.lock());
    let selector = X86Cpu::code_selector();
    table.fill(|vector| {
        VectorDescriptor::new(stub_address(vector), selector, GateFlags::KERNEL_INTERRUPT)
    });
    table
}

/// Common trap handler, called by `trap_common` with the saved frame.
#[no_mangle]
extern "C" fn trap_entry(frame: *const TrapFrame) {
    // SAFETY: `trap_common` passes the frame it just built on this stack.
    let frame = unsafe { &*frame };

    let Some(mut kernel) = KERNEL.try_lock() else {
        crate::serial_println!("trap {} while the kernel was locked", frame.vector);
        halt_loop();
    };

    if let TrapOutcome::Halt(fatal) = kernel.dispatch(frame) {
        crate::serial_println!("halting: {}", fatal);
        kernel.halt();
    }
}

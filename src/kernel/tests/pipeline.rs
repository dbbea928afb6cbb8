//! End-to-end tests of the trap → decoder → editor → command path.

use minios_common::trap::IRQ_BASE;
use minios_common::{FatalTrap, GateFlags, Irq, Vector, VectorDescriptor};
use minios_hal::DisplaySink;
use minios_kernel::keyboard::scancode;
use minios_kernel::terminal::{HISTORY_CAPACITY, PROMPT};
use minios_kernel::testutil::{
    frame_for, press_byte, press_enter, stub_address, test_kernel, test_vectors, type_text,
    TestKernel, TEST_SELECTOR,
};
use minios_kernel::trap::VectorTable;
use minios_kernel::trap::TrapOutcome;

fn booted(vectors: &mut VectorTable) -> TestKernel<'_> {
    let mut kernel = test_kernel(vectors);
    kernel.activate().expect("activate");
    kernel.start_shell();
    kernel
}

/// The descriptors at the address and limit the kernel loaded into the IDTR.
fn published<'k>(kernel: &'k TestKernel<'_>) -> &'k [VectorDescriptor] {
    let (base, limit) = kernel.hardware().loaded.expect("idtr loaded");
    let count = (limit as usize + 1) / core::mem::size_of::<VectorDescriptor>();
    // SAFETY: the loaded base is the kernel's borrowed table, which outlives
    // the returned slice.
    unsafe { core::slice::from_raw_parts(base as *const VectorDescriptor, count) }
}

#[test]
fn help_end_to_end() {
    let mut vectors = test_vectors();
    let mut kernel = booted(&mut vectors);
    type_text(&mut kernel, "help");
    press_enter(&mut kernel);

    let cells = kernel.display().cells();
    assert_eq!(cells.find_row("mini-os> help"), Some(0));
    assert_eq!(cells.find_row("Available commands:"), Some(1));
    assert!(cells.find_row("  help     - Show this help").is_some());
    assert!(cells.find_row("  status   - Show system status").is_some());
    assert_eq!(cells.count_rows_containing("mini-os> "), 2);

    assert_eq!(kernel.shell().history().len(), 1);
    assert_eq!(kernel.shell().history().get(0), Some("help"));
    assert!(kernel.shell().line().is_empty());
    // Header line, seven catalog lines, then the new prompt.
    let (x, y) = kernel.display().cursor();
    assert_eq!((x, y), (PROMPT.len(), 9));
    let row = cells.row(y).expect("prompt row");
    assert_eq!(&row[..PROMPT.len()], PROMPT.as_bytes());
}

#[test]
fn one_eoi_per_keyboard_trap() {
    let mut vectors = test_vectors();
    let mut kernel = booted(&mut vectors);
    for n in 1..=5u32 {
        press_byte(&mut kernel, 0x1E);
        assert_eq!(kernel.hardware().eoi_count(Irq::KEYBOARD), n);
        assert_eq!(kernel.hardware().total_eois(), n);
    }
    assert_eq!(kernel.stats().keyboard, 5);
    assert_eq!(kernel.hardware().pending(), 0);
}

#[test]
fn unregistered_irq_is_acknowledged() {
    let mut vectors = test_vectors();
    let mut kernel = booted(&mut vectors);
    let timer = frame_for(IRQ_BASE);
    let secondary = frame_for(IRQ_BASE + 12);
    assert_eq!(kernel.dispatch(&timer), TrapOutcome::Resume);
    assert_eq!(kernel.dispatch(&secondary), TrapOutcome::Resume);
    assert_eq!(kernel.hardware().eoi_count(Irq::TIMER), 1);
    assert_eq!(kernel.hardware().eoi_counts[12], 1);
    assert_eq!(kernel.stats().ignored, 2);
    assert_eq!(kernel.stats().device_traps, 2);
}

#[test]
fn descriptors_read_back_after_activate() {
    let mut vectors = test_vectors();
    let kernel = booted(&mut vectors);
    assert!(kernel.vectors().is_active());
    let (base, limit) = kernel.hardware().loaded.expect("idtr loaded");
    assert_eq!(base, kernel.vectors().base());
    assert_eq!(limit, 256 * 8 - 1);
    let table = published(&kernel);
    for vector in Vector::all() {
        let descriptor = table[vector.index()];
        assert_eq!(descriptor, kernel.vectors().descriptor(vector));
        assert_eq!(descriptor.target(), stub_address(vector));
        assert_eq!(descriptor.selector(), TEST_SELECTOR);
        assert_eq!(descriptor.flags(), GateFlags::KERNEL_INTERRUPT);
    }
}

#[test]
fn installed_descriptor_is_published_and_survives_a_move() {
    let mut vectors = test_vectors();
    let mut kernel = test_kernel(&mut vectors);
    kernel
        .vectors_mut()
        .install(Vector::new(0x80), 0x00C0_FFEE, 0x10, GateFlags::KERNEL_INTERRUPT);
    kernel.activate().expect("activate");

    // The kernel value moves; the table it borrows must not.
    let kernel = Box::new(kernel);
    let (base, limit) = kernel.hardware().loaded.expect("idtr loaded");
    assert_eq!(base, kernel.vectors().base());
    assert_eq!(limit, 256 * 8 - 1);

    let table = published(&kernel);
    assert_eq!(table.len(), 256);
    let custom = table[0x80];
    assert_eq!(custom.target(), 0x00C0_FFEE);
    assert_eq!(custom.selector(), 0x10);
    assert_eq!(custom.flags(), GateFlags::KERNEL_INTERRUPT);
    for vector in Vector::all().filter(|v| v.as_u8() != 0x80) {
        let descriptor = table[vector.index()];
        assert_eq!(descriptor.target(), stub_address(vector));
        assert_eq!(descriptor.selector(), TEST_SELECTOR);
    }
}

#[test]
fn activate_twice_fails() {
    let mut vectors = test_vectors();
    let mut kernel = booted(&mut vectors);
    assert!(kernel.activate().is_err());
    assert_eq!(kernel.hardware().load_count, 1);
    assert!(kernel.hardware().enabled);
}

#[test]
fn status_lands_in_history() {
    let mut vectors = test_vectors();
    let mut kernel = booted(&mut vectors);
    press_enter(&mut kernel);
    assert!(kernel.shell().history().is_empty());

    type_text(&mut kernel, "status");
    press_enter(&mut kernel);
    assert_eq!(kernel.shell().history().len(), 1);
    assert_eq!(kernel.shell().history().get(0), Some("status"));
    assert_eq!(kernel.shell().line().len(), 0);
    assert!(kernel.display().cells().find_row("System Status:").is_some());
    assert!(kernel.display().cells().find_row("  Num Lock: ON").is_some());
}

#[test]
fn history_evicts_oldest() {
    let mut vectors = test_vectors();
    let mut kernel = booted(&mut vectors);
    for n in 0..=HISTORY_CAPACITY {
        let mut command = *b"echo c0";
        command[6] = b'0' + n as u8;
        type_text(&mut kernel, core::str::from_utf8(&command).expect("ascii"));
        press_enter(&mut kernel);
    }
    let history = kernel.shell().history();
    assert_eq!(history.len(), HISTORY_CAPACITY);
    assert_eq!(history.get(0), Some("echo c1"));
    assert_eq!(history.get(HISTORY_CAPACITY - 1), Some("echo c:"));
}

#[test]
fn unknown_command_reports() {
    let mut vectors = test_vectors();
    let mut kernel = booted(&mut vectors);
    type_text(&mut kernel, "frobnicate");
    press_enter(&mut kernel);
    assert!(kernel
        .display()
        .cells()
        .find_row("Unknown command: frobnicate")
        .is_some());
}

#[test]
fn shifted_typing_and_backspace() {
    let mut vectors = test_vectors();
    let mut kernel = booted(&mut vectors);
    type_text(&mut kernel, "Hi!x");
    press_byte(&mut kernel, scancode::BACKSPACE);
    press_byte(&mut kernel, scancode::BACKSPACE | scancode::RELEASE_BIT);
    assert_eq!(kernel.shell().line().as_str(), "Hi!");
}

#[test]
fn arrow_up_recalls_previous_line() {
    let mut vectors = test_vectors();
    let mut kernel = booted(&mut vectors);
    type_text(&mut kernel, "version");
    press_enter(&mut kernel);
    press_byte(&mut kernel, scancode::EXTENDED_PREFIX);
    press_byte(&mut kernel, scancode::extended::UP);
    assert_eq!(kernel.shell().line().as_str(), "version");
    press_enter(&mut kernel);
    assert_eq!(kernel.shell().history().len(), 2);
}

#[test]
fn reboot_resets_controller() {
    let mut vectors = test_vectors();
    let mut kernel = booted(&mut vectors);
    type_text(&mut kernel, "reboot");
    press_enter(&mut kernel);
    assert_eq!(kernel.hardware().resets, 1);
    assert_eq!(kernel.hardware().halts, 1);
}

#[test]
fn clear_leaves_single_prompt() {
    let mut vectors = test_vectors();
    let mut kernel = booted(&mut vectors);
    type_text(&mut kernel, "echo one");
    press_enter(&mut kernel);
    type_text(&mut kernel, "clear");
    press_enter(&mut kernel);
    assert_eq!(kernel.display().cells().count_rows_containing(PROMPT), 1);
    assert_eq!(kernel.display().cursor(), (PROMPT.len(), 0));
}

#[test]
fn fault_halts_without_eoi() {
    let mut vectors = test_vectors();
    let mut kernel = booted(&mut vectors);
    let mut frame = frame_for(14);
    frame.error_code = 0x2;
    let outcome = kernel.dispatch(&frame);
    assert_eq!(
        outcome,
        TrapOutcome::Halt(FatalTrap::Fault {
            vector: Vector::new(14),
            error_code: Some(0x2),
            eip: frame.eip,
        })
    );
    assert_eq!(kernel.hardware().total_eois(), 0);
    assert!(kernel.display().cells().find_row("Page Fault").is_some());
}

#[test]
fn vector_48_is_unhandled() {
    let mut vectors = test_vectors();
    let mut kernel = booted(&mut vectors);
    assert_eq!(
        kernel.dispatch(&frame_for(48)),
        TrapOutcome::Halt(FatalTrap::UnhandledVector(Vector::new(48)))
    );
    assert!(kernel
        .display()
        .cells()
        .find_row("unhandled vector 48")
        .is_some());
}

#[test]
fn trap_before_activate_halts() {
    let mut vectors = test_vectors();
    let mut kernel = test_kernel(&mut vectors);
    let outcome = kernel.dispatch(&frame_for(IRQ_BASE + 1));
    assert_eq!(
        outcome,
        TrapOutcome::Halt(FatalTrap::NotActivated(Vector::new(33)))
    );
    assert_eq!(kernel.hardware().total_eois(), 0);
}

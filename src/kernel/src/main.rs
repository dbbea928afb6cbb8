//! MiniOS Kernel Entry Point
//!
//! A Multiboot loader jumps to `_start`, which sets up a stack and calls
//! [`kernel_main`] with the loader's magic value and info pointer.

#![cfg_attr(target_os = "none", no_std, no_main)]

#[cfg(all(target_arch = "x86", target_os = "none"))]
mod entry {
    use core::fmt::Write;
    use core::panic::PanicInfo;
    use minios_hal::{Color, ColorCode, DisplaySink};
    use minios_kernel::arch::{self, interrupts::KERNEL, VgaBuffer, X86Cpu};
    use minios_kernel::boot::{self, Status};
    use minios_kernel::display::{TextScreen, BUFFER_HEIGHT};
    use minios_kernel::serial_println;

    /// Value a Multiboot-compliant loader leaves in `eax`.
    const MULTIBOOT_BOOTLOADER_MAGIC: u32 = 0x2BAD_B002;

    core::arch::global_asm!(
        r#"
        .section .multiboot, "a"
        .balign 4
        .long 0x1BADB002
        .long 0x00000003
        .long -(0x1BADB002 + 0x00000003)

        .section .bss
        .balign 16
    boot_stack_bottom:
        .skip 65536
    boot_stack_top:

        .section .text
        .global _start
    _start:
        movl $boot_stack_top, %esp
        pushl %ebx
        pushl %eax
        call kernel_main
    1:
        cli
        hlt
        jmp 1b
    "#,
        options(att_syntax)
    );

    /// Kernel entry point, called from `_start`.
    #[no_mangle]
    extern "C" fn kernel_main(magic: u32, info: u32) -> ! {
        minios_kernel::init();
        log::info!("MiniOS starting");

        {
            let mut kernel = KERNEL.lock();
            let display = kernel.display_mut();
            display.clear();
            boot::banner::print_banner(display);

            if magic == MULTIBOOT_BOOTLOADER_MAGIC {
                boot::log(display, Status::Ok, "Multiboot handoff");
            } else {
                boot::log(display, Status::Warn, "Unknown boot loader magic");
            }
            boot::log_address(display, "Multiboot info at", info);
            boot::log(display, Status::Ok, "Serial console on COM1");
            boot::log(display, Status::Ok, "Vector table filled from entry stubs");

            kernel.hardware_mut().pic_mut().initialize();
            boot::log(kernel.display_mut(), Status::Ok, "PIC remapped to vectors 32-47");
            boot::log_detail(kernel.display_mut(), "IRQ 0-7 -> 32-39, IRQ 8-15 -> 40-47");

            if let Err(err) = kernel.activate() {
                log::error!("{}", err);
                boot::log(kernel.display_mut(), Status::Fail, "Interrupt setup failed");
                kernel.halt();
            }
            boot::log(kernel.display_mut(), Status::Ok, "Interrupts enabled");

            #[cfg(feature = "test")]
            {
                drop(kernel);
                minios_kernel::tests::run_all();
                minios_kernel::testutil::exit_qemu(
                    &mut arch::X86Ports,
                    minios_kernel::testutil::QemuExitCode::Success,
                );
                arch::halt_loop();
            }

            #[cfg(not(feature = "test"))]
            {
                kernel.display_mut().newline();
                kernel.start_shell();
            }
        }

        X86Cpu::enable_interrupts();
        loop {
            arch::hlt();
        }
    }

    #[panic_handler]
    fn panic(info: &PanicInfo) -> ! {
        X86Cpu::disable_interrupts();
        serial_println!("KERNEL PANIC: {}", info);

        #[cfg(feature = "test")]
        minios_kernel::testutil::exit_qemu(
            &mut arch::X86Ports,
            minios_kernel::testutil::QemuExitCode::Failed,
        );

        // The kernel lock may be held, so write through a fresh screen.
        let mut screen = TextScreen::new(VgaBuffer::new());
        screen.set_cursor(0, BUFFER_HEIGHT - 1);
        screen.newline();
        screen.set_color(ColorCode::new(Color::LightRed, Color::Black));
        let _ = write!(screen, "KERNEL PANIC: {}", info);
        arch::halt_loop()
    }
}

#[cfg(not(target_os = "none"))]
fn main() {
    eprintln!("minios-kernel is a bare-metal binary; build it with --target i686-minios.json");
}

//! MiniOS Kernel
//!
//! A small interactive kernel for 32-bit protected-mode x86.
//!
//! # Architecture
//!
//! The kernel is structured into the following modules:
//! - `trap`: vector table, trap classification, device routing
//! - `keyboard`: scancode set 1 decoder with modifier and lock state
//! - `terminal`: line editor, history and built-in commands
//! - `kernel`: the owned context tying the pipeline together
//! - `display`: text screen over a VGA-style cell buffer
//! - `devices`: 8259 PIC pair and PS/2 controller drivers
//! - `boot`: banner and boot log
//! - `arch`: i386 backend (port I/O, entry stubs, VGA, serial)
//!
//! Everything above `arch` is written against the `minios-hal` traits, so
//! the whole input pipeline runs on the host under `cargo test`.
//!
//! # Safety
//!
//! This is a `#![no_std]` kernel. All unsafe code lives in `arch` and is
//! documented with the invariant it relies on.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod arch;
pub mod boot;
pub mod devices;
pub mod display;
pub mod kernel;
pub mod keyboard;
pub mod terminal;
pub mod testutil;
pub mod trap;

/// Initializes core kernel services.
///
/// Called first thing during boot: brings up COM1 and installs the serial
/// logger.
#[cfg(target_arch = "x86")]
pub fn init() {
    if arch::logger::init(log::LevelFilter::Info).is_err() {
        crate::serial_println!("logger already installed");
    }
}

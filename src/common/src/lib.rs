//! Types shared between the MiniOS kernel and its hardware layer.
//!
//! Everything here is plain data: trap frames and descriptors laid out exactly
//! as the i386 processor reads and writes them, bounded index types for
//! vectors and IRQ lines, the keyboard modifier flag set, and error values.

#![no_std]
#![warn(missing_docs)]

pub mod error;
pub mod keyboard;
pub mod trap;

pub use error::{FatalTrap, TrapError};
pub use keyboard::Modifiers;
pub use trap::{Exception, GateFlags, Irq, TrapFrame, Vector, VectorDescriptor};

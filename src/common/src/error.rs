//! System-wide error types for MiniOS.

use crate::trap::{Exception, Vector};
use core::fmt;

/// Errors returned by vector table management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TrapError {
    /// The table has already been published to the processor.
    AlreadyActive,
    /// A vector has no present descriptor, so the table cannot be published.
    MissingDescriptor(Vector),
}

impl fmt::Display for TrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrapError::AlreadyActive => write!(f, "vector table already active"),
            TrapError::MissingDescriptor(vector) => {
                write!(f, "vector {} has no descriptor", vector.as_u8())
            }
        }
    }
}

/// Why a trap stopped the machine.
///
/// None of these are recoverable: the trap path reports them and halts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FatalTrap {
    /// A processor exception (vectors 0-31).
    Fault {
        /// The faulting vector.
        vector: Vector,
        /// Hardware error code, for the vectors that push one.
        error_code: Option<u32>,
        /// Instruction pointer saved by the processor.
        eip: u32,
    },
    /// A vector outside the exception and device ranges.
    UnhandledVector(Vector),
    /// A trap arrived before the vector table was activated.
    NotActivated(Vector),
}

impl FatalTrap {
    /// The vector that caused the halt.
    pub fn vector(&self) -> Vector {
        match *self {
            FatalTrap::Fault { vector, .. }
            | FatalTrap::UnhandledVector(vector)
            | FatalTrap::NotActivated(vector) => vector,
        }
    }
}

impl fmt::Display for FatalTrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FatalTrap::Fault {
                vector,
                error_code,
                eip,
            } => {
                let name = Exception::from_vector(vector)
                    .map(Exception::name)
                    .unwrap_or("Unknown Exception");
                write!(f, "EXCEPTION: {} (vector {})", name, vector.as_u8())?;
                if let Some(code) = error_code {
                    write!(f, " error code {:#x}", code)?;
                }
                write!(f, " at eip {:#010x}", eip)
            }
            FatalTrap::UnhandledVector(vector) => {
                write!(f, "unhandled vector {}", vector.as_u8())
            }
            FatalTrap::NotActivated(vector) => {
                write!(f, "vector {} delivered before activation", vector.as_u8())
            }
        }
    }
}

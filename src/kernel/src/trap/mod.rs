//! Interrupt vector table and trap classification.

mod dispatch;
mod vectors;

pub use dispatch::{report_fatal, Device, DeviceTable, TrapKind, TrapOutcome, TrapStats};
pub use vectors::VectorTable;

//! The 256-entry interrupt descriptor table.

use minios_common::trap::VECTOR_COUNT;
use minios_common::{GateFlags, TrapError, Vector, VectorDescriptor};
use minios_hal::Cpu;

/// Size in bytes of one gate descriptor.
const DESCRIPTOR_SIZE: usize = core::mem::size_of::<VectorDescriptor>();

/// Interrupt descriptor table.
///
/// The table must not move once [`activate`](Self::activate) has published
/// its address. On hardware it lives in a `static`; the kernel only borrows it.
#[repr(C, align(8))]
pub struct VectorTable {
    entries: [VectorDescriptor; VECTOR_COUNT],
    active: bool,
}

impl VectorTable {
    /// A table with every descriptor missing.
    pub const fn empty() -> Self {
        VectorTable {
            entries: [VectorDescriptor::MISSING; VECTOR_COUNT],
            active: false,
        }
    }

    /// A table where every vector gets the descriptor `default` builds for it.
    pub fn new(default: impl Fn(Vector) -> VectorDescriptor) -> Self {
        let mut table = Self::empty();
        table.fill(default);
        table
    }

    /// Overwrite every descriptor with the one `default` builds for its vector.
    pub fn fill(&mut self, default: impl Fn(Vector) -> VectorDescriptor) {
        for vector in Vector::all() {
            self.install_descriptor(vector, default(vector));
        }
    }

    /// Overwrite the descriptor for `vector`.
    pub fn install(&mut self, vector: Vector, target: u32, selector: u16, flags: GateFlags) {
        if self.active {
            log::warn!("vector {} rewritten after activation", vector.as_u8());
        }
        self.install_descriptor(vector, VectorDescriptor::new(target, selector, flags));
    }

    fn install_descriptor(&mut self, vector: Vector, descriptor: VectorDescriptor) {
        self.entries[vector.index()] = descriptor;
    }

    /// The descriptor currently held for `vector`.
    pub fn descriptor(&self, vector: Vector) -> VectorDescriptor {
        self.entries[vector.index()]
    }

    /// Publish the table to the processor.
    ///
    /// Succeeds once; every vector must already hold a present descriptor.
    pub fn activate(&mut self, cpu: &mut impl Cpu) -> Result<(), TrapError> {
        if self.active {
            return Err(TrapError::AlreadyActive);
        }
        if let Some(vector) = Vector::all().find(|v| !self.entries[v.index()].is_present()) {
            return Err(TrapError::MissingDescriptor(vector));
        }
        let limit = (VECTOR_COUNT * DESCRIPTOR_SIZE - 1) as u16;
        cpu.load_vector_table(self.entries.as_ptr() as usize, limit);
        self.active = true;
        log::debug!("vector table loaded at {:#x}", self.base());
        Ok(())
    }

    /// Whether [`activate`](Self::activate) has succeeded.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Linear address of the first descriptor.
    pub fn base(&self) -> usize {
        self.entries.as_ptr() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockHardware;

    fn table() -> VectorTable {
        VectorTable::new(|v| {
            let target = 0x0010_0000 + v.as_u8() as u32 * 16;
            VectorDescriptor::new(target, 0x08, GateFlags::KERNEL_INTERRUPT)
        })
    }

    #[test]
    fn activate_loads_base_and_limit_once() {
        let mut table = table();
        let mut cpu = MockHardware::new();
        assert_eq!(table.activate(&mut cpu), Ok(()));
        assert_eq!(cpu.loaded, Some((table.base(), 2047)));
        assert_eq!(table.activate(&mut cpu), Err(TrapError::AlreadyActive));
        assert_eq!(cpu.load_count, 1);
    }

    #[test]
    fn activate_rejects_missing_descriptor() {
        let mut table = table();
        table.entries[77] = VectorDescriptor::MISSING;
        let mut cpu = MockHardware::new();
        assert_eq!(
            table.activate(&mut cpu),
            Err(TrapError::MissingDescriptor(Vector::new(77)))
        );
        assert!(!table.is_active());
        assert_eq!(cpu.load_count, 0);
    }

    #[test]
    fn install_overwrites_one_entry() {
        let mut table = table();
        table.install(Vector::new(33), 0xDEAD_BEEF, 0x10, GateFlags::KERNEL_INTERRUPT);
        let descriptor = table.descriptor(Vector::new(33));
        assert_eq!(descriptor.target(), 0xDEAD_BEEF);
        assert_eq!(descriptor.selector(), 0x10);
        assert_eq!(table.descriptor(Vector::new(34)).target(), 0x0010_0000 + 34 * 16);
    }
}

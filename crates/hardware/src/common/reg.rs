//! General-Purpose Register File.
//!
//! This module provides the `RegisterFile` struct holding the 32 general-purpose
//! registers. It provides:
//! 1. **Signed Storage:** Slots hold signed 32-bit values; readers choose the view.
//! 2. **Uniform Access:** Slot 0 is an ordinary register; only software convention
//!    gives it meaning.
//! 3. **Observability:** A dump in the classic two-per-line layout.

use std::fmt;

/// Number of general-purpose registers.
pub const NUM_REGS: usize = 32;

/// Register conventionally holding a subroutine's return address.
pub const RETURN_REG: usize = 31;

/// General-purpose register file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [i32; NUM_REGS],
}

impl RegisterFile {
    /// Creates a register file with every slot cleared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a register as an unsigned bit pattern.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31); only the low five bits are used.
    #[inline(always)]
    pub const fn read(&self, idx: usize) -> u32 {
        self.regs[idx & (NUM_REGS - 1)] as u32
    }

    /// Reads a register as a signed value.
    #[inline(always)]
    pub const fn read_signed(&self, idx: usize) -> i32 {
        self.regs[idx & (NUM_REGS - 1)]
    }

    /// Writes a register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31); only the low five bits are used.
    /// * `val` - The 32-bit value to store.
    #[inline(always)]
    pub const fn write(&mut self, idx: usize, val: u32) {
        self.regs[idx & (NUM_REGS - 1)] = val as i32;
    }
}

impl fmt::Display for RegisterFile {
    /// Formats all registers two per line as `R%2d: 0x%08x (%11d)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, val) in self.regs.iter().enumerate() {
            write!(f, "R{i:2}: {:#010x} ({val:11}) ", *val as u32)?;
            if i % 2 == 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

//! Memory Access Types.
//!
//! This module defines the classification of memory accesses used throughout the simulator.
//! These types are used for the following:
//! 1. **Permission Validation:** Checking read/write/execute permissions in the MMU.
//! 2. **Cache Selection:** Routing fetches to the instruction cache and data to the data cache.
//! 3. **Lane Extraction:** Selecting the byte lanes of a word for sub-word loads and stores.

/// Type of memory access operation.
///
/// Used to distinguish between instruction fetches, data loads, and data stores
/// for proper memory management and permission enforcement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Instruction fetch access. Requires the X permission.
    Fetch,

    /// Data read access. Requires the R permission.
    Read,

    /// Data write access. Requires the W permission.
    Write,
}

impl AccessType {
    /// Returns `true` for write accesses.
    #[inline(always)]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}

/// Width of a data access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessWidth {
    /// One byte.
    Byte,
    /// Two bytes.
    Half,
    /// Four bytes.
    Word,
}

impl AccessWidth {
    /// Number of bytes moved by an access of this width.
    pub const fn bytes(self) -> u32 {
        match self {
            Self::Byte => 1,
            Self::Half => 2,
            Self::Word => 4,
        }
    }

    /// Log2 of [`bytes`](Self::bytes); scales the short immediate offset of loads and stores.
    pub const fn shift(self) -> u32 {
        match self {
            Self::Byte => 0,
            Self::Half => 1,
            Self::Word => 2,
        }
    }

    /// Extracts this access's lane from the word containing `addr`.
    ///
    /// The low address bits below the access size are ignored.
    ///
    /// # Arguments
    ///
    /// * `word` - The aligned 32-bit word that contains the addressed data.
    /// * `addr` - The byte address of the access.
    ///
    /// # Returns
    ///
    /// The zero-extended lane value.
    pub const fn extract(self, word: u32, addr: u32) -> u32 {
        match self {
            Self::Byte => (word >> ((addr & 3) * 8)) & 0xFF,
            Self::Half => (word >> ((addr & 2) * 8)) & 0xFFFF,
            Self::Word => word,
        }
    }

    /// Merges `value` into this access's lane of `word`.
    ///
    /// # Arguments
    ///
    /// * `word` - The current aligned word.
    /// * `addr` - The byte address of the access.
    /// * `value` - The value to insert; only the low lane bits are used.
    ///
    /// # Returns
    ///
    /// The word with the lane replaced.
    pub const fn merge(self, word: u32, addr: u32, value: u32) -> u32 {
        match self {
            Self::Byte => {
                let shift = (addr & 3) * 8;
                (word & !(0xFF << shift)) | ((value & 0xFF) << shift)
            }
            Self::Half => {
                let shift = (addr & 2) * 8;
                (word & !(0xFFFF << shift)) | ((value & 0xFFFF) << shift)
            }
            Self::Word => value,
        }
    }
}

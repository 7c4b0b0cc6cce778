//! Physical and Virtual Address types.
//!
//! This module defines strong types for physical and virtual addresses to prevent
//! accidental mixing of address spaces. It provides the following:
//! 1. **Type Safety:** Distinguishes between virtual and physical address spaces at compile time.
//! 2. **Address Manipulation:** Helpers for the two-level page-table indices and page offsets.
//! 3. **MMU Integration:** Acts as the primary interface for memory translation operations.

use std::fmt;

use super::constants::{
    PAGE_INDEX_L1_MASK, PAGE_INDEX_L1_SHIFT, PAGE_INDEX_L2_MASK, PAGE_INDEX_L2_SHIFT,
    PAGE_OFFSET_MASK, PAGE_OFFSET_PSE_MASK,
};

/// A virtual address in the 32-bit target address space.
///
/// Virtual addresses are produced by software and must be translated to physical
/// addresses through the MMU before any memory access, unless the MMU is in direct mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtAddr(pub u32);

/// A physical address in the 32-bit target address space.
///
/// Physical addresses index the RAM store directly (below the RAM ceiling) or the
/// memory-mapped I/O window (at or above IOSR).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysAddr(pub u32);

impl VirtAddr {
    /// Creates a new virtual address from a raw 32-bit value.
    ///
    /// # Arguments
    ///
    /// * `addr` - The raw 32-bit address value.
    #[inline(always)]
    pub const fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Returns the raw 32-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u32 {
        self.0
    }

    /// Index into the page directory (bits 31..22).
    #[inline(always)]
    pub const fn l1_index(&self) -> u32 {
        (self.0 & PAGE_INDEX_L1_MASK) >> PAGE_INDEX_L1_SHIFT
    }

    /// Index into the second-level page table (bits 21..12).
    #[inline(always)]
    pub const fn l2_index(&self) -> u32 {
        (self.0 & PAGE_INDEX_L2_MASK) >> PAGE_INDEX_L2_SHIFT
    }

    /// Extracts the offset within a 4 KiB page.
    ///
    /// # Returns
    ///
    /// The page offset (0-4095).
    #[inline(always)]
    pub const fn page_offset(&self) -> u32 {
        self.0 & PAGE_OFFSET_MASK
    }

    /// Extracts the offset within a 4 MiB large page.
    #[inline(always)]
    pub const fn large_page_offset(&self) -> u32 {
        self.0 & PAGE_OFFSET_PSE_MASK
    }
}

impl PhysAddr {
    /// Creates a new physical address from a raw 32-bit value.
    ///
    /// # Arguments
    ///
    /// * `addr` - The raw 32-bit address value.
    #[inline(always)]
    pub const fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Returns the raw 32-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v:{:#010x}", self.0)
    }
}

impl fmt::Display for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p:{:#010x}", self.0)
    }
}

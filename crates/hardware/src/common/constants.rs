//! Global System Constants.
//!
//! This module defines architectural constants used across the simulator. It includes:
//! 1. **Memory Constants:** RAM ceiling, backing-store page geometry, and stack defaults.
//! 2. **Paging Constants:** Page-table index masks and offsets for 4 KiB and 4 MiB pages.
//! 3. **Simulation Constants:** Sentinels and intervals for the cycle loop.

/// Highest RAM address plus one (64 MiB).
///
/// Physical addresses at or above this value and below IOSR do not exist.
pub const MEMORY_MAX_ADDR: u32 = 0x0400_0000;

/// Size of one lazily-allocated backing-store page (16 KiB).
pub const STORE_PAGE_SIZE: usize = 1 << STORE_PAGE_SHIFT;

/// Bit shift converting a physical address to a backing-store page index.
pub const STORE_PAGE_SHIFT: u32 = 14;

/// Initial kernel stack pointer (top of RAM).
pub const STACK_DEFAULT: u32 = MEMORY_MAX_ADDR;

/// Default reset value of the I/O base register.
pub const IOSR_DEFAULT: u32 = 0xFF00_0000;

/// Size of a target instruction in bytes.
pub const INSTRUCTION_SIZE: u32 = 4;

/// Virtual address bits that select the page-directory entry.
pub const PAGE_INDEX_L1_MASK: u32 = 0xFFC0_0000;

/// Shift of the page-directory index.
pub const PAGE_INDEX_L1_SHIFT: u32 = 22;

/// Virtual address bits that select the page-table entry.
pub const PAGE_INDEX_L2_MASK: u32 = 0x003F_F000;

/// Shift of the page-table index.
pub const PAGE_INDEX_L2_SHIFT: u32 = 12;

/// Page-number bits of a 4 KiB mapping; also the frame bits of a small PTE.
pub const PAGE_NUM_MASK: u32 = 0xFFFF_F000;

/// Offset bits within a 4 KiB page.
pub const PAGE_OFFSET_MASK: u32 = 0x0000_0FFF;

/// Offset bits within a 4 MiB (page-size-extension) page.
pub const PAGE_OFFSET_PSE_MASK: u32 = 0x003F_FFFF;

/// Size of one interrupt-descriptor-table entry in bytes.
pub const IDT_ENTRY_SIZE: u32 = 8;

/// Default number of cycles between device polls.
pub const POLL_INTERVAL: u64 = 0x1000;

/// Default number of TLB slots.
pub const TLB_ENTRIES: usize = 64;

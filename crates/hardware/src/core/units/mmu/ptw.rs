//! Hardware Page Table Walker (PTW).
//!
//! This module implements the two-level page-table walk. The directory (selected by
//! privilege: KPDTR for kernel, PDTR for user) holds 1024 entries indexed by
//! `va[31:22]`; each entry either maps a 4 MiB page directly (PSE set, or always in
//! single-level mode) or points at a page table of 1024 entries indexed by `va[21:12]`.
//!
//! Entries are read straight from the physical store. Permissions are checked at both
//! levels; the accessed and dirty bits of second-level entries are written back
//! through the data-cache write path.

use crate::common::constants::{PAGE_INDEX_L1_MASK, PAGE_NUM_MASK};
use crate::common::{AccessType, Fault, PhysAddr, SimError, TranslationResult, VirtAddr};
use crate::core::arch::mode::PrivilegeMode;
use crate::core::arch::psr::MmuMode;
use crate::core::arch::sysreg::SystemRegisters;
use crate::core::units::cache::hierarchy::MemorySystem;
use crate::core::units::mmu::Mmu;

/// Page Table Entry valid bit (bit 0).
pub const PTE_VALID_BIT: u32 = 1;

/// Page Table Entry read permission bit (bit 1).
pub const PTE_READ_BIT: u32 = 1 << 1;

/// Page Table Entry write permission bit (bit 2).
pub const PTE_WRITE_BIT: u32 = 1 << 2;

/// Page Table Entry execute permission bit (bit 3).
pub const PTE_EXEC_BIT: u32 = 1 << 3;

/// Page Table Entry user mode access bit (bit 4).
pub const PTE_USER_BIT: u32 = 1 << 4;

/// Page Table Entry page-size-extension bit (bit 5).
pub const PTE_PSE_BIT: u32 = 1 << 5;

/// Page Table Entry accessed bit (bit 6).
pub const PTE_ACCESSED_BIT: u32 = 1 << 6;

/// Page Table Entry dirty bit (bit 7).
pub const PTE_DIRTY_BIT: u32 = 1 << 7;

/// Size of a page-table entry in bytes.
const PTE_SIZE: u32 = 4;

/// A strongly-typed wrapper around a raw 32-bit page-table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageTableEntry(u32);

impl PageTableEntry {
    /// Creates a new `PageTableEntry` from a raw value.
    pub const fn new(val: u32) -> Self {
        Self(val)
    }

    /// Returns the underlying raw value.
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Returns true if the Valid (V) bit is set.
    pub const fn is_valid(&self) -> bool {
        self.0 & PTE_VALID_BIT != 0
    }

    /// Returns true if the Read (R) bit is set.
    pub const fn can_read(&self) -> bool {
        self.0 & PTE_READ_BIT != 0
    }

    /// Returns true if the Write (W) bit is set.
    pub const fn can_write(&self) -> bool {
        self.0 & PTE_WRITE_BIT != 0
    }

    /// Returns true if the Execute (X) bit is set.
    pub const fn can_exec(&self) -> bool {
        self.0 & PTE_EXEC_BIT != 0
    }

    /// Returns true if the User (U) bit is set.
    pub const fn is_user(&self) -> bool {
        self.0 & PTE_USER_BIT != 0
    }

    /// Returns true if the entry maps a large page (PSE bit).
    pub const fn is_large(&self) -> bool {
        self.0 & PTE_PSE_BIT != 0
    }

    /// Returns true if the Accessed (A) bit is set.
    pub const fn is_accessed(&self) -> bool {
        self.0 & PTE_ACCESSED_BIT != 0
    }

    /// Returns true if the Dirty (D) bit is set.
    pub const fn is_dirty(&self) -> bool {
        self.0 & PTE_DIRTY_BIT != 0
    }

    /// Frame address of a 4 KiB mapping or of the next-level table (bits 31..12).
    pub const fn frame(&self) -> u32 {
        self.0 & PAGE_NUM_MASK
    }

    /// Frame address of a 4 MiB mapping (bits 31..22).
    pub const fn large_frame(&self) -> u32 {
        self.0 & PAGE_INDEX_L1_MASK
    }

    /// Returns a new instance with the Accessed (A) bit set.
    pub const fn with_accessed(&self) -> Self {
        Self(self.0 | PTE_ACCESSED_BIT)
    }

    /// Returns a new instance with the Dirty (D) bit set.
    pub const fn with_dirty(&self) -> Self {
        Self(self.0 | PTE_DIRTY_BIT)
    }
}

/// Checks an entry's permission bits against an access.
///
/// Reads need R, writes need W, and fetches need X; user mode additionally needs U.
///
/// # Arguments
///
/// * `pte` - The entry to check.
/// * `access` - The type of access being performed.
/// * `privilege` - Current privilege mode.
pub const fn check_permissions(
    pte: PageTableEntry,
    access: AccessType,
    privilege: PrivilegeMode,
) -> bool {
    if privilege.is_user() && !pte.is_user() {
        return false;
    }
    match access {
        AccessType::Fetch => pte.can_exec(),
        AccessType::Read => pte.can_read(),
        AccessType::Write => pte.can_write(),
    }
}

/// Validates one level of the walk.
const fn check_entry(
    pte: PageTableEntry,
    vaddr: VirtAddr,
    access: AccessType,
    privilege: PrivilegeMode,
) -> Option<Fault> {
    if !pte.is_valid() {
        Some(Fault::PageFault {
            vaddr,
            pte: pte.raw(),
        })
    } else if !check_permissions(pte, access, privilege) {
        Some(Fault::ProtectionFault {
            vaddr,
            pte: pte.raw(),
        })
    } else {
        None
    }
}

/// Sets the accessed bit (and the dirty bit for writes) of a second-level entry.
///
/// The updated entry is written back through the data-cache write path only when a
/// bit actually changed.
///
/// # Returns
///
/// The entry as it now stands in memory.
fn update_access_bits(
    mem: &mut MemorySystem,
    pte_addr: u32,
    pte: PageTableEntry,
    access: AccessType,
) -> Result<PageTableEntry, SimError> {
    let mut updated = pte.with_accessed();
    if access.is_write() {
        updated = updated.with_dirty();
    }
    if updated != pte {
        mem.write(pte_addr, updated.raw())?;
    }
    Ok(updated)
}

/// Performs a hardware page-table walk and refills the TLB.
///
/// # Arguments
///
/// * `mmu` - The MMU whose TLB receives the result.
/// * `vaddr` - The virtual address to translate.
/// * `access` - The type of memory access (Fetch, Read, Write).
/// * `mode` - Single-level or two-level paging.
/// * `regs` - System registers (PSR and page-directory bases).
/// * `mem` - Memory system for entry reads and access-bit write-back.
///
/// # Returns
///
/// The translation (possibly carrying a fault), or a fatal error if an entry lies
/// outside RAM.
pub fn page_table_walk(
    mmu: &mut Mmu,
    vaddr: VirtAddr,
    access: AccessType,
    mode: MmuMode,
    regs: &SystemRegisters,
    mem: &mut MemorySystem,
) -> Result<TranslationResult, SimError> {
    mmu.walks += 1;
    let privilege = regs.privilege();

    let l1_addr = (regs.directory_base() & PAGE_NUM_MASK) + vaddr.l1_index() * PTE_SIZE;
    let l1 = PageTableEntry::new(mem.read_uncached(l1_addr)?);
    if let Some(fault) = check_entry(l1, vaddr, access, privilege) {
        return Ok(TranslationResult::fault(fault));
    }

    if mode == MmuMode::SingleLevel || l1.is_large() {
        mmu.tlb.insert(vaddr, l1.raw(), true, privilege);
        return Ok(TranslationResult::success(PhysAddr(
            l1.large_frame() | vaddr.large_page_offset(),
        )));
    }

    let l2_addr = l1.frame() + vaddr.l2_index() * PTE_SIZE;
    let l2 = PageTableEntry::new(mem.read_uncached(l2_addr)?);
    if let Some(fault) = check_entry(l2, vaddr, access, privilege) {
        return Ok(TranslationResult::fault(fault));
    }

    let l2 = update_access_bits(mem, l2_addr, l2, access)?;
    mmu.tlb.insert(vaddr, l2.raw(), false, privilege);
    Ok(TranslationResult::success(PhysAddr(
        l2.frame() | vaddr.page_offset(),
    )))
}

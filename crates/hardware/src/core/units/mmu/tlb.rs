//! Translation Lookaside Buffer (TLB).
//!
//! A direct-mapped cache of page-table entries. Each slot stores the full virtual
//! address that filled it together with a copy of the resolved entry, so one slot can
//! serve either a 4 KiB page (page number must match) or a 4 MiB page (only the
//! directory index must match).
//!
//! Entries are not invalidated when the page tables in memory change; only an
//! explicit [`Tlb::flush`] (issued on page-directory base writes) clears them.

use crate::common::constants::{PAGE_INDEX_L1_MASK, PAGE_NUM_MASK};
use crate::common::{PhysAddr, VirtAddr};
use crate::core::arch::mode::PrivilegeMode;

use super::ptw::PageTableEntry;

/// A single entry in the TLB.
#[derive(Clone, Copy, Debug, Default)]
struct TlbEntry {
    /// Virtual address that filled the slot (tag).
    tag: u32,
    /// Copy of the resolved page-table entry; its valid bit is the slot's valid bit.
    pte: u32,
    /// Entry maps a 4 MiB page.
    large: bool,
    /// Entry was filled from the user page directory.
    user: bool,
}

/// A successful TLB lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TlbHit {
    /// Translated physical address.
    pub paddr: PhysAddr,
    /// Cached page-table entry, for permission checks.
    pub pte: u32,
    /// The mapping is a 4 MiB page.
    pub large: bool,
}

/// Translation Lookaside Buffer structure.
#[derive(Debug)]
pub struct Tlb {
    /// Vector of TLB entries.
    entries: Vec<TlbEntry>,
    /// Mask used for indexing (size - 1).
    mask: usize,
}

impl Tlb {
    /// Creates a new TLB with the specified size.
    ///
    /// # Arguments
    ///
    /// * `size` - Number of entries (rounded up to the next power of two, at least one).
    pub fn new(size: usize) -> Self {
        let safe_size = size.max(1).next_power_of_two();

        Self {
            entries: vec![TlbEntry::default(); safe_size],
            mask: safe_size - 1,
        }
    }

    /// Slot selected by a virtual address: page number folded with the directory index.
    #[inline(always)]
    pub fn index(&self, vaddr: VirtAddr) -> usize {
        let va = vaddr.val();
        ((va >> 12) ^ (va >> 22)) as usize & self.mask
    }

    /// Looks up a virtual address.
    ///
    /// # Arguments
    ///
    /// * `vaddr` - The virtual address to translate.
    /// * `privilege` - Selects the directory space the entry must come from.
    ///
    /// # Returns
    ///
    /// The translation on a hit; permissions are not checked here.
    #[inline]
    pub fn lookup(&self, vaddr: VirtAddr, privilege: PrivilegeMode) -> Option<TlbHit> {
        let entry = &self.entries[self.index(vaddr)];
        let pte = PageTableEntry::new(entry.pte);
        if !pte.is_valid() || entry.user != privilege.is_user() {
            return None;
        }

        let diff = entry.tag ^ vaddr.val();
        if diff & PAGE_INDEX_L1_MASK != 0 {
            return None;
        }

        if entry.large {
            Some(TlbHit {
                paddr: PhysAddr(pte.large_frame() | vaddr.large_page_offset()),
                pte: entry.pte,
                large: true,
            })
        } else if diff & PAGE_NUM_MASK == 0 {
            Some(TlbHit {
                paddr: PhysAddr(pte.frame() | vaddr.page_offset()),
                pte: entry.pte,
                large: false,
            })
        } else {
            None
        }
    }

    /// Inserts a new mapping, replacing whatever occupied the slot.
    ///
    /// # Arguments
    ///
    /// * `vaddr` - Virtual address that was translated.
    /// * `pte` - Raw page-table entry that resolved it.
    /// * `large` - The entry maps a 4 MiB page.
    /// * `privilege` - Directory space the entry came from.
    pub fn insert(&mut self, vaddr: VirtAddr, pte: u32, large: bool, privilege: PrivilegeMode) {
        let idx = self.index(vaddr);
        self.entries[idx] = TlbEntry {
            tag: vaddr.val(),
            pte,
            large,
            user: privilege.is_user(),
        };
    }

    /// Flushes all entries from the TLB.
    pub fn flush(&mut self) {
        for e in &mut self.entries {
            e.pte = 0;
        }
    }
}

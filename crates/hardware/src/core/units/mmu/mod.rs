//! Memory Management Unit (MMU).
//!
//! This module implements virtual-to-physical address translation. The PSR selects
//! one of three modes: direct (identity), single-level paging with 4 MiB pages, and
//! two-level paging with 4 KiB pages (or 4 MiB pages where the directory entry has
//! PSE set). A direct-mapped TLB caches resolved entries in front of the walker.

/// Page table walker for the one- and two-level schemes.
pub mod ptw;

/// Translation Lookaside Buffer (TLB) for caching virtual-to-physical address translations.
pub mod tlb;

use tracing::debug;

use crate::common::{AccessType, Fault, PhysAddr, SimError, TranslationResult, VirtAddr};
use crate::core::arch::psr::{MmuMode, PSR_MMUPS_4KB};
use crate::core::arch::sysreg::SystemRegisters;
use crate::core::units::cache::hierarchy::MemorySystem;

use self::ptw::{PageTableEntry, check_permissions, page_table_walk};
use self::tlb::Tlb;

/// Memory Management Unit (MMU) for virtual-to-physical address translation.
#[derive(Debug)]
pub struct Mmu {
    /// Shared instruction/data TLB.
    pub tlb: Tlb,
    /// Translations served by the TLB.
    pub tlb_hits: u64,
    /// Translations that needed a walk.
    pub tlb_misses: u64,
    /// Page-table walks performed (including dirty-bit re-walks).
    pub walks: u64,
}

impl Mmu {
    /// Creates a new MMU with the specified TLB size.
    ///
    /// # Arguments
    ///
    /// * `tlb_size` - Number of TLB entries.
    pub fn new(tlb_size: usize) -> Self {
        Self {
            tlb: Tlb::new(tlb_size),
            tlb_hits: 0,
            tlb_misses: 0,
            walks: 0,
        }
    }

    /// Drops every cached translation.
    pub fn flush(&mut self) {
        debug!("tlb flush");
        self.tlb.flush();
    }

    /// Translates a virtual address to a physical address.
    ///
    /// # Arguments
    ///
    /// * `vaddr` - Virtual address to translate.
    /// * `access` - Type of access (Fetch, Read, Write).
    /// * `regs` - System registers (PSR and page-directory bases).
    /// * `mem` - Memory system for page-table walks.
    ///
    /// # Returns
    ///
    /// A `TranslationResult` with the physical address or the fault that stopped it.
    /// Fatal configuration errors (reserved MMU mode, unsupported page size, page
    /// tables outside RAM) are returned as `Err`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mist32_core::common::{AccessType, VirtAddr};
    /// use mist32_core::config::CacheHierarchyConfig;
    /// use mist32_core::core::arch::sysreg::SystemRegisters;
    /// use mist32_core::core::units::cache::hierarchy::MemorySystem;
    /// use mist32_core::core::units::mmu::Mmu;
    ///
    /// let mut mmu = Mmu::new(64);
    /// let mut mem = MemorySystem::new(&CacheHierarchyConfig::default(), 0x0400_0000).unwrap();
    /// let regs = SystemRegisters::default();
    ///
    /// // With the MMU in direct mode, addresses pass through unchanged.
    /// let result = mmu
    ///     .translate(VirtAddr::new(0x1234), AccessType::Read, &regs, &mut mem)
    ///     .unwrap();
    /// assert_eq!(result.paddr.val(), 0x1234);
    /// ```
    pub fn translate(
        &mut self,
        vaddr: VirtAddr,
        access: AccessType,
        regs: &SystemRegisters,
        mem: &mut MemorySystem,
    ) -> Result<TranslationResult, SimError> {
        let mode = regs.psr.mmu_mode()?;
        if mode == MmuMode::Direct {
            return Ok(TranslationResult::success(PhysAddr(vaddr.val())));
        }

        let field = regs.psr.page_size_field();
        if field != PSR_MMUPS_4KB {
            return Err(SimError::UnsupportedPageSize { field });
        }

        let privilege = regs.privilege();
        if let Some(hit) = self.tlb.lookup(vaddr, privilege) {
            let pte = PageTableEntry::new(hit.pte);
            if !check_permissions(pte, access, privilege) {
                self.tlb_hits += 1;
                return Ok(TranslationResult::fault(Fault::ProtectionFault {
                    vaddr,
                    pte: hit.pte,
                }));
            }
            // A first write through a clean small page must reach memory to set D.
            if !(access.is_write() && !hit.large && !pte.is_dirty()) {
                self.tlb_hits += 1;
                return Ok(TranslationResult::success(hit.paddr));
            }
        }

        self.tlb_misses += 1;
        page_table_walk(self, vaddr, access, mode, regs, mem)
    }
}

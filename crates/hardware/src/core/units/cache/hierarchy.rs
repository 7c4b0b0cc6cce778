//! Write-through memory system.
//!
//! Ties the two L1 caches to the physical store and implements the coherence rules
//! between them:
//! 1. **Reads:** Fetches go through the instruction cache, data through the data cache.
//! 2. **Writes:** Always update the store. A cached instruction line at the address is
//!    invalidated. A data-cache hit is updated in place; a miss fills the line from
//!    the just-updated store.
//! 3. **Uncached access:** Page-table and IDT reads bypass both caches.

use super::L1Cache;
use crate::common::{AccessType, SimError};
use crate::config::CacheHierarchyConfig;
use crate::soc::PhysicalMemory;

/// RAM plus the split L1 caches in front of it.
#[derive(Debug)]
pub struct MemorySystem {
    /// L1 instruction cache.
    pub l1_i: L1Cache,
    /// L1 data cache.
    pub l1_d: L1Cache,
    /// Backing physical store.
    pub ram: PhysicalMemory,
}

impl MemorySystem {
    /// Builds the memory system.
    ///
    /// # Arguments
    ///
    /// * `config` - Geometry of both caches.
    /// * `max_addr` - RAM ceiling; also the first uncached address.
    ///
    /// # Returns
    ///
    /// The memory system, or the geometry error of the first invalid cache.
    pub fn new(config: &CacheHierarchyConfig, max_addr: u32) -> Result<Self, SimError> {
        Ok(Self {
            l1_i: L1Cache::new(&config.l1_i, max_addr)?,
            l1_d: L1Cache::new(&config.l1_d, max_addr)?,
            ram: PhysicalMemory::new(max_addr),
        })
    }

    /// Reads a word through the cache selected by `access`.
    ///
    /// # Arguments
    ///
    /// * `paddr` - Physical address of the word.
    /// * `access` - [`AccessType::Fetch`] selects the instruction cache.
    pub fn read(&mut self, paddr: u32, access: AccessType) -> Result<u32, SimError> {
        match access {
            AccessType::Fetch => self.l1_i.read(&mut self.ram, paddr),
            AccessType::Read | AccessType::Write => self.l1_d.read(&mut self.ram, paddr),
        }
    }

    /// Writes a word through the write-through path.
    ///
    /// # Arguments
    ///
    /// * `paddr` - Physical address of the word.
    /// * `val` - The word to write.
    pub fn write(&mut self, paddr: u32, val: u32) -> Result<(), SimError> {
        if !self.l1_d.covers(paddr) {
            self.l1_i.invalidate(paddr);
            return self.ram.write_word(paddr, val);
        }

        self.l1_i.invalidate(paddr);
        self.ram.write_word(paddr, val)?;

        self.l1_d.accesses += 1;
        if self.l1_d.update_word(paddr, val) {
            self.l1_d.hits += 1;
        } else {
            let _ = self.l1_d.fill(&mut self.ram, paddr)?;
        }
        Ok(())
    }

    /// Reads a word straight from the store, bypassing both caches.
    pub fn read_uncached(&mut self, paddr: u32) -> Result<u32, SimError> {
        self.ram.read_word(paddr)
    }

    /// Copies a flat image into RAM and drops any cached lines it overlaps.
    pub fn load_image(&mut self, paddr: u32, data: &[u8]) -> Result<(), SimError> {
        self.ram.load(paddr, data)?;
        self.l1_i.invalidate_range(paddr, data.len());
        self.l1_d.invalidate_range(paddr, data.len());
        Ok(())
    }
}

//! Memory Access Path.
//!
//! This module provides the interface between the executor and the memory subsystem.
//! It performs the following:
//! 1. **Address Translation:** Runs the MMU and records any fault in the fault-info
//!    registers and the pending-fault slot instead of returning an error.
//! 2. **Physical Routing:** Sends addresses at or above IOSR to the I/O bus, rejects
//!    addresses between the RAM ceiling and IOSR, and sends the rest through the caches.
//! 3. **Sub-word Access:** Byte and half-word loads extract a lane of the containing
//!    word; stores merge into it with a read-modify-write.
//! 4. **Deferred I/O Stores:** Device writes are validated immediately but only staged;
//!    the simulator flushes them at writeback once the cycle is known not to fault.

use tracing::{debug, warn};

use super::Cpu;
use crate::common::{AccessType, AccessWidth, PhysAddr, SimError, VirtAddr};

impl Cpu {
    /// Translates a virtual address, recording a fault if one occurs.
    ///
    /// # Arguments
    ///
    /// * `vaddr` - The virtual address to translate.
    /// * `access` - The type of memory access (Fetch/Read/Write).
    ///
    /// # Returns
    ///
    /// `Some(paddr)` on success, `None` if the translation faulted (the fault is now
    /// pending), or a fatal error.
    pub fn translate(
        &mut self,
        vaddr: VirtAddr,
        access: AccessType,
    ) -> Result<Option<PhysAddr>, SimError> {
        let result = self
            .mmu
            .translate(vaddr, access, &self.sys, &mut self.memory)?;

        let Some(fault) = result.fault else {
            return Ok(Some(result.paddr));
        };

        if !self.sys.psr.interrupts_enabled() {
            warn!(%fault, pc = self.sys.pc, "fault while interrupts are masked");
        }
        debug!(%fault, pc = self.sys.pc, ?access, "translation fault");

        self.sys.fi0r = fault.vaddr().val();
        self.sys.fi1r = fault.pte();
        self.pending_fault = Some(fault);
        self.stats.faults += 1;
        Ok(None)
    }

    /// Reads the word containing `paddr`.
    ///
    /// # Arguments
    ///
    /// * `paddr` - Physical address.
    /// * `access` - Selects the instruction or data cache.
    fn read_physical(&mut self, paddr: u32, access: AccessType) -> Result<u32, SimError> {
        if paddr >= self.sys.iosr {
            self.io.load(self.sys.iosr, paddr)
        } else if paddr >= self.max_addr {
            Err(SimError::OutOfMemory { addr: paddr })
        } else {
            self.memory.read(paddr & !3, access)
        }
    }

    /// Fetches the instruction word at the current PC.
    ///
    /// # Returns
    ///
    /// The encoding, or `None` if the fetch faulted.
    pub fn fetch(&mut self) -> Result<Option<u32>, SimError> {
        let Some(paddr) = self.translate(VirtAddr::new(self.sys.pc), AccessType::Fetch)? else {
            return Ok(None);
        };
        self.read_physical(paddr.val(), AccessType::Fetch).map(Some)
    }

    /// Loads a zero-extended value.
    ///
    /// # Arguments
    ///
    /// * `vaddr` - Virtual byte address.
    /// * `width` - Access width.
    ///
    /// # Returns
    ///
    /// The value, or `None` if translation faulted.
    pub fn load(&mut self, vaddr: u32, width: AccessWidth) -> Result<Option<u32>, SimError> {
        let Some(paddr) = self.translate(VirtAddr::new(vaddr), AccessType::Read)? else {
            return Ok(None);
        };
        let paddr = paddr.val();
        let word = self.read_physical(paddr, AccessType::Read)?;
        Ok(Some(width.extract(word, paddr)))
    }

    /// Stores a value.
    ///
    /// RAM stores take effect immediately. Device stores are routed and checked now but
    /// staged in `io_writeback` until the end of the cycle.
    ///
    /// # Arguments
    ///
    /// * `vaddr` - Virtual byte address.
    /// * `width` - Access width.
    /// * `value` - Value to store; only the low lane bits are used for sub-word stores.
    ///
    /// # Returns
    ///
    /// `true` if the store was performed or staged, `false` if translation faulted.
    pub fn store(&mut self, vaddr: u32, width: AccessWidth, value: u32) -> Result<bool, SimError> {
        let Some(paddr) = self.translate(VirtAddr::new(vaddr), AccessType::Write)? else {
            return Ok(false);
        };
        let paddr = paddr.val();

        if paddr >= self.sys.iosr {
            let _ = self.io.route(self.sys.iosr, paddr)?;
            self.io_writeback = Some((paddr, width.merge(0, paddr, value)));
            return Ok(true);
        }
        if paddr >= self.max_addr {
            return Err(SimError::OutOfMemory { addr: paddr });
        }

        let aligned = paddr & !3;
        let word = match width {
            AccessWidth::Word => value,
            AccessWidth::Byte | AccessWidth::Half => {
                let old = self.memory.read_uncached(aligned)?;
                width.merge(old, paddr, value)
            }
        };
        self.memory.write(aligned, word)?;
        Ok(true)
    }

    /// Delivers the staged device store, if any.
    pub fn flush_io_writeback(&mut self) -> Result<(), SimError> {
        if let Some((paddr, value)) = self.io_writeback.take() {
            self.io.store(self.sys.iosr, paddr, value)?;
        }
        Ok(())
    }
}

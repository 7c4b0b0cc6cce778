//! Interrupt Dispatch.
//!
//! This module implements interrupt delivery for the CPU. It performs the following:
//! 1. **IDT Access:** Reads descriptor entries (flags word, handler word) straight
//!    from physical memory at `IDTR + 8 * vector`.
//! 2. **Fault Routing:** Turns a pending fault into a non-maskable interrupt that
//!    resumes at the faulting instruction and discards any staged device store.
//! 3. **Arbitration:** A pending NMI always wins; otherwise, with interrupts enabled,
//!    the first device (in registration order) whose IDT entry is enabled and which
//!    asserts its interrupt is taken.
//! 4. **Entry:** Saves PC, PSR, and flags, then enters kernel mode with interrupts
//!    masked at the handler address.

use tracing::{debug, trace};

use super::Cpu;
use crate::common::constants::IDT_ENTRY_SIZE;
use crate::common::{Fault, SimError};

/// Enable bit of an IDT entry's flags word.
const IDT_FLAG_ENABLED: u32 = 1;

/// One decoded interrupt-descriptor-table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdtEntry {
    /// The vector may be raised by devices.
    pub enabled: bool,
    /// Handler address.
    pub handler: u32,
}

impl Cpu {
    /// Reads the IDT entry of `vector`.
    ///
    /// # Returns
    ///
    /// The entry, or [`SimError::OutOfMemory`] if the table lies outside RAM.
    pub fn idt_entry(&mut self, vector: u32) -> Result<IdtEntry, SimError> {
        let base = self
            .sys
            .idtr
            .wrapping_add(vector.wrapping_mul(IDT_ENTRY_SIZE));
        let flags = self.memory.read_uncached(base)?;
        let handler = self.memory.read_uncached(base.wrapping_add(4))?;
        Ok(IdtEntry {
            enabled: flags & IDT_FLAG_ENABLED != 0,
            handler,
        })
    }

    /// Converts a fault raised this cycle into a pending NMI.
    ///
    /// The next PC is pinned to the faulting instruction and any staged device store is
    /// dropped so a faulting cycle never reaches a device.
    ///
    /// # Arguments
    ///
    /// * `fault` - The fault taken from the pending slot.
    pub fn raise_fault(&mut self, fault: Fault) {
        let vector = self.fault_vector(&fault);
        debug!(%fault, vector, pc = self.sys.pc, "delivering fault");
        self.pending_nmi = Some(vector);
        self.sys.next_pc = Some(self.sys.pc);
        self.io_writeback = None;
    }

    /// Enters the handler of an interrupt.
    ///
    /// Must be called after the PC has been advanced: the saved PC is the resume address.
    pub fn interrupt_entry(&mut self, vector: u32, handler: u32) {
        debug!(
            vector,
            handler = format_args!("{handler:#010x}"),
            resume = format_args!("{:#010x}", self.sys.pc),
            "interrupt entry"
        );
        self.sys.ppcr = self.sys.pc;
        self.sys.ppsr = self.sys.psr;
        self.sys.pflags = self.flags;
        self.sys.psr = self.sys.psr.for_interrupt_entry();
        self.sys.pc = handler;
        self.stats.interrupts += 1;
    }

    /// Delivers at most one interrupt.
    ///
    /// # Returns
    ///
    /// The vector taken, if any.
    pub fn dispatch_interrupts(&mut self) -> Result<Option<u32>, SimError> {
        if let Some(vector) = self.pending_nmi.take() {
            let entry = self.idt_entry(vector)?;
            self.interrupt_entry(vector, entry.handler);
            return Ok(Some(vector));
        }

        if !self.sys.psr.interrupts_enabled() {
            return Ok(None);
        }

        for idx in 0..self.io.len() {
            let Some(vector) = self.io.devices_mut()[idx].interrupt_vector() else {
                continue;
            };
            let entry = self.idt_entry(vector)?;
            if !entry.enabled {
                trace!(vector, "device vector disabled in IDT");
                continue;
            }
            if self.io.devices_mut()[idx].interrupt_pending() {
                self.interrupt_entry(vector, entry.handler);
                return Ok(Some(vector));
            }
        }
        Ok(None)
    }
}

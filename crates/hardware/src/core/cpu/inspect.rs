//! Diagnostic views of the CPU.
//!
//! These back the step-mode and fatal-error dumps. It provides:
//! 1. **State dump:** Flags, general registers, then PC, SP and PSR.
//! 2. **Stack dump:** The words just above SP, read through the current translation
//!    without raising faults or touching the caches.

use std::fmt;

use super::Cpu;
use crate::common::{AccessType, VirtAddr};

/// Number of words the diagnostic dumps show above SP.
pub const STACK_DUMP_WORDS: usize = 10;

/// Borrowed register state, formatted for the diagnostic dump.
#[derive(Debug)]
pub struct StateDump<'a>(&'a Cpu);

impl fmt::Display for StateDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cpu = self.0;
        writeln!(f, "{}", cpu.flags)?;
        write!(f, "{}", cpu.regs)?;
        writeln!(
            f,
            "PC: {:#010x} SP: {:#010x} {}",
            cpu.sys.pc, cpu.sys.sp, cpu.sys.psr
        )
    }
}

/// One stack slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackWord {
    /// Virtual address of the slot.
    pub addr: u32,
    /// The word, or `None` if the address does not translate to RAM.
    pub value: Option<u32>,
}

/// Words read upward from SP, lowest address first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StackDump {
    /// The slots that were read.
    pub words: Vec<StackWord>,
}

impl fmt::Display for StackDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "---- Stack ----")?;
        for word in &self.words {
            match word.value {
                Some(val) => write!(
                    f,
                    "\n{:#010x}: {val:#010x} ({:11})",
                    word.addr, val as i32
                )?,
                None => write!(f, "\n{:#010x}: <unmapped>", word.addr)?,
            }
        }
        Ok(())
    }
}

impl Cpu {
    /// Formats the full register state: flags, general registers, then PC/SP/PSR.
    pub const fn dump_state(&self) -> StateDump<'_> {
        StateDump(self)
    }

    /// Reads up to `words` words upward from SP.
    ///
    /// Translation uses the current mode and privilege, so the TLB and its counters
    /// may change, but a fault is never recorded and device registers are never read.
    /// The dump stops early if the address space wraps.
    pub fn dump_stack(&mut self, words: usize) -> StackDump {
        let sp = self.sys.sp;
        let words = (0..words)
            .map_while(|i| sp.checked_add(u32::try_from(i * 4).ok()?))
            .map(|addr| StackWord {
                addr,
                value: self.peek_word(addr),
            })
            .collect();
        StackDump { words }
    }

    /// Reads a RAM word at a virtual address with no architectural side effects.
    fn peek_word(&mut self, vaddr: u32) -> Option<u32> {
        let result = self
            .mmu
            .translate(VirtAddr::new(vaddr), AccessType::Read, &self.sys, &mut self.memory)
            .ok()?;
        if result.is_fault() {
            return None;
        }
        let paddr = result.paddr.val();
        if paddr >= self.max_addr || paddr >= self.sys.iosr {
            return None;
        }
        self.memory.read_uncached(paddr).ok()
    }
}

//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, which serves as the container for the
//! entire architectural state. It coordinates the following:
//! 1. **State Management:** General registers, flags, and the system register block.
//! 2. **Memory Hierarchy:** The MMU with its TLB, the split L1 caches, and RAM.
//! 3. **System Integration:** The I/O bus and its devices.
//! 4. **Exception State:** The pending fault, pending NMI, and the staged I/O store that
//!    link execution to the interrupt dispatcher.

/// Instruction execution and opcode dispatch.
pub mod execute;

/// Register and stack dumps for diagnostics.
pub mod inspect;

/// Memory access path: translation, cache, RAM, and MMIO routing.
pub mod memory;

/// Interrupt descriptor table access and interrupt dispatch.
pub mod trap;

use crate::common::{Fault, RegisterFile, SimError};
use crate::config::Config;
use crate::core::arch::flags::Flags;
use crate::core::arch::sysreg::SystemRegisters;
use crate::core::units::cache::hierarchy::MemorySystem;
use crate::core::units::mmu::Mmu;
use crate::soc::{Device, IoBus};
use crate::stats::SimStats;

/// Main CPU structure containing all processor state and components.
#[derive(Debug)]
pub struct Cpu {
    /// General-purpose registers.
    pub regs: RegisterFile,
    /// Condition flags.
    pub flags: Flags,
    /// PC, stacks, PSR, table bases, and saved interrupt context.
    pub sys: SystemRegisters,

    /// Memory Management Unit.
    pub mmu: Mmu,
    /// L1 caches in front of RAM.
    pub memory: MemorySystem,
    /// Memory-mapped devices.
    pub io: IoBus,

    /// Fault raised by the current instruction, consumed at writeback.
    pub pending_fault: Option<Fault>,
    /// Non-maskable interrupt vector to deliver at the next dispatch point.
    pub pending_nmi: Option<u32>,
    /// I/O store `(physical address, value)` deferred until writeback.
    pub io_writeback: Option<(u32, u32)>,
    /// Set by `halt`.
    pub halted: bool,

    /// IDT vector of page faults.
    pub page_fault_vector: u32,
    /// IDT vector of protection faults.
    pub protection_fault_vector: u32,
    /// RAM ceiling; physical addresses at or above it (and below IOSR) are fatal.
    pub max_addr: u32,
    /// Log each executed instruction at TRACE level.
    pub trace: bool,

    /// Performance statistics.
    pub stats: SimStats,
}

impl Cpu {
    /// Creates a CPU in its reset state.
    ///
    /// # Arguments
    ///
    /// * `config` - The simulator configuration parameters.
    ///
    /// # Returns
    ///
    /// A CPU in kernel mode with the MMU in direct mode, interrupts masked, PC at the
    /// configured entry point, and no devices attached; or the error of an invalid
    /// cache geometry.
    pub fn new(config: &Config) -> Result<Self, SimError> {
        Ok(Self {
            regs: RegisterFile::new(),
            flags: Flags::default(),
            sys: SystemRegisters::new(
                config.general.entry_pc,
                config.memory.kernel_stack,
                config.memory.iosr,
            ),
            mmu: Mmu::new(config.memory.tlb_entries),
            memory: MemorySystem::new(&config.cache, config.memory.max_addr)?,
            io: IoBus::new(),
            pending_fault: None,
            pending_nmi: None,
            io_writeback: None,
            halted: false,
            page_fault_vector: config.interrupt.page_fault_vector,
            protection_fault_vector: config.interrupt.protection_fault_vector,
            max_addr: config.memory.max_addr,
            trace: config.general.trace,
            stats: SimStats::default(),
        })
    }

    /// Attaches a memory-mapped device. Registration order is interrupt priority.
    pub fn attach_device(&mut self, dev: Box<dyn Device>) {
        self.io.add_device(dev);
    }

    /// IDT vector a fault is delivered through.
    pub const fn fault_vector(&self, fault: &Fault) -> u32 {
        match fault {
            Fault::PageFault { .. } => self.page_fault_vector,
            Fault::ProtectionFault { .. } => self.protection_fault_vector,
        }
    }

    /// Returns a statistics snapshot including the cache and TLB counters.
    pub fn stats(&self) -> SimStats {
        let mut stats = self.stats.clone();
        stats.icache_accesses = self.memory.l1_i.accesses;
        stats.icache_hits = self.memory.l1_i.hits;
        stats.dcache_accesses = self.memory.l1_d.accesses;
        stats.dcache_hits = self.memory.l1_d.hits;
        stats.tlb_hits = self.mmu.tlb_hits;
        stats.tlb_misses = self.mmu.tlb_misses;
        stats.page_walks = self.mmu.walks;
        stats
    }
}

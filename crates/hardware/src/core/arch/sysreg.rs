//! System and Control Registers.
//!
//! This module bundles the non-general-purpose architectural state:
//! 1. **Control flow:** Program counter and the staged next-PC of a taken branch.
//! 2. **Stacks:** The active stack pointer and the per-mode kernel/user slots it is swapped with.
//! 3. **Translation and interrupts:** Page-directory bases, IDT base, I/O base, fault info.
//! 4. **Interrupt context:** The previous PC, PSR, and flags saved on interrupt entry.

use super::flags::Flags;
use super::mode::PrivilegeMode;
use super::psr::Psr;

/// System register block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SystemRegisters {
    /// Program counter (PCR).
    pub pc: u32,
    /// Branch target staged by the current instruction; `None` falls through to PC + 4.
    pub next_pc: Option<u32>,
    /// Active stack pointer (SPR).
    pub sp: u32,
    /// Saved kernel stack pointer (KSPR).
    pub ksp: u32,
    /// Saved user stack pointer (USPR).
    pub usp: u32,
    /// Processor status register.
    pub psr: Psr,
    /// User page-directory base (PDTR).
    pub pdtr: u32,
    /// Kernel page-directory base (KPDTR).
    pub kpdtr: u32,
    /// Interrupt-descriptor-table base (IDTR).
    pub idtr: u32,
    /// Base of the memory-mapped I/O window (IOSR).
    pub iosr: u32,
    /// Fault info 0: the faulting virtual address.
    pub fi0r: u32,
    /// Fault info 1: the page-table entry involved in the fault.
    pub fi1r: u32,
    /// PC saved on interrupt entry (PPCR).
    pub ppcr: u32,
    /// PSR saved on interrupt entry (PPSR).
    pub ppsr: Psr,
    /// Flags saved on interrupt entry (PFLAGR).
    pub pflags: Flags,
}

impl SystemRegisters {
    /// Creates the reset state.
    ///
    /// # Arguments
    ///
    /// * `entry` - Initial program counter.
    /// * `kernel_stack` - Initial kernel stack pointer.
    /// * `iosr` - Initial I/O base.
    pub fn new(entry: u32, kernel_stack: u32, iosr: u32) -> Self {
        Self {
            pc: entry,
            sp: kernel_stack,
            ksp: kernel_stack,
            iosr,
            ..Self::default()
        }
    }

    /// Current privilege mode.
    #[inline(always)]
    pub const fn privilege(&self) -> PrivilegeMode {
        self.psr.privilege()
    }

    /// Page-directory base used by the current privilege mode.
    #[inline(always)]
    pub const fn directory_base(&self) -> u32 {
        match self.privilege() {
            PrivilegeMode::Kernel => self.kpdtr,
            PrivilegeMode::User => self.pdtr,
        }
    }

    /// Loads the active stack pointer from the slot of `mode`.
    ///
    /// Called on the first cycle after a privilege transition.
    pub const fn select_stack(&mut self, mode: PrivilegeMode) {
        self.sp = match mode {
            PrivilegeMode::Kernel => self.ksp,
            PrivilegeMode::User => self.usp,
        };
    }

    /// Stores the active stack pointer back into the slot of `mode`.
    pub const fn commit_stack(&mut self, mode: PrivilegeMode) {
        match mode {
            PrivilegeMode::Kernel => self.ksp = self.sp,
            PrivilegeMode::User => self.usp = self.sp,
        }
    }
}

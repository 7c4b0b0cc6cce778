//! Processor Status Register.
//!
//! The PSR packs the MMU mode, the global interrupt enable, the current privilege
//! mode, and the MMU page size into one word:
//!
//! | Bits  | Field  | Meaning                                   |
//! |-------|--------|-------------------------------------------|
//! | 1..0  | MMUMOD | 0 direct, 1 single-level, 2 two-level     |
//! | 2     | IM     | maskable interrupts enabled               |
//! | 6..5  | CMOD   | 0 kernel, non-zero user                   |
//! | 9..7  | MMUPS  | page size; 1 selects 4 KiB                |

use std::fmt;

use super::mode::PrivilegeMode;
use crate::common::SimError;

/// Mask of the MMU mode field.
pub const PSR_MMUMOD_MASK: u32 = 0x3;
/// MMU disabled; virtual equals physical.
pub const PSR_MMUMOD_DIRECT: u32 = 0x0;
/// One-level paging with 4 MiB pages.
pub const PSR_MMUMOD_L1PAGE: u32 = 0x1;
/// Two-level paging.
pub const PSR_MMUMOD_L2PAGE: u32 = 0x2;
/// Global maskable-interrupt enable.
pub const PSR_IM_ENABLE: u32 = 0x4;
/// Mask of the privilege field.
pub const PSR_CMOD_MASK: u32 = 0x60;
/// Shift of the privilege field.
pub const PSR_CMOD_SHIFT: u32 = 5;
/// Privilege field value for user mode.
pub const PSR_CMOD_USER: u32 = 0x60;
/// Mask of the page-size field.
pub const PSR_MMUPS_MASK: u32 = 0x380;
/// Shift of the page-size field.
pub const PSR_MMUPS_SHIFT: u32 = 7;
/// Page-size field value selecting 4 KiB pages.
pub const PSR_MMUPS_4KB: u32 = 1;

/// Address translation mode selected by the PSR.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MmuMode {
    /// No translation.
    Direct,
    /// Page directory only; every entry maps a 4 MiB page.
    SingleLevel,
    /// Page directory plus page tables.
    TwoLevel,
}

/// The processor status register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Psr(pub u32);

impl Psr {
    /// Returns the raw register value.
    #[inline(always)]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Decodes the MMU mode.
    ///
    /// # Returns
    ///
    /// The mode, or [`SimError::UnsupportedMmuMode`] for the reserved encoding.
    pub const fn mmu_mode(self) -> Result<MmuMode, SimError> {
        match self.0 & PSR_MMUMOD_MASK {
            PSR_MMUMOD_DIRECT => Ok(MmuMode::Direct),
            PSR_MMUMOD_L1PAGE => Ok(MmuMode::SingleLevel),
            PSR_MMUMOD_L2PAGE => Ok(MmuMode::TwoLevel),
            mode => Err(SimError::UnsupportedMmuMode { mode }),
        }
    }

    /// Returns the raw page-size field.
    #[inline(always)]
    pub const fn page_size_field(self) -> u32 {
        (self.0 & PSR_MMUPS_MASK) >> PSR_MMUPS_SHIFT
    }

    /// Returns `true` when maskable interrupts are enabled.
    #[inline(always)]
    pub const fn interrupts_enabled(self) -> bool {
        self.0 & PSR_IM_ENABLE != 0
    }

    /// Decodes the current privilege mode.
    #[inline(always)]
    pub const fn privilege(self) -> PrivilegeMode {
        PrivilegeMode::from_u8(((self.0 & PSR_CMOD_MASK) >> PSR_CMOD_SHIFT) as u8)
    }

    /// Returns a copy with the privilege field replaced.
    pub const fn with_privilege(self, mode: PrivilegeMode) -> Self {
        let cmod = match mode {
            PrivilegeMode::Kernel => 0,
            PrivilegeMode::User => PSR_CMOD_USER,
        };
        Self((self.0 & !PSR_CMOD_MASK) | cmod)
    }

    /// Returns a copy with the interrupt enable set or cleared.
    pub const fn with_interrupts(self, enabled: bool) -> Self {
        if enabled {
            Self(self.0 | PSR_IM_ENABLE)
        } else {
            Self(self.0 & !PSR_IM_ENABLE)
        }
    }

    /// The status word installed on interrupt entry: kernel mode, interrupts masked,
    /// MMU mode and page size preserved.
    pub const fn for_interrupt_entry(self) -> Self {
        self.with_privilege(PrivilegeMode::Kernel)
            .with_interrupts(false)
    }
}

impl fmt::Display for Psr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PSR: {:#010x} (mode={}, mmu={}, im={})",
            self.0,
            self.privilege(),
            self.0 & PSR_MMUMOD_MASK,
            u8::from(self.interrupts_enabled())
        )
    }
}

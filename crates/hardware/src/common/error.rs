//! Fault, Translation Result, and Fatal Error definitions.
//!
//! This module defines the two error channels of the simulator. It provides:
//! 1. **Target-visible faults:** Page and protection faults that are vectored to the
//!    emulated program through the interrupt-descriptor table.
//! 2. **Translation Results:** The outcome of a virtual-to-physical translation, carrying
//!    a fault out-of-band instead of unwinding.
//! 3. **Fatal errors:** Host-level conditions that abort the run with a register dump.

use std::fmt;

use thiserror::Error;

use super::addr::{PhysAddr, VirtAddr};

/// A synchronous fault raised by the translation layer.
///
/// Faults are delivered to the emulated program; they never abort the simulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    /// No valid page-table entry maps the address.
    ///
    /// `pte` is the invalid entry that terminated the walk.
    PageFault {
        /// The faulting virtual address.
        vaddr: VirtAddr,
        /// The raw page-table entry that was found invalid.
        pte: u32,
    },

    /// A valid entry exists but denies the requested access.
    ProtectionFault {
        /// The faulting virtual address.
        vaddr: VirtAddr,
        /// The raw page-table entry whose permissions were insufficient.
        pte: u32,
    },
}

impl Fault {
    /// Returns the faulting virtual address.
    pub const fn vaddr(&self) -> VirtAddr {
        match self {
            Self::PageFault { vaddr, .. } | Self::ProtectionFault { vaddr, .. } => *vaddr,
        }
    }

    /// Returns the raw page-table entry involved in the fault.
    pub const fn pte(&self) -> u32 {
        match self {
            Self::PageFault { pte, .. } | Self::ProtectionFault { pte, .. } => *pte,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PageFault { vaddr, pte } => {
                write!(f, "PageFault({:#010x}, pte={:#010x})", vaddr.val(), pte)
            }
            Self::ProtectionFault { vaddr, pte } => {
                write!(f, "ProtectionFault({:#010x}, pte={:#010x})", vaddr.val(), pte)
            }
        }
    }
}

/// Result of a virtual-to-physical address translation operation.
///
/// A faulting translation returns a sentinel physical address of zero; the caller must
/// check [`fault`](Self::fault) before using [`paddr`](Self::paddr).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TranslationResult {
    /// The translated physical address, or zero if translation failed.
    pub paddr: PhysAddr,
    /// Fault that occurred during translation, if any.
    pub fault: Option<Fault>,
}

impl TranslationResult {
    /// Creates a successful translation result.
    ///
    /// # Arguments
    ///
    /// * `paddr` - The successfully translated physical address.
    #[inline]
    pub const fn success(paddr: PhysAddr) -> Self {
        Self { paddr, fault: None }
    }

    /// Creates a translation result indicating a fault occurred.
    ///
    /// # Arguments
    ///
    /// * `fault` - The fault raised during translation.
    #[inline]
    pub const fn fault(fault: Fault) -> Self {
        Self {
            paddr: PhysAddr(0),
            fault: Some(fault),
        }
    }

    /// Returns `true` if the translation faulted.
    #[inline]
    pub const fn is_fault(&self) -> bool {
        self.fault.is_some()
    }
}

/// Fatal, host-level simulator errors.
///
/// These indicate a malformed program or configuration. The run is aborted with a
/// diagnostic dump and never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// The opcode field does not name an implemented instruction.
    #[error("unknown opcode {opcode} in instruction {word:#010x}")]
    UnknownOpcode {
        /// The 10-bit opcode value.
        opcode: u32,
        /// The full instruction encoding.
        word: u32,
    },

    /// The format-extension bit is set; no extended formats are implemented.
    #[error("extended instruction format is not supported: {word:#010x}")]
    ExtendedFormat {
        /// The full instruction encoding.
        word: u32,
    },

    /// A branch staged a target that is not word aligned.
    #[error("invalid branch address {target:#010x}")]
    MisalignedBranch {
        /// The staged branch target.
        target: u32,
    },

    /// A memory-mapped I/O access was not aligned to a word boundary.
    #[error("misaligned I/O access at {addr:#010x}")]
    MisalignedIo {
        /// The physical address of the access.
        addr: u32,
    },

    /// A memory-mapped I/O access hit no registered device.
    #[error("no I/O device at {addr:#010x}")]
    UnmappedIo {
        /// The physical address of the access.
        addr: u32,
    },

    /// A physical access landed between the RAM ceiling and the I/O base.
    #[error("no memory at {addr:#010x}")]
    OutOfMemory {
        /// The physical address of the access.
        addr: u32,
    },

    /// Paging was enabled with a page size other than 4 KiB.
    #[error("MMU page size ({field}) not supported")]
    UnsupportedPageSize {
        /// The raw page-size field of the PSR.
        field: u32,
    },

    /// The PSR selects an MMU mode that does not exist.
    #[error("MMU mode ({mode}) not supported")]
    UnsupportedMmuMode {
        /// The raw MMU-mode field of the PSR.
        mode: u32,
    },

    /// A loader image does not fit below the RAM ceiling.
    #[error("image of {len} bytes at {addr:#010x} does not fit in memory")]
    ImageTooLarge {
        /// Load address of the image.
        addr: u32,
        /// Length of the image in bytes.
        len: usize,
    },

    /// A cache line length is not a power of two up to [`MAX_LINE_WORDS`] words, or
    /// the cache ceiling does not fall on a line boundary.
    ///
    /// [`MAX_LINE_WORDS`]: crate::core::units::cache::MAX_LINE_WORDS
    #[error("invalid cache geometry: {line_words}-word lines below ceiling {ceiling:#010x}")]
    InvalidCacheGeometry {
        /// Configured words per line.
        line_words: usize,
        /// First uncached physical address.
        ceiling: u32,
    },
}

impl SimError {
    /// Returns the physical address a memory-related error refers to, if any.
    pub const fn address(&self) -> Option<u32> {
        match self {
            Self::MisalignedIo { addr }
            | Self::UnmappedIo { addr }
            | Self::OutOfMemory { addr }
            | Self::ImageTooLarge { addr, .. } => Some(*addr),
            Self::MisalignedBranch { target } => Some(*target),
            _ => None,
        }
    }
}

//! Common types shared by every simulator component.
//!
//! This module provides the building blocks used across the core. It includes:
//! 1. **Address Types:** Strong types for virtual and physical addresses.
//! 2. **Constants:** Architectural constants for memory, paging, and the cycle loop.
//! 3. **Memory Access:** Classification of accesses (Fetch/Read/Write) and access widths.
//! 4. **Error Handling:** Target-visible faults, translation results, and fatal host errors.
//! 5. **Register Management:** The 32-slot general-purpose register file.

/// Address type definitions (physical and virtual addresses).
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Fault, translation result, and fatal error definitions.
pub mod error;

/// General-purpose register file.
pub mod reg;

pub use addr::{PhysAddr, VirtAddr};
pub use constants::{MEMORY_MAX_ADDR, STORE_PAGE_SIZE};
pub use data::{AccessType, AccessWidth};
pub use error::{Fault, SimError, TranslationResult};
pub use reg::RegisterFile;

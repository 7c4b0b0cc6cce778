//! Architectural state definitions.
//!
//! This module contains the programmer-visible state of the target outside memory:
//! 1. **Flags:** The condition flag register and condition-code evaluation.
//! 2. **Mode:** Kernel and user privilege levels.
//! 3. **PSR:** The processor status register and its fields.
//! 4. **System registers:** PC, stacks, table bases, and saved interrupt context.

/// Condition flags and condition codes.
pub mod flags;

/// Privilege modes.
pub mod mode;

/// Processor status register.
pub mod psr;

/// System and control registers.
pub mod sysreg;

pub use flags::{Condition, Flags};
pub use mode::PrivilegeMode;
pub use psr::{MmuMode, Psr};
pub use sysreg::SystemRegisters;

//! Core processor implementation.
//!
//! This module contains the CPU: its architectural state, the functional units it
//! drives, and the execution and interrupt logic that ties them together.

/// Architecture-specific components (flags, PSR, privilege modes, system registers).
pub mod arch;

/// CPU core implementation: memory access path, execution, interrupt dispatch.
pub mod cpu;

/// Execution units (ALU, cache, MMU).
pub mod units;

pub use self::cpu::Cpu;

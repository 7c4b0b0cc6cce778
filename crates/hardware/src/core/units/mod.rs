//! Execution units and functional components.
//!
//! This module contains the processor's functional units: the integer ALU, the L1
//! cache pair with its replacement policy, and the memory management unit.

/// Arithmetic Logic Unit for integer operations.
pub mod alu;

/// L1 instruction/data caches and the write-through memory system.
pub mod cache;

/// Memory Management Unit with TLB and page table walker.
pub mod mmu;

//! MIST32 instruction-set simulator library.
//!
//! This crate implements a functional simulator of the MIST32 32-bit load/store
//! architecture with the following:
//! 1. **Core:** Register file, flags, system registers, and a fetch-decode-execute loop.
//! 2. **Memory:** Two-level paged MMU with a direct-mapped TLB, split L1 caches with a
//!    miss-counter LRU policy, and a lazily allocated physical store.
//! 3. **ISA:** Opcode table, format-driven decoding, and disassembly.
//! 4. **Interrupts:** Fault delivery, software interrupts, and device interrupts through
//!    the interrupt-descriptor table.
//! 5. **Simulation:** Loader contract, configuration, stepping hooks, and statistics.
//!
//! # Example
//!
//! ```
//! use mist32_core::sim::{ExitReason, Simulator, loader};
//! use mist32_core::Config;
//!
//! let mut sim = Simulator::new(&Config::default()).unwrap();
//! // lil r1, #7 ; halt
//! let program = [(118u32 << 21) | (1 << 5) | 7, 257 << 21];
//! let bytes: Vec<u8> = program.iter().flat_map(|w| w.to_le_bytes()).collect();
//! loader::load_image(&mut sim.cpu, &bytes, 0).unwrap();
//! loader::set_entry(&mut sim.cpu, 0);
//!
//! assert_eq!(sim.run().unwrap(), ExitReason::Halted);
//! assert_eq!(sim.cpu.regs.read(1), 7);
//! ```

/// Common types and constants (addresses, registers, faults, access types).
pub mod common;
/// Simulator configuration (defaults and hierarchical config structures).
pub mod config;
/// CPU core (architectural state, execution, memory path, interrupts, units).
pub mod core;
/// Instruction set (opcodes, instruction fields, decode, disassembly).
pub mod isa;
/// Simulation loop, loader, and debug hooks.
pub mod sim;
/// System-on-chip (physical store, I/O bus, device trait).
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Main CPU type; holds registers, caches, MMU, devices, and stats.
pub use crate::core::Cpu;
/// Cycle loop driver owning a [`Cpu`].
pub use crate::sim::Simulator;

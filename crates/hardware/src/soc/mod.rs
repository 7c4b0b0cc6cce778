//! System-on-Chip (SoC) Components.
//!
//! This module organizes what sits behind the core's memory path: the lazily allocated
//! physical RAM, the I/O interconnect, and the device contract it routes to.

/// I/O interconnect and routing.
pub mod interconnect;

/// Physical RAM store.
pub mod memory;

/// Device trait definitions for MMIO access.
pub mod traits;

pub use interconnect::IoBus;
pub use memory::PhysicalMemory;
pub use traits::Device;

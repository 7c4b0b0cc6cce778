//! Device trait for memory-mapped I/O.
//!
//! This module defines the `Device` trait implemented by every model attached to the
//! I/O window. It provides:
//! 1. **Identification:** `name` and `address_range` for bus routing.
//! 2. **Access:** Word load and store at window-relative offsets.
//! 3. **Lifecycle:** Optional periodic `poll` and interrupt reporting.
//!
//! Device models themselves live outside the core; the core only knows this contract.

/// A device mapped into the I/O window that starts at IOSR.
///
/// All accesses are word sized and word aligned; sub-word accesses are widened by the
/// core before they reach the device.
pub trait Device: Send {
    /// Returns a short name for this device (e.g., `"UTIM64"`, `"SCI"`).
    fn name(&self) -> &'static str;

    /// Returns `(offset, size_in_bytes)` of the device's region relative to IOSR.
    fn address_range(&self) -> (u32, u32);

    /// Reads the register at `offset` (relative to the device's own base).
    fn load(&mut self, offset: u32) -> u32;

    /// Writes the register at `offset` (relative to the device's own base).
    fn store(&mut self, offset: u32, val: u32);

    /// Called at the periodic poll point of the cycle loop.
    fn poll(&mut self) {}

    /// IDT vector this device raises, if it raises interrupts at all.
    fn interrupt_vector(&self) -> Option<u32> {
        None
    }

    /// Returns `true` and clears the request if the device is asserting its interrupt.
    ///
    /// Only called when the vector's IDT entry is enabled and interrupts are unmasked,
    /// so a request that cannot be delivered stays pending.
    fn interrupt_pending(&mut self) -> bool {
        false
    }
}

//! I/O interconnect for memory-mapped devices.
//!
//! This module implements the bus that routes physical accesses in the I/O window to
//! devices. It provides:
//! 1. **Device registration:** Devices are kept in registration order, which is also
//!    their interrupt priority order.
//! 2. **Access routing:** Word load and store by physical address relative to IOSR,
//!    rejecting misaligned and unmapped accesses.
//! 3. **Polling:** Periodic poll of every device.

use tracing::trace;

use super::traits::Device;
use crate::common::SimError;

/// Bus connecting the core to memory-mapped devices.
#[derive(Default)]
pub struct IoBus {
    devices: Vec<Box<dyn Device>>,
}

impl std::fmt::Debug for IoBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.devices.iter().map(|d| d.name()))
            .finish()
    }
}

impl IoBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a device. Earlier registrations win overlapping ranges and take
    /// interrupt priority over later ones.
    ///
    /// # Arguments
    ///
    /// * `dev` - The device to add.
    pub fn add_device(&mut self, dev: Box<dyn Device>) {
        self.devices.push(dev);
    }

    /// Number of registered devices.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Returns `true` when no device is registered.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Mutable access to the devices in priority order.
    pub fn devices_mut(&mut self) -> &mut [Box<dyn Device>] {
        &mut self.devices
    }

    /// Resolves a physical address to `(device index, device-relative offset)`.
    ///
    /// # Arguments
    ///
    /// * `iosr` - Current value of the I/O base register.
    /// * `paddr` - Physical address at or above `iosr`.
    ///
    /// # Returns
    ///
    /// The route, [`SimError::MisalignedIo`] if `paddr` is not word aligned, or
    /// [`SimError::UnmappedIo`] if no device claims it.
    pub fn route(&self, iosr: u32, paddr: u32) -> Result<(usize, u32), SimError> {
        if paddr & 3 != 0 {
            return Err(SimError::MisalignedIo { addr: paddr });
        }
        let offset = paddr.wrapping_sub(iosr);
        self.devices
            .iter()
            .position(|d| {
                let (base, size) = d.address_range();
                offset >= base && offset - base < size
            })
            .map(|idx| (idx, offset - self.devices[idx].address_range().0))
            .ok_or(SimError::UnmappedIo { addr: paddr })
    }

    /// Reads a device register.
    pub fn load(&mut self, iosr: u32, paddr: u32) -> Result<u32, SimError> {
        let (idx, offset) = self.route(iosr, paddr)?;
        let dev = &mut self.devices[idx];
        let val = dev.load(offset);
        trace!(device = dev.name(), offset, val, "io load");
        Ok(val)
    }

    /// Writes a device register.
    pub fn store(&mut self, iosr: u32, paddr: u32, val: u32) -> Result<(), SimError> {
        let (idx, offset) = self.route(iosr, paddr)?;
        let dev = &mut self.devices[idx];
        trace!(device = dev.name(), offset, val, "io store");
        dev.store(offset, val);
        Ok(())
    }

    /// Polls every device once.
    pub fn poll(&mut self) {
        self.devices.iter_mut().for_each(|d| d.poll());
    }
}

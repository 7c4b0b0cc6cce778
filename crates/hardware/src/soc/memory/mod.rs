//! Physical System Memory.
//!
//! This module implements the emulated RAM. It provides:
//! 1. **Lazy paging:** RAM is split into 16 KiB pages that are allocated on first touch,
//!    so a sparse program costs only the pages it uses.
//! 2. **Bounds:** Accesses at or above the RAM ceiling fail with [`SimError::OutOfMemory`].
//! 3. **Loading:** Bulk copy of flat images for the loader.
//!
//! Words are stored little-endian. Pages live until the store is dropped.

use crate::common::SimError;
use crate::common::constants::{STORE_PAGE_SHIFT, STORE_PAGE_SIZE};

/// One backing-store page.
type Page = Box<[u8; STORE_PAGE_SIZE]>;

/// Sparse, lazily allocated physical RAM.
#[derive(Debug)]
pub struct PhysicalMemory {
    pages: Vec<Option<Page>>,
    max_addr: u32,
}

impl PhysicalMemory {
    /// Creates an empty store covering `[0, max_addr)`.
    ///
    /// # Arguments
    ///
    /// * `max_addr` - RAM ceiling in bytes.
    pub fn new(max_addr: u32) -> Self {
        let count = (max_addr as usize).div_ceil(STORE_PAGE_SIZE);
        let mut pages = Vec::with_capacity(count);
        pages.resize_with(count, || None);
        Self { pages, max_addr }
    }

    /// Returns the RAM ceiling.
    pub const fn max_addr(&self) -> u32 {
        self.max_addr
    }

    /// Number of pages that have been allocated so far.
    pub fn allocated_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.is_some()).count()
    }

    /// Returns `true` if the page holding `addr` has been allocated.
    pub fn is_allocated(&self, addr: u32) -> bool {
        self.pages
            .get((addr >> STORE_PAGE_SHIFT) as usize)
            .is_some_and(Option::is_some)
    }

    /// Returns the page containing `addr`, allocating it if needed.
    fn page_mut(&mut self, addr: u32) -> Result<&mut [u8; STORE_PAGE_SIZE], SimError> {
        if addr >= self.max_addr {
            return Err(SimError::OutOfMemory { addr });
        }
        let slot = self
            .pages
            .get_mut((addr >> STORE_PAGE_SHIFT) as usize)
            .ok_or(SimError::OutOfMemory { addr })?;
        let page = slot.get_or_insert_with(|| Box::new([0; STORE_PAGE_SIZE]));
        Ok(&mut **page)
    }

    /// Reads the aligned word containing `addr`.
    ///
    /// # Arguments
    ///
    /// * `addr` - Physical address; the low two bits are ignored.
    ///
    /// # Returns
    ///
    /// The little-endian word, zero if the page was never written.
    pub fn read_word(&mut self, addr: u32) -> Result<u32, SimError> {
        let addr = addr & !3;
        let off = addr as usize & (STORE_PAGE_SIZE - 1);
        let page = self.page_mut(addr)?;
        Ok(u32::from_le_bytes([
            page[off],
            page[off + 1],
            page[off + 2],
            page[off + 3],
        ]))
    }

    /// Writes the aligned word containing `addr`.
    ///
    /// # Arguments
    ///
    /// * `addr` - Physical address; the low two bits are ignored.
    /// * `val` - The word to store.
    pub fn write_word(&mut self, addr: u32, val: u32) -> Result<(), SimError> {
        let addr = addr & !3;
        let off = addr as usize & (STORE_PAGE_SIZE - 1);
        let page = self.page_mut(addr)?;
        page[off..off + 4].copy_from_slice(&val.to_le_bytes());
        Ok(())
    }

    /// Reads one byte.
    pub fn read_byte(&mut self, addr: u32) -> Result<u8, SimError> {
        let off = addr as usize & (STORE_PAGE_SIZE - 1);
        Ok(self.page_mut(addr)?[off])
    }

    /// Copies `data` into RAM starting at `addr`.
    ///
    /// # Returns
    ///
    /// [`SimError::ImageTooLarge`] if any byte would land at or above the ceiling; nothing
    /// is written in that case.
    pub fn load(&mut self, addr: u32, data: &[u8]) -> Result<(), SimError> {
        let end = u64::from(addr) + data.len() as u64;
        if end > u64::from(self.max_addr) {
            return Err(SimError::ImageTooLarge {
                addr,
                len: data.len(),
            });
        }
        let mut cursor = addr;
        let mut rest = data;
        while !rest.is_empty() {
            let off = cursor as usize & (STORE_PAGE_SIZE - 1);
            let n = rest.len().min(STORE_PAGE_SIZE - off);
            let page = self.page_mut(cursor)?;
            page[off..off + n].copy_from_slice(&rest[..n]);
            rest = &rest[n..];
            cursor = cursor.wrapping_add(n as u32);
        }
        Ok(())
    }
}

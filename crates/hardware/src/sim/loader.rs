//! Binary Loader.
//!
//! This module provides the loader contract the core exposes to the host. It performs:
//! 1. **Binary loading:** Reads a flat program image from disk into a byte buffer.
//! 2. **Placement:** Copies an image into the physical store and drops any cached lines
//!    that overlap it.
//! 3. **Entry:** Sets the initial program counter.
//!
//! Executable formats are not parsed here; the image is placed byte for byte.

use std::fs;
use std::io;
use std::path::Path;

use tracing::info;

use crate::common::SimError;
use crate::core::Cpu;

/// Loads a binary file from disk into a byte vector.
///
/// # Arguments
///
/// * `path` - Path to the binary file.
///
/// # Returns
///
/// The raw bytes of the file, or the I/O error that prevented reading it.
pub fn load_binary(path: impl AsRef<Path>) -> io::Result<Vec<u8>> {
    fs::read(path)
}

/// Writes a flat image into RAM.
///
/// # Arguments
///
/// * `cpu` - The CPU whose physical store receives the image.
/// * `data` - Image bytes.
/// * `paddr` - Physical load address.
///
/// # Returns
///
/// [`SimError::ImageTooLarge`] if the image does not fit below the RAM ceiling.
pub fn load_image(cpu: &mut Cpu, data: &[u8], paddr: u32) -> Result<(), SimError> {
    cpu.memory.load_image(paddr, data)?;
    info!(
        addr = format_args!("{paddr:#010x}"),
        len = data.len(),
        "image loaded"
    );
    Ok(())
}

/// Sets the program counter the first cycle fetches from.
pub fn set_entry(cpu: &mut Cpu, pc: u32) {
    cpu.sys.pc = pc;
    cpu.sys.next_pc = None;
}

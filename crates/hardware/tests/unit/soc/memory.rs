use mist32_core::common::SimError;
use mist32_core::soc::PhysicalMemory;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn untouched_memory_reads_zero() {
    let mut ram = PhysicalMemory::new(0x10_0000);
    assert_eq!(ram.allocated_pages(), 0);
    assert!(!ram.is_allocated(0x8000));
    assert_eq!(ram.read_word(0x8000).unwrap(), 0);
}

#[test]
fn words_are_little_endian() {
    let mut ram = PhysicalMemory::new(0x10_0000);
    ram.write_word(0x100, 0x1122_3344).unwrap();
    assert_eq!(ram.read_byte(0x100).unwrap(), 0x44);
    assert_eq!(ram.read_byte(0x103).unwrap(), 0x11);
}

#[test]
fn low_address_bits_are_ignored_for_words() {
    let mut ram = PhysicalMemory::new(0x10_0000);
    ram.write_word(0x202, 0xCAFE_F00D).unwrap();
    assert_eq!(ram.read_word(0x200).unwrap(), 0xCAFE_F00D);
}

#[test]
fn pages_are_allocated_lazily() {
    let mut ram = PhysicalMemory::new(0x10_0000);
    ram.write_word(0x0, 1).unwrap();
    ram.write_word(0x4000, 1).unwrap();
    ram.write_word(0x4004, 1).unwrap();
    assert_eq!(ram.allocated_pages(), 2);
    assert!(ram.is_allocated(0x3FFC));
    assert!(!ram.is_allocated(0x8000));

    assert_eq!(ram.read_word(0x4004).unwrap(), 1);
}

#[test]
fn access_at_the_ceiling_is_out_of_memory() {
    let mut ram = PhysicalMemory::new(0x1_0000);
    assert_eq!(ram.max_addr(), 0x1_0000);
    assert!(ram.write_word(0xFFFC, 1).is_ok());
    assert!(matches!(
        ram.read_word(0x1_0000),
        Err(SimError::OutOfMemory { addr: 0x1_0000 })
    ));
    assert!(matches!(
        ram.write_word(0x2_0000, 1),
        Err(SimError::OutOfMemory { .. })
    ));
}

#[test]
fn load_spans_pages_and_rejects_overflow_untouched() {
    let mut ram = PhysicalMemory::new(0x1_0000);
    let data: Vec<u8> = (0..8).collect();
    ram.load(0x3FFC, &data).unwrap();
    assert_eq!(ram.read_word(0x3FFC).unwrap(), 0x0302_0100);
    assert_eq!(ram.read_word(0x4000).unwrap(), 0x0706_0504);

    let before = ram.allocated_pages();
    assert!(matches!(
        ram.load(0xFFF8, &[0xAA; 16]),
        Err(SimError::ImageTooLarge { addr: 0xFFF8, len: 16 })
    ));
    assert_eq!(ram.allocated_pages(), before);
}

proptest! {
    #[test]
    fn last_write_wins(addr in 0u32..0x10_0000, a: u32, b: u32) {
        let mut ram = PhysicalMemory::new(0x10_0000);
        ram.write_word(addr, a).unwrap();
        ram.write_word(addr, b).unwrap();
        prop_assert_eq!(ram.read_word(addr).unwrap(), b);
    }
}

use mist32_core::common::{AccessType, Fault, PhysAddr, SimError, VirtAddr};
use mist32_core::core::arch::Psr;
use mist32_core::core::arch::psr::PSR_CMOD_USER;
use mist32_core::core::units::mmu::Mmu;
use mist32_core::core::units::mmu::ptw::PTE_DIRTY_BIT;
use proptest::prelude::*;

use super::{l2_slot, map_small, memory, paged_regs};

#[test]
fn direct_mode_is_identity() {
    let mut mem = memory();
    let mut mmu = Mmu::new(64);
    let regs = paged_regs(0);

    let res = mmu
        .translate(VirtAddr::new(0xDEAD_BEEC), AccessType::Write, &regs, &mut mem)
        .unwrap();
    assert_eq!(res.paddr, PhysAddr(0xDEAD_BEEC));
    assert_eq!((mmu.tlb_hits, mmu.tlb_misses, mmu.walks), (0, 0, 0));
}

#[test]
fn page_size_other_than_4k_is_fatal() {
    let mut mem = memory();
    let mut mmu = Mmu::new(64);
    let mut regs = paged_regs(2);
    regs.psr = Psr((2 << 7) | 2);

    assert_eq!(
        mmu.translate(VirtAddr::new(0), AccessType::Read, &regs, &mut mem),
        Err(SimError::UnsupportedPageSize { field: 2 })
    );
}

#[test]
fn reserved_mode_is_fatal() {
    let mut mem = memory();
    let mut mmu = Mmu::new(64);
    let regs = paged_regs(3);
    assert_eq!(
        mmu.translate(VirtAddr::new(0), AccessType::Read, &regs, &mut mem),
        Err(SimError::UnsupportedMmuMode { mode: 3 })
    );
}

#[test]
fn second_access_hits_the_tlb() {
    let mut mem = memory();
    let mut mmu = Mmu::new(64);
    let regs = paged_regs(2);
    map_small(&mut mem, 0x7000, 0x0003_0000 | 0x0F);

    let first = mmu
        .translate(VirtAddr::new(0x7004), AccessType::Read, &regs, &mut mem)
        .unwrap();
    let second = mmu
        .translate(VirtAddr::new(0x7008), AccessType::Fetch, &regs, &mut mem)
        .unwrap();
    assert_eq!(first.paddr, PhysAddr(0x0003_0004));
    assert_eq!(second.paddr, PhysAddr(0x0003_0008));
    assert_eq!((mmu.tlb_hits, mmu.tlb_misses, mmu.walks), (1, 1, 1));
}

#[test]
fn cached_entry_still_enforces_permissions() {
    let mut mem = memory();
    let mut mmu = Mmu::new(64);
    let regs = paged_regs(2);
    map_small(&mut mem, 0x7000, 0x0003_0000 | 0x03);

    let _ = mmu
        .translate(VirtAddr::new(0x7000), AccessType::Read, &regs, &mut mem)
        .unwrap();
    let res = mmu
        .translate(VirtAddr::new(0x7010), AccessType::Write, &regs, &mut mem)
        .unwrap();
    assert!(matches!(
        res.fault,
        Some(Fault::ProtectionFault { vaddr, .. }) if vaddr == VirtAddr::new(0x7010)
    ));
    assert_eq!(mmu.walks, 1);
}

#[test]
fn first_write_to_clean_page_rewalks_to_set_dirty() {
    let mut mem = memory();
    let mut mmu = Mmu::new(64);
    let regs = paged_regs(2);
    map_small(&mut mem, 0x7000, 0x0003_0000 | 0x07);

    let _ = mmu
        .translate(VirtAddr::new(0x7000), AccessType::Read, &regs, &mut mem)
        .unwrap();
    let res = mmu
        .translate(VirtAddr::new(0x7000), AccessType::Write, &regs, &mut mem)
        .unwrap();
    assert_eq!(res.fault, None);
    assert_eq!(mmu.walks, 2);
    assert_ne!(mem.read_uncached(l2_slot(0x7000)).unwrap() & PTE_DIRTY_BIT, 0);

    // Now dirty in the TLB: further writes hit.
    let _ = mmu
        .translate(VirtAddr::new(0x7004), AccessType::Write, &regs, &mut mem)
        .unwrap();
    assert_eq!(mmu.walks, 2);
}

#[test]
fn stale_entries_survive_until_flush() {
    let mut mem = memory();
    let mut mmu = Mmu::new(64);
    let regs = paged_regs(2);
    map_small(&mut mem, 0x7000, 0x0003_0000 | 0x0F);
    let _ = mmu
        .translate(VirtAddr::new(0x7000), AccessType::Read, &regs, &mut mem)
        .unwrap();

    // Remap in memory only.
    mem.write(l2_slot(0x7000), 0x0004_0000 | 0x0F).unwrap();
    let stale = mmu
        .translate(VirtAddr::new(0x7000), AccessType::Read, &regs, &mut mem)
        .unwrap();
    assert_eq!(stale.paddr, PhysAddr(0x0003_0000));

    mmu.flush();
    let fresh = mmu
        .translate(VirtAddr::new(0x7000), AccessType::Read, &regs, &mut mem)
        .unwrap();
    assert_eq!(fresh.paddr, PhysAddr(0x0004_0000));
}

#[test]
fn user_mode_needs_user_pages() {
    let mut mem = memory();
    let mut mmu = Mmu::new(64);
    let mut regs = paged_regs(2);
    map_small(&mut mem, 0x7000, 0x0003_0000 | 0x0F);
    map_small(&mut mem, 0x8000, 0x0003_1000 | 0x1F);
    regs.psr = Psr(regs.psr.bits() | PSR_CMOD_USER);

    let kernel_page = mmu
        .translate(VirtAddr::new(0x7000), AccessType::Read, &regs, &mut mem)
        .unwrap();
    assert!(matches!(kernel_page.fault, Some(Fault::ProtectionFault { .. })));

    let user_page = mmu
        .translate(VirtAddr::new(0x8000), AccessType::Read, &regs, &mut mem)
        .unwrap();
    assert_eq!(user_page.paddr, PhysAddr(0x0003_1000));
}

proptest! {
    /// A warm TLB returns exactly what a cold walk returns.
    #[test]
    fn tlb_hit_matches_walk(
        pages in prop::collection::vec((0u32..1024, 0u32..0x100, 0u32..4), 1..32),
        accesses in prop::collection::vec((0u32..1024, 0u32..0x1000, 0u8..3), 1..64),
    ) {
        let mut mem = memory();
        let regs = paged_regs(2);
        for &(page, frame, perm) in &pages {
            // perm 0: unmapped, 1: read-only, 2: read/write, 3: read/exec.
            let bits = match perm {
                0 => 0,
                1 => 0x03,
                2 => 0x07 | PTE_DIRTY_BIT,
                _ => 0x0B,
            };
            map_small(&mut mem, page << 12, ((0x200 + frame) << 12) | bits);
        }

        let mut warm = Mmu::new(64);
        for &(page, offset, kind) in &accesses {
            let access = match kind {
                0 => AccessType::Read,
                1 => AccessType::Write,
                _ => AccessType::Fetch,
            };
            let va = VirtAddr::new((page << 12) | (offset & !3));
            let mut cold = Mmu::new(64);
            let expected = cold.translate(va, access, &regs, &mut mem).unwrap();
            let got = warm.translate(va, access, &regs, &mut mem).unwrap();
            prop_assert_eq!(got, expected);
        }
    }

    /// Translating the same sequence twice from reset gives the same results.
    #[test]
    fn translation_is_deterministic(vas in prop::collection::vec(0u32..0x40_0000, 1..32)) {
        let run = || {
            let mut mem = memory();
            let regs = paged_regs(2);
            map_small(&mut mem, 0x1000, 0x0030_0000 | 0x0F);
            let mut mmu = Mmu::new(16);
            vas.iter()
                .map(|&va| mmu.translate(VirtAddr::new(va), AccessType::Read, &regs, &mut mem).unwrap())
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(run(), run());
    }
}

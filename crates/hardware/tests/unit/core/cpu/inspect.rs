use mist32_core::core::arch::Psr;
use mist32_core::core::arch::psr::{PSR_MMUPS_4KB, PSR_MMUPS_SHIFT};
use mist32_core::core::cpu::inspect::{STACK_DUMP_WORDS, StackWord};
use pretty_assertions::assert_eq;

use crate::common::builder::instruction::nop;
use crate::common::builder::page_table::{PTE_KRWX, PageTableBuilder};
use crate::common::harness::TestContext;
use crate::common::mocks::device::FakeDevice;

const BASE: u32 = 0x1000;

const fn slot(addr: u32, value: Option<u32>) -> StackWord {
    StackWord { addr, value }
}

#[test]
fn stack_dump_reads_upward_from_sp() {
    let mut ctx = TestContext::new().load_program(BASE, &[nop()]);
    ctx.cpu_mut().sys.sp = 0x8000;
    ctx.write_word(0x8000, 42);
    ctx.write_word(0x8004, 0xFFFF_FFFF);

    let dump = ctx.cpu_mut().dump_stack(STACK_DUMP_WORDS);
    assert_eq!(dump.words.len(), STACK_DUMP_WORDS);
    assert_eq!(
        dump.words[..3].to_vec(),
        vec![
            slot(0x8000, Some(42)),
            slot(0x8004, Some(0xFFFF_FFFF)),
            slot(0x8008, Some(0)),
        ]
    );

    let text = dump.to_string();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("---- Stack ----"));
    assert_eq!(lines.next(), Some("0x00008000: 0x0000002a (         42)"));
    assert_eq!(lines.next(), Some("0x00008004: 0xffffffff (         -1)"));
}

#[test]
fn stack_dump_stops_at_the_top_of_the_address_space() {
    let mut ctx = TestContext::new().load_program(BASE, &[nop()]);
    ctx.cpu_mut().sys.sp = 0xFFFF_FFF8;

    let dump = ctx.cpu_mut().dump_stack(STACK_DUMP_WORDS);
    let addrs: Vec<u32> = dump.words.iter().map(|w| w.addr).collect();
    assert_eq!(addrs, vec![0xFFFF_FFF8, 0xFFFF_FFFC]);
}

#[test]
fn unmapped_stack_page_is_shown_without_faulting() {
    let mut ctx = TestContext::new().load_program(BASE, &[nop()]);
    let mut pt = PageTableBuilder::new(0x1_0000);
    pt.identity(ctx.cpu_mut(), 0, 0x4000, PTE_KRWX);
    ctx.write_word(0x3FFC, 7);
    let cpu = ctx.cpu_mut();
    cpu.sys.kpdtr = 0x1_0000;
    cpu.sys.psr = Psr((PSR_MMUPS_4KB << PSR_MMUPS_SHIFT) | 2);
    cpu.sys.sp = 0x3FFC;

    let dump = ctx.cpu_mut().dump_stack(2);
    assert_eq!(
        dump.words,
        vec![
            slot(0x3FFC, Some(7)),
            slot(0x4000, None),
        ]
    );
    assert!(dump.to_string().ends_with("0x00004000: <unmapped>"));
    assert_eq!(ctx.cpu().pending_fault, None);
    assert_eq!(ctx.cpu().sys.fi0r, 0);
}

#[test]
fn stack_dump_never_reads_device_registers() {
    let mut ctx = TestContext::new().load_program(BASE, &[nop()]);
    let dev = FakeDevice::new("fake", 0, 4);
    ctx.cpu_mut().attach_device(Box::new(dev.clone()));
    ctx.cpu_mut().sys.iosr = 0x8000;
    ctx.cpu_mut().sys.sp = 0x7FFC;

    let dump = ctx.cpu_mut().dump_stack(2);
    assert_eq!(dump.words[1], slot(0x8000, None));
    assert!(dev.state.lock().unwrap().loads.is_empty());
}

#[test]
fn state_dump_ends_with_pc_sp_and_psr() {
    let mut ctx = TestContext::new().load_program(BASE, &[nop()]);
    ctx.cpu_mut().sys.sp = 0x8000;
    ctx.set_reg(3, 5);

    let text = ctx.cpu().dump_state().to_string();
    assert!(text.contains("R 3: 0x00000005 (          5)"));
    let last = text.lines().last().unwrap();
    assert!(last.starts_with("PC: 0x00001000 SP: 0x00008000 "), "{last}");
}

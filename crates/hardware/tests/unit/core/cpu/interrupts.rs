use mist32_core::common::{Fault, VirtAddr};
use mist32_core::core::arch::psr::{PSR_IM_ENABLE, PSR_MMUPS_4KB, PSR_MMUPS_SHIFT};
use mist32_core::core::arch::{Flags, PrivilegeMode, Psr};
use mist32_core::isa::Opcode;
use pretty_assertions::assert_eq;

use crate::common::builder::instruction::{InstructionBuilder, ld32, nop, st32};
use crate::common::builder::page_table::{PTE_KRWX, PTE_R, PTE_V, PageTableBuilder};
use crate::common::harness::TestContext;
use crate::common::mocks::device::FakeDevice;

const BASE: u32 = 0x1000;
const HANDLER: u32 = 0x2000;
const IDT: u32 = 0x100;
const DIRECTORY: u32 = 0x1_0000;

fn ib() -> u32 {
    InstructionBuilder::new(Opcode::Ib).build()
}

fn swi(vector: i32) -> u32 {
    InstructionBuilder::new(Opcode::Swi).imm(vector).build()
}

/// Kernel-mode context with paging on and the low 16 KiB identity mapped.
fn paged_context(program: &[u32]) -> TestContext {
    let mut ctx = TestContext::new().load_program(BASE, program);
    ctx.cpu_mut().sys.idtr = IDT;
    ctx.set_idt_entry(1, true, HANDLER);
    ctx.set_idt_entry(2, true, HANDLER + 0x100);
    ctx.write_word(HANDLER, ib());
    ctx.write_word(HANDLER + 0x100, ib());

    let mut pt = PageTableBuilder::new(DIRECTORY);
    pt.identity(ctx.cpu_mut(), 0, 0x4000, PTE_KRWX);
    let cpu = ctx.cpu_mut();
    cpu.sys.kpdtr = DIRECTORY;
    cpu.sys.psr = Psr((PSR_MMUPS_4KB << PSR_MMUPS_SHIFT) | 2);
    ctx
}

/// Direct-mode context with interrupts enabled and an IDT at `IDT`.
fn irq_context(program: &[u32]) -> TestContext {
    let mut ctx = TestContext::new().load_program(BASE, program);
    ctx.cpu_mut().sys.idtr = IDT;
    ctx.cpu_mut().sys.psr = Psr(PSR_IM_ENABLE);
    ctx
}

#[test]
fn load_from_unmapped_page_vectors_to_page_fault_handler() {
    let mut ctx = paged_context(&[ld32(1, 2, 0)]);
    ctx.set_reg(1, 0xAAAA);
    ctx.set_reg(2, 0x0080_0000);
    let psr_before = ctx.cpu().sys.psr;

    assert_eq!(ctx.step(), Ok(None));

    let cpu = ctx.cpu();
    assert_eq!(cpu.sys.pc, HANDLER);
    assert_eq!(cpu.sys.ppcr, BASE);
    assert_eq!(cpu.sys.ppsr, psr_before);
    assert_eq!(cpu.sys.fi0r, 0x0080_0000);
    assert_eq!(cpu.sys.fi1r, 0);
    assert_eq!(cpu.regs.read(1), 0xAAAA);
    assert_eq!(cpu.sys.privilege(), PrivilegeMode::Kernel);
    assert!(!cpu.sys.psr.interrupts_enabled());
    assert_eq!(cpu.stats.faults, 1);
    assert_eq!(cpu.stats.interrupts, 1);
    assert_eq!(cpu.stats.instructions_retired, 0);
    assert_eq!(cpu.pending_fault, None);
}

#[test]
fn return_from_handler_retries_faulting_instruction() {
    let mut ctx = paged_context(&[ld32(1, 2, 0)]);
    ctx.set_reg(2, 0x0080_0000);
    let psr_before = ctx.cpu().sys.psr;
    ctx.step_n(2);
    assert_eq!(ctx.pc(), BASE);
    assert_eq!(ctx.cpu().sys.psr, psr_before);
}

#[test]
fn faulting_cycle_is_not_a_taken_branch() {
    let mut ctx = paged_context(&[ld32(1, 2, 0)]);
    ctx.set_reg(2, 0x0080_0000);

    ctx.step_n(1);
    assert_eq!(ctx.sim.traceback().branches().count(), 0);

    // The handler's `ib` is.
    ctx.step_n(1);
    assert_eq!(ctx.sim.traceback().branches().collect::<Vec<_>>(), vec![HANDLER]);
}

#[test]
fn store_to_read_only_page_is_a_protection_fault() {
    let mut ctx = paged_context(&[st32(1, 2, 0)]);
    let mut pt = PageTableBuilder::new(DIRECTORY);
    pt.map(ctx.cpu_mut(), 0x3000, 0x3000, PTE_V | PTE_R);
    ctx.set_reg(1, 0x1234);
    ctx.set_reg(2, 0x3000);

    ctx.step_n(1);
    assert_eq!(ctx.pc(), HANDLER + 0x100);
    assert_eq!(ctx.cpu().sys.fi0r, 0x3000);
    assert_eq!(ctx.cpu().sys.fi1r, 0x3000 | PTE_V | PTE_R);
    assert_eq!(ctx.read_word(0x3000), 0);
}

#[test]
fn faulting_fetch_skips_execution() {
    let mut ctx = paged_context(&[]);
    ctx.cpu_mut().sys.pc = 0x0040_0000;

    ctx.step_n(1);
    assert_eq!(ctx.cpu().sys.ppcr, 0x0040_0000);
    assert_eq!(ctx.cpu().sys.fi0r, 0x0040_0000);
    assert_eq!(ctx.pc(), HANDLER);
}

#[test]
fn raising_a_fault_discards_staged_device_store() {
    let mut ctx = TestContext::new();
    let cpu = ctx.cpu_mut();
    cpu.sys.pc = 0x1234;
    cpu.io_writeback = Some((0xFF00_0000, 1));

    cpu.raise_fault(Fault::ProtectionFault {
        vaddr: VirtAddr::new(0x10),
        pte: 0,
    });
    assert_eq!(cpu.io_writeback, None);
    assert_eq!(cpu.pending_nmi, Some(2));
    assert_eq!(cpu.sys.next_pc, Some(0x1234));
}

#[test]
fn software_interrupt_resumes_after_swi() {
    let mut ctx = TestContext::new().load_program(BASE, &[swi(0x85)]);
    ctx.cpu_mut().sys.idtr = IDT;
    // Only the low seven payload bits select the vector; NMIs ignore the enable bit.
    ctx.set_idt_entry(5, false, HANDLER);
    ctx.cpu_mut().flags = Flags::from_bits(0b101);

    ctx.step_n(1);
    let cpu = ctx.cpu();
    assert_eq!(cpu.sys.pc, HANDLER);
    assert_eq!(cpu.sys.ppcr, BASE + 4);
    assert_eq!(cpu.sys.pflags.bits(), 0b101);
    assert_eq!(cpu.stats.instructions_retired, 1);
}

#[test]
fn device_interrupt_is_taken_when_enabled() {
    let mut ctx = irq_context(&[nop()]);
    ctx.set_idt_entry(8, true, HANDLER);
    let timer = FakeDevice::new("TIMER", 0, 4).with_vector(8);
    ctx.cpu_mut().attach_device(Box::new(timer.clone()));
    timer.raise();

    ctx.step_n(1);
    assert_eq!(ctx.pc(), HANDLER);
    assert_eq!(ctx.cpu().sys.ppcr, BASE + 4);
    assert!(!ctx.cpu().sys.psr.interrupts_enabled());
    assert_eq!(timer.irq_taken(), 1);
}

#[test]
fn disabled_idt_entry_leaves_request_pending() {
    let mut ctx = irq_context(&[nop()]);
    ctx.set_idt_entry(8, false, HANDLER);
    let timer = FakeDevice::new("TIMER", 0, 4).with_vector(8);
    ctx.cpu_mut().attach_device(Box::new(timer.clone()));
    timer.raise();

    ctx.step_n(1);
    assert_eq!(ctx.pc(), BASE + 4);
    assert!(timer.irq_requested());
}

#[test]
fn masked_interrupts_are_not_taken() {
    let mut ctx = irq_context(&[nop()]);
    ctx.cpu_mut().sys.psr = Psr(0);
    ctx.set_idt_entry(8, true, HANDLER);
    let timer = FakeDevice::new("TIMER", 0, 4).with_vector(8);
    ctx.cpu_mut().attach_device(Box::new(timer.clone()));
    timer.raise();

    ctx.step_n(1);
    assert_eq!(ctx.pc(), BASE + 4);
    assert!(timer.irq_requested());
}

#[test]
fn registration_order_is_priority() {
    let mut ctx = irq_context(&[nop()]);
    ctx.set_idt_entry(8, true, HANDLER);
    ctx.set_idt_entry(9, true, HANDLER + 0x40);
    let first = FakeDevice::new("SCI", 0x10, 4).with_vector(9);
    let second = FakeDevice::new("TIMER", 0, 4).with_vector(8);
    ctx.cpu_mut().attach_device(Box::new(first.clone()));
    ctx.cpu_mut().attach_device(Box::new(second.clone()));
    first.raise();
    second.raise();

    ctx.step_n(1);
    assert_eq!(ctx.pc(), HANDLER + 0x40);
    assert_eq!(first.irq_taken(), 1);
    assert!(second.irq_requested());
}

#[test]
fn nmi_wins_over_device_interrupt() {
    let mut ctx = irq_context(&[swi(3)]);
    ctx.set_idt_entry(3, true, HANDLER);
    ctx.set_idt_entry(8, true, HANDLER + 0x40);
    ctx.write_word(HANDLER, nop());
    let timer = FakeDevice::new("TIMER", 0, 4).with_vector(8);
    ctx.cpu_mut().attach_device(Box::new(timer.clone()));
    timer.raise();

    ctx.step_n(1);
    assert_eq!(ctx.pc(), HANDLER);
    assert!(timer.irq_requested());

    // The handler runs with interrupts masked.
    ctx.step_n(1);
    assert_eq!(ctx.pc(), HANDLER + 4);
    assert!(timer.irq_requested());
}

#[test]
fn interrupt_return_restores_context() {
    let mut ctx = irq_context(&[ib()]);
    let cpu = ctx.cpu_mut();
    cpu.sys.ppcr = 0x3000;
    cpu.sys.ppsr = Psr(PSR_IM_ENABLE | 0x60);
    cpu.sys.pflags = Flags::from_bits(0b1000);

    ctx.step_n(1);
    let cpu = ctx.cpu();
    assert_eq!(cpu.sys.pc, 0x3000);
    assert_eq!(cpu.sys.psr, Psr(PSR_IM_ENABLE | 0x60));
    assert!(cpu.flags.overflow);
}

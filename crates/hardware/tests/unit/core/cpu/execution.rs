use mist32_core::common::SimError;
use mist32_core::core::arch::{Condition, Flags};
use mist32_core::isa::Opcode;
use mist32_core::sim::ExitReason;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::instruction::{
    InstructionBuilder, alu_imm, alu_reg, br, halt, li32, lih, lil, nop, one,
};
use crate::common::harness::TestContext;

const BASE: u32 = 0x1000;

#[test]
fn add_immediate_then_untaken_branch() {
    let mut ctx = TestContext::new().load_program(
        BASE,
        &[
            alu_imm(Opcode::Add, 1, 2, 5),
            br(Condition::Zero, 2),
            nop(),
        ],
    );
    ctx.set_reg(2, 10);

    ctx.step_n(1);
    assert_eq!(ctx.get_reg(1), 15);
    assert_eq!(ctx.cpu().flags, Flags::from_add(15, 10, 5));
    assert_eq!(ctx.pc(), BASE + 4);

    ctx.step_n(1);
    assert_eq!(ctx.pc(), BASE + 8);
}

#[test]
fn compare_then_taken_branch() {
    let mut ctx = TestContext::new().load_program(
        BASE,
        &[
            InstructionBuilder::new(Opcode::Cmp).rd(1).imm(5).build(),
            br(Condition::Zero, 3),
        ],
    );
    ctx.set_reg(1, 5);

    ctx.step_n(2);
    assert!(ctx.cpu().flags.zero);
    assert_eq!(ctx.pc(), BASE + 4 + 12);
}

#[test]
fn false_condition_is_a_no_op() {
    let add_if_zero = InstructionBuilder::new(Opcode::Add)
        .rd(1)
        .rs(1)
        .imm(1)
        .cond(Condition::Zero)
        .build();
    let mut ctx = TestContext::new().load_program(BASE, &[add_if_zero]);
    ctx.cpu_mut().flags = Flags::from_logical(1);

    ctx.step_n(1);
    assert_eq!(ctx.get_reg(1), 0);
    assert_eq!(ctx.cpu().flags, Flags::from_logical(1));
    assert_eq!(ctx.cpu().stats.instructions_retired, 1);
}

#[test]
fn register_operand_form() {
    let mut ctx = TestContext::new().load_program(BASE, &[alu_reg(Opcode::Sub, 3, 1, 2)]);
    ctx.set_reg(1, 3);
    ctx.set_reg(2, 5);
    ctx.step_n(1);
    assert_eq!(ctx.get_reg(3), (-2i32) as u32);
    assert!(ctx.cpu().flags.sign);
    assert!(!ctx.cpu().flags.carry);
}

#[rstest]
#[case(lil(1, -1), 0xFFFF_FFFF)]
#[case(lil(1, 0x7FFF), 0x0000_7FFF)]
#[case(InstructionBuilder::new(Opcode::Ulil).rd(1).imm(0xFFFF).build(), 0x0000_FFFF)]
#[case(lih(1, 0xABCD), 0xABCD_0000)]
fn immediate_loads(#[case] inst: u32, #[case] expected: u32) {
    let mut ctx = TestContext::new().load_program(BASE, &[inst]);
    ctx.set_reg(1, 0x1234_5678);
    ctx.step_n(1);
    assert_eq!(ctx.get_reg(1), expected);
}

#[test]
fn half_word_writes_keep_other_half() {
    let wl16 = InstructionBuilder::new(Opcode::Wl16).rd(1).imm(0xBEEF).build();
    let wh16 = InstructionBuilder::new(Opcode::Wh16).rd(2).imm(0xDEAD).build();
    let mut ctx = TestContext::new().load_program(BASE, &[wl16, wh16]);
    ctx.set_reg(1, 0x1111_2222);
    ctx.set_reg(2, 0x3333_4444);
    ctx.step_n(2);
    assert_eq!(ctx.get_reg(1), 0x1111_BEEF);
    assert_eq!(ctx.get_reg(2), 0xDEAD_4444);
}

#[test]
fn full_constant_via_lih_and_wl16() {
    let mut ctx = TestContext::new().load_program(BASE, &li32(4, 0xCAFE_F00D));
    ctx.step_n(2);
    assert_eq!(ctx.get_reg(4), 0xCAFE_F00D);
}

#[rstest]
#[case(Opcode::Neg, 5, (-5i32) as u32)]
#[case(Opcode::Inc, u32::MAX, 0)]
#[case(Opcode::Dec, 0, u32::MAX)]
#[case(Opcode::Not, 0xF0F0_F0F0, 0x0F0F_0F0F)]
#[case(Opcode::Sext8, 0xFF, u32::MAX)]
#[case(Opcode::Rev8, 0x0102_0304, 0x0403_0201)]
#[case(Opcode::Move, 0x55, 0x55)]
fn two_operand(#[case] op: Opcode, #[case] src: u32, #[case] expected: u32) {
    let mut ctx =
        TestContext::new().load_program(BASE, &[InstructionBuilder::new(op).rd(1).rs(2).build()]);
    ctx.set_reg(2, src);
    ctx.step_n(1);
    assert_eq!(ctx.get_reg(1), expected);
}

#[test]
fn move_leaves_flags_alone() {
    let mv = InstructionBuilder::new(Opcode::Move).rd(1).rs(2).build();
    let mut ctx = TestContext::new().load_program(BASE, &[mv]);
    ctx.cpu_mut().flags = Flags::from_bits(0b10101);
    ctx.step_n(1);
    assert_eq!(ctx.cpu().flags.bits(), 0b10101);
}

#[test]
fn clr_and_set() {
    let mut ctx = TestContext::new()
        .load_program(BASE, &[one(Opcode::Clr, 1), one(Opcode::Set, 2)]);
    ctx.set_reg(1, 9);
    ctx.step_n(2);
    assert_eq!(ctx.get_reg(1), 0);
    assert_eq!(ctx.get_reg(2), u32::MAX);
}

#[test]
fn absolute_branch_scales_immediate() {
    let b = InstructionBuilder::new(Opcode::B).imm(0x100).build();
    let mut ctx = TestContext::new().load_program(BASE, &[b]);
    ctx.step_n(1);
    assert_eq!(ctx.pc(), 0x400);
}

#[test]
fn register_branches() {
    let b_reg = InstructionBuilder::new(Opcode::B).rd(3).build();
    let br_reg = InstructionBuilder::new(Opcode::Br).rd(4).build();
    let mut ctx = TestContext::new().load_program(BASE, &[b_reg]);
    ctx.set_reg(3, 0x2000);
    ctx.set_reg(4, 0x10);
    ctx.write_word(0x2000, br_reg);

    ctx.step_n(1);
    assert_eq!(ctx.pc(), 0x2000);
    ctx.step_n(1);
    assert_eq!(ctx.pc(), 0x2010);
}

#[test]
fn bur_is_relative_and_sign_extended() {
    let bur = InstructionBuilder::new(Opcode::Bur).imm(-2).build();
    let mut ctx = TestContext::new().load_program(BASE + 8, &[bur]);
    ctx.step_n(1);
    assert_eq!(ctx.pc(), BASE);
}

#[test]
fn misaligned_branch_target_is_fatal() {
    let br_reg = InstructionBuilder::new(Opcode::Br).rd(1).build();
    let mut ctx = TestContext::new().load_program(BASE, &[br_reg]);
    ctx.set_reg(1, 2);
    assert_eq!(
        ctx.step(),
        Err(SimError::MisalignedBranch { target: BASE + 2 })
    );
}

#[test]
fn movepc_reads_current_instruction_address() {
    let mut ctx = TestContext::new().load_program(BASE, &[nop(), one(Opcode::Movepc, 7)]);
    ctx.step_n(2);
    assert_eq!(ctx.get_reg(7), BASE + 4);
}

#[test]
fn system_register_round_trip() {
    let mut ctx = TestContext::new().load_program(
        BASE,
        &[
            one(Opcode::Sridtw, 1),
            one(Opcode::Sridtr, 2),
            one(Opcode::Srpflagw, 3),
            one(Opcode::Srpflagr, 4),
            one(Opcode::Sriosr, 5),
        ],
    );
    ctx.set_reg(1, 0x0000_0800);
    ctx.set_reg(3, 0xFFFF_FFFF);
    ctx.step_n(5);
    assert_eq!(ctx.cpu().sys.idtr, 0x800);
    assert_eq!(ctx.get_reg(2), 0x800);
    assert_eq!(ctx.get_reg(4), 0b11111);
    assert_eq!(ctx.get_reg(5), 0xFF00_0000);
}

#[test]
fn directory_base_write_flushes_tlb() {
    use mist32_core::common::VirtAddr;
    use mist32_core::core::arch::PrivilegeMode;

    let mut ctx = TestContext::new().load_program(BASE, &[one(Opcode::Srkpdtw, 1)]);
    ctx.set_reg(1, 0x0001_0000);
    ctx.cpu_mut()
        .mmu
        .tlb
        .insert(VirtAddr::new(0x5000), 0x5000 | 0xF, false, PrivilegeMode::Kernel);

    ctx.step_n(1);
    assert_eq!(ctx.cpu().sys.kpdtr, 0x0001_0000);
    assert!(ctx
        .cpu()
        .mmu
        .tlb
        .lookup(VirtAddr::new(0x5000), PrivilegeMode::Kernel)
        .is_none());
}

#[test]
fn halt_ends_the_run() {
    let mut ctx = TestContext::new().load_program(BASE, &[lil(1, 3), halt(), lil(1, 9)]);
    assert_eq!(ctx.run(), Ok(ExitReason::Halted));
    assert_eq!(ctx.get_reg(1), 3);
    assert_eq!(ctx.cpu().stats.cycles, 2);
    assert_eq!(ctx.cpu().stats.instructions_retired, 2);
}

#[test]
fn undecodable_words_are_fatal() {
    let mut ctx = TestContext::new().load_program(BASE, &[1000 << 21]);
    assert_eq!(
        ctx.step(),
        Err(SimError::UnknownOpcode {
            opcode: 1000,
            word: 1000 << 21
        })
    );

    let mut ctx = TestContext::new().load_program(BASE, &[0x8000_0001]);
    assert_eq!(
        ctx.step(),
        Err(SimError::ExtendedFormat { word: 0x8000_0001 })
    );
}

#[test]
fn delayed_branch_encodings_behave_like_plain_ones() {
    // Opcode 178 is the delayed form of `b`.
    let delayed_b = (178 << 21) | (1 << 20) | 0x10;
    let mut ctx = TestContext::new().load_program(BASE, &[delayed_b]);
    ctx.step_n(1);
    assert_eq!(ctx.pc(), 0x40);
}

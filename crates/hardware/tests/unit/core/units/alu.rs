use mist32_core::core::units::alu::{Alu, AluOp, FlagRule};
use proptest::prelude::*;
use rstest::rstest;

fn value(op: AluOp, a: u32, b: u32) -> u32 {
    Alu::execute(op, a, b, false).value
}

#[rstest]
#[case(AluOp::Add, 10, 5, 15)]
#[case(AluOp::Sub, 5, 10, 0xFFFF_FFFB)]
#[case(AluOp::Mull, 0x1_0001, 0x1_0001, 0x0002_0001)]
#[case(AluOp::Mulh, 0x8000_0000, 2, 0xFFFF_FFFF)]
#[case(AluOp::Udiv, 100, 7, 14)]
#[case(AluOp::Umod, 100, 7, 2)]
#[case(AluOp::Div, (-100i32) as u32, 7, (-14i32) as u32)]
#[case(AluOp::Mod, (-100i32) as u32, 7, (-2i32) as u32)]
#[case(AluOp::Sext8, 0x1234_5680, 0, 0xFFFF_FF80)]
#[case(AluOp::Sext16, 0x0000_7FFF, 0, 0x0000_7FFF)]
#[case(AluOp::Sext16, 0x0001_8000, 0, 0xFFFF_8000)]
fn arithmetic(#[case] op: AluOp, #[case] a: u32, #[case] b: u32, #[case] expected: u32) {
    assert_eq!(value(op, a, b), expected);
}

#[rstest]
#[case(AluOp::Shl, 1, 31, 0x8000_0000)]
#[case(AluOp::Shl, 1, 32, 1)]
#[case(AluOp::Shr, 0x8000_0000, 31, 1)]
#[case(AluOp::Sar, 0x8000_0000, 31, 0xFFFF_FFFF)]
#[case(AluOp::Rol, 0x8000_0001, 1, 3)]
#[case(AluOp::Ror, 3, 1, 0x8000_0001)]
fn shifts_use_low_five_bits(#[case] op: AluOp, #[case] a: u32, #[case] b: u32, #[case] expected: u32) {
    assert_eq!(value(op, a, b), expected);
}

#[rstest]
#[case(AluOp::And, 0xF0F0, 0xFF00, 0xF000)]
#[case(AluOp::Or, 0xF0F0, 0xFF00, 0xFFF0)]
#[case(AluOp::Xor, 0xF0F0, 0xFF00, 0x0FF0)]
#[case(AluOp::Nand, 0xFFFF_FFFF, 0xFFFF_FFFF, 0)]
#[case(AluOp::Nor, 0, 0, 0xFFFF_FFFF)]
#[case(AluOp::Xnor, 0xA, 0xA, 0xFFFF_FFFF)]
#[case(AluOp::Not, 0x0F, 0, 0xFFFF_FFF0)]
#[case(AluOp::ClearBit, 0xFF, 3, 0xF7)]
#[case(AluOp::SetBit, 0, 31, 0x8000_0000)]
#[case(AluOp::GetBit, 0x10, 4, 1)]
#[case(AluOp::GetByte, 0x1122_3344, 2, 0x22)]
#[case(AluOp::BitReverse, 1, 0, 0x8000_0000)]
#[case(AluOp::ByteSwap, 0x1122_3344, 0, 0x4433_2211)]
fn logic(#[case] op: AluOp, #[case] a: u32, #[case] b: u32, #[case] expected: u32) {
    assert_eq!(value(op, a, b), expected);
}

#[test]
fn division_by_zero_saturates() {
    assert_eq!(value(AluOp::Udiv, 42, 0), u32::MAX);
    assert_eq!(value(AluOp::Div, 42, 0), u32::MAX);
    assert_eq!(value(AluOp::Umod, 42, 0), 42);
    assert_eq!(value(AluOp::Mod, 42, 0), 42);
}

#[test]
fn signed_division_of_min_by_minus_one_wraps() {
    assert_eq!(value(AluOp::Div, 0x8000_0000, u32::MAX), 0x8000_0000);
    assert_eq!(value(AluOp::Mod, 0x8000_0000, u32::MAX), 0);
}

#[test]
fn add_with_carry_folds_carry_in() {
    let out = Alu::execute(AluOp::AddCarry, u32::MAX, 0, true);
    assert_eq!(out.value, 0);
    let flags = out.flags.unwrap();
    assert!(flags.carry);
    assert!(flags.zero);

    assert_eq!(Alu::execute(AluOp::AddCarry, 1, 1, false).value, 2);
}

#[test]
fn flag_rules() {
    assert_eq!(AluOp::Add.flag_rule(), FlagRule::Add);
    assert_eq!(AluOp::Sub.flag_rule(), FlagRule::Sub);
    assert_eq!(AluOp::Shl.flag_rule(), FlagRule::Logical);
    assert_eq!(AluOp::Mull.flag_rule(), FlagRule::Logical);
    assert_eq!(AluOp::GetByte.flag_rule(), FlagRule::Unchanged);
    assert!(Alu::execute(AluOp::ByteSwap, 1, 0, false).flags.is_none());
}

#[test]
fn logical_results_clear_carry() {
    let flags = Alu::execute(AluOp::Or, 0x8000_0000, 0, true).flags.unwrap();
    assert!(flags.sign);
    assert!(!flags.carry);
    assert!(!flags.overflow);
}

proptest! {
    #[test]
    fn sub_is_add_of_negation(a in any::<u32>(), b in any::<u32>()) {
        prop_assert_eq!(value(AluOp::Sub, a, b), value(AluOp::Add, a, b.wrapping_neg()));
    }

    #[test]
    fn mulh_and_mull_form_the_signed_product(a in any::<u32>(), b in any::<u32>()) {
        let wide = i64::from(a as i32) * i64::from(b as i32);
        let hi = value(AluOp::Mulh, a, b);
        let lo = value(AluOp::Mull, a, b);
        prop_assert_eq!((u64::from(hi) << 32) | u64::from(lo), wide as u64);
    }

    #[test]
    fn unsigned_division_identity(a in any::<u32>(), b in 1u32..) {
        let q = value(AluOp::Udiv, a, b);
        let r = value(AluOp::Umod, a, b);
        prop_assert_eq!(q.wrapping_mul(b).wrapping_add(r), a);
        prop_assert!(r < b);
    }
}

//! ALU arithmetic operations.
//!
//! Implements 32-bit addition, subtraction, multiplication, division and sign
//! extension. All arithmetic wraps modulo 2^32.
//!
//! Division never traps: a zero divisor yields an all-ones quotient and returns the
//! dividend as the remainder, and `i32::MIN / -1` wraps.

use super::AluOp;

/// Number of bits in a word (used for high-multiply shift).
const WORD_BITS: u32 = 32;

/// Quotient produced by a division by zero.
const DIV_ZERO_QUOTIENT: u32 = u32::MAX;

/// Executes an integer arithmetic operation.
///
/// # Arguments
///
/// * `op`    - The ALU operation to perform (must be an arithmetic variant).
/// * `a`     - First operand.
/// * `b`     - Second operand.
/// * `carry` - Carry-in for [`AluOp::AddCarry`].
///
/// # Returns
///
/// The 32-bit result. Returns `0` for non-arithmetic opcodes.
pub const fn execute(op: AluOp, a: u32, b: u32, carry: bool) -> u32 {
    match op {
        AluOp::Add => a.wrapping_add(b),
        AluOp::AddCarry => a.wrapping_add(b).wrapping_add(carry as u32),
        AluOp::Sub => a.wrapping_sub(b),
        AluOp::Mull => a.wrapping_mul(b),
        AluOp::Mulh => (((a as i32 as i64) * (b as i32 as i64)) >> WORD_BITS) as u32,
        AluOp::Udiv => {
            if b == 0 {
                DIV_ZERO_QUOTIENT
            } else {
                a / b
            }
        }
        AluOp::Umod => {
            if b == 0 {
                a
            } else {
                a % b
            }
        }
        AluOp::Div => {
            if b == 0 {
                DIV_ZERO_QUOTIENT
            } else {
                (a as i32).wrapping_div(b as i32) as u32
            }
        }
        AluOp::Mod => {
            if b == 0 {
                a
            } else {
                (a as i32).wrapping_rem(b as i32) as u32
            }
        }
        AluOp::Sext8 => a as u8 as i8 as i32 as u32,
        AluOp::Sext16 => a as u16 as i16 as i32 as u32,
        _ => 0,
    }
}

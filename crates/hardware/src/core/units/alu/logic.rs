//! ALU logical operations.
//!
//! Implements the bitwise operations and the single-bit and byte manipulations
//! (clear/set/get bit, get byte, bit reverse, byte swap).

use super::AluOp;

/// Executes a logical or bit-manipulation operation.
///
/// # Arguments
///
/// * `op` - The ALU operation to perform (must be a logical variant).
/// * `a`  - First operand.
/// * `b`  - Second operand, or the bit/byte index.
///
/// # Returns
///
/// The 32-bit result. Returns `0` for non-logical opcodes.
pub const fn execute(op: AluOp, a: u32, b: u32) -> u32 {
    let bit = b & 0x1f;
    match op {
        AluOp::And => a & b,
        AluOp::Or => a | b,
        AluOp::Xor => a ^ b,
        AluOp::Nand => !(a & b),
        AluOp::Nor => !(a | b),
        AluOp::Xnor => !(a ^ b),
        AluOp::Not => !a,
        AluOp::ClearBit => a & !(1 << bit),
        AluOp::SetBit => a | (1 << bit),
        AluOp::GetBit => (a >> bit) & 1,
        AluOp::GetByte => (a >> ((b & 3) * 8)) & 0xFF,
        AluOp::BitReverse => a.reverse_bits(),
        AluOp::ByteSwap => a.swap_bytes(),
        _ => 0,
    }
}

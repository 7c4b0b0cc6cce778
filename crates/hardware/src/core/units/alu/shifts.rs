//! ALU shift operations.
//!
//! Implements logical and arithmetic shifts plus rotations. The shift amount is
//! masked to 5 bits (0-31).

use super::AluOp;

/// Bit mask for the shift amount (5 bits: 0-31).
const SHAMT_MASK: u32 = 0x1f;

/// Executes a shift operation.
///
/// # Arguments
///
/// * `op` - The ALU operation to perform (must be a shift variant).
/// * `a`  - The value to be shifted.
/// * `b`  - The shift amount (lower 5 bits used).
///
/// # Returns
///
/// The 32-bit result. Returns `0` for non-shift opcodes.
pub const fn execute(op: AluOp, a: u32, b: u32) -> u32 {
    let sh = b & SHAMT_MASK;
    match op {
        AluOp::Shl => a << sh,
        AluOp::Shr => a >> sh,
        AluOp::Sar => ((a as i32) >> sh) as u32,
        AluOp::Rol => a.rotate_left(sh),
        AluOp::Ror => a.rotate_right(sh),
        _ => 0,
    }
}

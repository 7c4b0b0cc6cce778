//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the integer ALU used by the execute step. Every operation
//! works on 32-bit operands and reports the flags it derives, if any.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: Add, AddCarry, Sub, Mull, Mulh, Udiv, Umod, Div, Mod, Sext8, Sext16
//! - [`logic`]:      And, Or, Xor, Nand, Nor, Xnor, Not and the single-bit/byte operations
//! - [`shifts`]:     Shl, Shr, Sar, Rol, Ror

/// Integer arithmetic operations (add, subtract, multiply, divide, sign extension).
pub mod arithmetic;

/// Bitwise logical operations and bit manipulation.
pub mod logic;

/// Shift and rotate operations.
pub mod shifts;

use crate::core::arch::flags::Flags;

/// Operation selector for the ALU.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    /// `a + b`.
    Add,
    /// `a + b + carry`.
    AddCarry,
    /// `a - b`.
    Sub,
    /// Low 32 bits of the product.
    Mull,
    /// High 32 bits of the signed product.
    Mulh,
    /// Unsigned quotient.
    Udiv,
    /// Unsigned remainder.
    Umod,
    /// Signed quotient.
    Div,
    /// Signed remainder.
    Mod,
    /// Sign-extend the low byte of `a`.
    Sext8,
    /// Sign-extend the low half of `a`.
    Sext16,
    /// Logical shift left.
    Shl,
    /// Logical shift right.
    Shr,
    /// Arithmetic shift right.
    Sar,
    /// Rotate left.
    Rol,
    /// Rotate right.
    Ror,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
    /// Bitwise NAND.
    Nand,
    /// Bitwise NOR.
    Nor,
    /// Bitwise XNOR.
    Xnor,
    /// Bitwise complement of `a`.
    Not,
    /// Clear bit `b` of `a`.
    ClearBit,
    /// Set bit `b` of `a`.
    SetBit,
    /// Bit `b` of `a`.
    GetBit,
    /// Byte `b & 3` of `a`.
    GetByte,
    /// Reverse the bit order of `a`.
    BitReverse,
    /// Reverse the byte order of `a`.
    ByteSwap,
}

/// How an operation derives the flags register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlagRule {
    /// Addition rule (carry and overflow from both operands).
    Add,
    /// Subtraction rule.
    Sub,
    /// Logical rule (carry and overflow cleared).
    Logical,
    /// Flags are left untouched.
    Unchanged,
}

impl AluOp {
    /// Returns the flag rule of this operation.
    pub const fn flag_rule(self) -> FlagRule {
        match self {
            Self::Add | Self::AddCarry => FlagRule::Add,
            Self::Sub => FlagRule::Sub,
            Self::ClearBit
            | Self::SetBit
            | Self::GetBit
            | Self::GetByte
            | Self::BitReverse
            | Self::ByteSwap => FlagRule::Unchanged,
            _ => FlagRule::Logical,
        }
    }
}

/// Result of one ALU operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AluOutput {
    /// The 32-bit result.
    pub value: u32,
    /// Replacement flags, or `None` when the operation leaves them untouched.
    pub flags: Option<Flags>,
}

/// Arithmetic Logic Unit (ALU) for integer operations.
#[derive(Clone, Copy, Debug, Default)]
pub struct Alu;

impl Alu {
    /// Executes an integer ALU operation.
    ///
    /// Dispatches to the appropriate submodule and derives the flags according to the
    /// operation's [`FlagRule`].
    ///
    /// # Arguments
    ///
    /// * `op`    - The ALU operation to perform.
    /// * `a`     - First operand (the `rs` source, or the minuend).
    /// * `b`     - Second operand (register or immediate, also the shift amount or bit index).
    /// * `carry` - Carry-in, used only by [`AluOp::AddCarry`].
    ///
    /// # Returns
    ///
    /// The result value and the flags it produces.
    ///
    /// # Examples
    ///
    /// ```
    /// use mist32_core::core::units::alu::{Alu, AluOp};
    ///
    /// let out = Alu::execute(AluOp::Add, 0xFFFF_FFFF, 1, false);
    /// assert_eq!(out.value, 0);
    /// let flags = out.flags.unwrap();
    /// assert!(flags.zero && flags.carry && !flags.overflow);
    ///
    /// // Division by zero saturates the quotient.
    /// assert_eq!(Alu::execute(AluOp::Udiv, 7, 0, false).value, 0xFFFF_FFFF);
    ///
    /// // Bit operations leave the flags alone.
    /// assert!(Alu::execute(AluOp::SetBit, 0, 4, false).flags.is_none());
    /// ```
    pub fn execute(op: AluOp, a: u32, b: u32, carry: bool) -> AluOutput {
        let value = match op {
            AluOp::Add
            | AluOp::AddCarry
            | AluOp::Sub
            | AluOp::Mull
            | AluOp::Mulh
            | AluOp::Udiv
            | AluOp::Umod
            | AluOp::Div
            | AluOp::Mod
            | AluOp::Sext8
            | AluOp::Sext16 => arithmetic::execute(op, a, b, carry),

            AluOp::Shl | AluOp::Shr | AluOp::Sar | AluOp::Rol | AluOp::Ror => {
                shifts::execute(op, a, b)
            }

            _ => logic::execute(op, a, b),
        };

        let flags = match op.flag_rule() {
            FlagRule::Add => Some(Flags::from_add(value, a, b)),
            FlagRule::Sub => Some(Flags::from_sub(value, a, b)),
            FlagRule::Logical => Some(Flags::from_logical(value)),
            FlagRule::Unchanged => None,
        };

        AluOutput { value, flags }
    }
}

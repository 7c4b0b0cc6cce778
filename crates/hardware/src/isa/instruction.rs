//! Instruction encoding and field extraction.
//!
//! A MIST32 instruction is one little-endian 32-bit word. Bit 31 flags an extended
//! format and bits 30..21 hold the opcode; the remaining 21 bits are read through one
//! of several overlapping layouts, chosen by the opcode. This module provides the raw
//! field accessors for every layout and the decoded, format-tagged representation.

use super::opcodes::Opcode;
use crate::core::arch::flags::Condition;

/// Bit marking an extended-format instruction.
pub const EXTENDED_BIT: u32 = 1 << 31;
/// Shift of the opcode field (bits 30..21).
pub const OPCODE_SHIFT: u32 = 21;
/// Mask of the opcode field after shifting.
pub const OPCODE_MASK: u32 = 0x3FF;
/// Immediate-operand selector bit (bit 20).
pub const IS_IMM_BIT: u32 = 1 << 20;
/// Shift of the condition-code field (bits 19..16).
pub const CC_SHIFT: u32 = 16;
/// Mask of the condition-code field after shifting.
pub const CC_MASK: u32 = 0xF;
/// Shift of the second register field of the Imm5Cond layout (bits 14..10).
pub const RS_SHIFT: u32 = 10;
/// Shift of the destination register field (bits 9..5), shared by every layout.
pub const RD_SHIFT: u32 = 5;
/// Mask of a 5-bit register or immediate field after shifting.
pub const REG_MASK: u32 = 0x1F;
/// Shift of the high part of the split 11-bit immediate (bits 15..10).
pub const IMM11_HI_SHIFT: u32 = 10;
/// Mask of the high part of the split 11-bit immediate.
pub const IMM11_HI_MASK: u32 = 0x3F;
/// Width of the split 11-bit immediate.
pub const IMM11_BITS: u32 = 11;
/// Shift of the high part of the split 16-bit immediate (bits 20..10).
pub const IMM16_HI_SHIFT: u32 = 10;
/// Mask of the high part of the split 16-bit immediate.
pub const IMM16_HI_MASK: u32 = 0x7FF;
/// Mask of the 21-bit payload field.
pub const PAYLOAD_MASK: u32 = 0x1F_FFFF;

/// Field extraction for encoded instructions.
///
/// Every accessor is defined for every word; only the fields of the layout the
/// opcode selects are meaningful.
pub trait InstructionBits {
    /// Format-extension flag (bit 31).
    fn is_extended(&self) -> bool;

    /// Opcode field (bits 30..21).
    fn opcode(&self) -> u32;

    /// Immediate-operand selector (bit 20) of the conditional layouts.
    fn is_imm(&self) -> bool;

    /// Condition code (bits 19..16) of the conditional layouts.
    fn cc(&self) -> Condition;

    /// Destination register (bits 9..5).
    fn rd(&self) -> usize;

    /// Second register of the Imm5Cond layout (bits 14..10).
    fn rs(&self) -> usize;

    /// Low 5-bit field (bits 4..0): a register index or a 5-bit immediate.
    fn low5(&self) -> u32;

    /// Split 11-bit immediate of the Imm11Cond layout, sign-extended.
    fn imm11(&self) -> i32;

    /// Split 16-bit immediate of the Imm16 layout, unextended.
    fn imm16(&self) -> u32;

    /// 21-bit payload of the Payload21 layout.
    fn payload(&self) -> u32;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn is_extended(&self) -> bool {
        self & EXTENDED_BIT != 0
    }

    #[inline(always)]
    fn opcode(&self) -> u32 {
        (self >> OPCODE_SHIFT) & OPCODE_MASK
    }

    #[inline(always)]
    fn is_imm(&self) -> bool {
        self & IS_IMM_BIT != 0
    }

    #[inline(always)]
    fn cc(&self) -> Condition {
        Condition::from_bits((self >> CC_SHIFT) & CC_MASK)
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> RD_SHIFT) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs(&self) -> usize {
        ((self >> RS_SHIFT) & REG_MASK) as usize
    }

    #[inline(always)]
    fn low5(&self) -> u32 {
        self & REG_MASK
    }

    /// The high six bits (15..10) are concatenated with the low five (4..0).
    #[inline(always)]
    fn imm11(&self) -> i32 {
        let raw = (((self >> IMM11_HI_SHIFT) & IMM11_HI_MASK) << 5) | (self & REG_MASK);
        let shift = 32 - IMM11_BITS;
        ((raw << shift) as i32) >> shift
    }

    /// The high eleven bits (20..10) are concatenated with the low five (4..0).
    #[inline(always)]
    fn imm16(&self) -> u32 {
        (((self >> IMM16_HI_SHIFT) & IMM16_HI_MASK) << 5) | (self & REG_MASK)
    }

    #[inline(always)]
    fn payload(&self) -> u32 {
        self & PAYLOAD_MASK
    }
}

/// Operands of a decoded instruction, tagged by layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operands {
    /// A single 21-bit payload.
    Payload21 {
        /// The payload.
        payload: u32,
    },
    /// Two registers plus a register-or-imm5 source, predicated.
    Imm5Cond {
        /// Source is the 5-bit immediate rather than a register.
        is_imm: bool,
        /// Predicate.
        cc: Condition,
        /// Destination register.
        rd: usize,
        /// First source register.
        rs: usize,
        /// Low field: source register index or immediate.
        src: u32,
    },
    /// One register plus a register-or-imm11 operand, predicated.
    Imm11Cond {
        /// Operand is the 11-bit immediate rather than a register.
        is_imm: bool,
        /// Predicate.
        cc: Condition,
        /// Destination (or tested) register.
        rd: usize,
        /// Operand register, meaningful when `is_imm` is clear.
        rs: usize,
        /// Sign-extended immediate, meaningful when `is_imm` is set.
        imm: i32,
    },
    /// One register plus a 16-bit immediate.
    Imm16 {
        /// Destination register.
        rd: usize,
        /// The raw 16-bit immediate.
        imm: u32,
    },
    /// Destination and source registers.
    TwoOperand {
        /// Destination register.
        rd: usize,
        /// Source register.
        rs: usize,
    },
    /// A single register.
    OneOperand {
        /// The register.
        rd: usize,
    },
    /// No operands.
    NoOperand,
}

impl Operands {
    /// Predicate of a conditional layout; `Always` for the others.
    pub const fn condition(&self) -> Condition {
        match self {
            Self::Imm5Cond { cc, .. } | Self::Imm11Cond { cc, .. } => *cc,
            _ => Condition::Always,
        }
    }
}

/// A decoded instruction: the raw word, its opcode, and its format-tagged operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decoded {
    /// Raw 32-bit instruction encoding.
    pub raw: u32,
    /// Decoded opcode.
    pub opcode: Opcode,
    /// Operand fields in the layout the opcode selects.
    pub operands: Operands,
}

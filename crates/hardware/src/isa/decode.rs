//! MIST32 Instruction Decoder.
//!
//! This module turns a raw instruction word into a [`Decoded`] value. The opcode
//! field selects one of seven operand layouts; decoding reads only the fields of that
//! layout, so the overlapping interpretations of the low 21 bits never leak into the
//! executor.

use crate::common::SimError;
use crate::isa::instruction::{Decoded, InstructionBits, Operands};
use crate::isa::opcodes::Opcode;

/// Operand layout of the low 21 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// `payload[20:0]`.
    Payload21,
    /// `is_imm[20] cc[19:16] rs[14:10] rd[9:5] src[4:0]`.
    Imm5Cond,
    /// `is_imm[20] cc[19:16] imm_hi[15:10] rd[9:5] imm_lo/rs[4:0]`.
    Imm11Cond,
    /// `imm_hi[20:10] rd[9:5] imm_lo[4:0]`.
    Imm16,
    /// `rd[9:5] rs[4:0]`.
    TwoOperand,
    /// `rd[9:5]`.
    OneOperand,
    /// No operand fields.
    NoOperand,
}

/// Decodes a raw 32-bit instruction.
///
/// # Arguments
///
/// * `inst` - The raw 32-bit instruction word.
///
/// # Returns
///
/// The decoded instruction, [`SimError::ExtendedFormat`] if bit 31 is set, or
/// [`SimError::UnknownOpcode`] if the opcode field is unassigned.
pub fn decode(inst: u32) -> Result<Decoded, SimError> {
    if inst.is_extended() {
        return Err(SimError::ExtendedFormat { word: inst });
    }

    let field = inst.opcode();
    let opcode = Opcode::from_u32(field).ok_or(SimError::UnknownOpcode {
        opcode: field,
        word: inst,
    })?;

    let operands = match opcode.format() {
        Format::Payload21 => Operands::Payload21 {
            payload: inst.payload(),
        },
        Format::Imm5Cond => Operands::Imm5Cond {
            is_imm: inst.is_imm(),
            cc: inst.cc(),
            rd: inst.rd(),
            rs: inst.rs(),
            src: inst.low5(),
        },
        Format::Imm11Cond => Operands::Imm11Cond {
            is_imm: inst.is_imm(),
            cc: inst.cc(),
            rd: inst.rd(),
            rs: inst.low5() as usize,
            imm: inst.imm11(),
        },
        Format::Imm16 => Operands::Imm16 {
            rd: inst.rd(),
            imm: inst.imm16(),
        },
        Format::TwoOperand => Operands::TwoOperand {
            rd: inst.rd(),
            rs: inst.low5() as usize,
        },
        Format::OneOperand => Operands::OneOperand { rd: inst.rd() },
        Format::NoOperand => Operands::NoOperand,
    };

    Ok(Decoded {
        raw: inst,
        opcode,
        operands,
    })
}

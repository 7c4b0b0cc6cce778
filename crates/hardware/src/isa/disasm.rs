//! Instruction Disassembler for MIST32.
//!
//! Converts a 32-bit instruction encoding into a human-readable string for the
//! diagnostic dump and trace output.
//!
//! # Usage
//!
//! ```
//! use mist32_core::isa::disasm::disassemble;
//! // add r1, r2, #5
//! let word = (1 << 20) | (2 << 10) | (1 << 5) | 5;
//! assert_eq!(disassemble(word), "add r1, r2, #5");
//! ```

use crate::isa::decode::decode;
use crate::isa::instruction::Operands;
use crate::isa::opcodes::Opcode;

/// Disassembles a 32-bit MIST32 instruction into a human-readable string.
///
/// Returns `"unknown"` for encodings that do not decode.
pub fn disassemble(inst: u32) -> String {
    let Ok(d) = decode(inst) else {
        return "unknown".to_string();
    };
    let op = d.opcode;
    let m = op.mnemonic();

    match d.operands {
        Operands::Payload21 { payload } => format!("{m} #{payload}"),

        Operands::Imm5Cond {
            is_imm,
            cc,
            rd,
            rs,
            src,
        } => {
            let suffix = cc.suffix();
            let b = if is_imm {
                format!("#{src}")
            } else {
                format!("r{src}")
            };
            match op {
                Opcode::Ld8 | Opcode::Ld16 | Opcode::Ld32 => {
                    format!("{m}{suffix} r{rd}, [r{rs} + {b}]")
                }
                Opcode::St8 | Opcode::St16 | Opcode::St32 => {
                    format!("{m}{suffix} [r{rs} + {b}], r{rd}")
                }
                _ => format!("{m}{suffix} r{rd}, r{rs}, {b}"),
            }
        }

        Operands::Imm11Cond {
            is_imm,
            cc,
            rd,
            rs,
            imm,
        } => {
            let suffix = cc.suffix();
            match (op, is_imm) {
                (Opcode::Br | Opcode::B, true) => format!("{m}{suffix} #{imm}"),
                (Opcode::Br | Opcode::B, false) => format!("{m}{suffix} r{rd}"),
                (_, true) => format!("{m}{suffix} r{rd}, #{imm}"),
                (_, false) => format!("{m}{suffix} r{rd}, r{rs}"),
            }
        }

        Operands::Imm16 { rd, imm } => match op {
            Opcode::Bur => format!("{m} #{}", imm as u16 as i16),
            _ => format!("{m} r{rd}, #{imm:#06x}"),
        },

        Operands::TwoOperand { rd, rs } => format!("{m} r{rd}, r{rs}"),
        Operands::OneOperand { rd } => format!("{m} r{rd}"),
        Operands::NoOperand => m.to_string(),
    }
}

//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the MIST32 opcode table, the instruction-word field accessors, the
//! format-driven decoder, and a disassembler.
//!
//! # Encoding
//!
//! Every instruction is one 32-bit word: bit 31 flags an extended format, bits 30..21
//! select the opcode, and the low 21 bits are read through the layout the opcode
//! names (see [`decode::Format`]).

/// Instruction decoding for all operand layouts.
pub mod decode;

/// Instruction disassembler for debug tracing and diagnostics.
pub mod disasm;

/// Instruction encoding structures and bit extraction utilities.
pub mod instruction;

/// Opcode table: values, layouts, and mnemonics.
pub mod opcodes;

pub use decode::{Format, decode};
pub use instruction::{Decoded, Operands};
pub use opcodes::Opcode;

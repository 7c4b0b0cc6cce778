//! MIST32 opcode table.
//!
//! Each opcode fixes both the operation and the operand layout of the remaining 21
//! bits. Opcodes 176-178 are the delayed-branch encodings; they execute exactly like
//! their non-delayed counterparts and decode to the same variant.

use super::decode::Format;

/// Every implemented opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Arithmetic
    /// Add (`add`).
    Add,
    /// Subtract (`sub`).
    Sub,
    /// Multiply, low word of the product (`mull`).
    Mull,
    /// Signed multiply, high word of the product (`mulh`).
    Mulh,
    /// Unsigned divide (`udiv`).
    Udiv,
    /// Unsigned remainder (`umod`).
    Umod,
    /// Subtract for flags only (`cmp`).
    Cmp,
    /// Signed divide (`div`).
    Div,
    /// Signed remainder (`mod`).
    Mod,
    /// Two's-complement negate (`neg`).
    Neg,
    /// Add with carry in (`addc`).
    Addc,
    /// Increment (`inc`).
    Inc,
    /// Decrement (`dec`).
    Dec,
    /// Sign-extend the low byte (`sext8`).
    Sext8,
    /// Sign-extend the low half-word (`sext16`).
    Sext16,

    // Shifts
    /// Logical shift left (`shl`).
    Shl,
    /// Logical shift right (`shr`).
    Shr,
    /// Arithmetic shift right (`sar`).
    Sar,
    /// Rotate left (`rol`).
    Rol,
    /// Rotate right (`ror`).
    Ror,

    // Logic
    /// Bitwise AND (`and`).
    And,
    /// Bitwise OR (`or`).
    Or,
    /// Bitwise complement (`not`).
    Not,
    /// Bitwise XOR (`xor`).
    Xor,
    /// Bitwise NAND (`nand`).
    Nand,
    /// Bitwise NOR (`nor`).
    Nor,
    /// Bitwise XNOR (`xnor`).
    Xnor,
    /// AND for flags only (`test`).
    Test,

    // Bit operations
    /// Write the low half-word, keeping the high half (`wl16`).
    Wl16,
    /// Write the high half-word, keeping the low half (`wh16`).
    Wh16,
    /// Clear one bit (`clrb`).
    Clrb,
    /// Set one bit (`setb`).
    Setb,
    /// Clear the register (`clr`).
    Clr,
    /// Set every bit of the register (`set`).
    Set,
    /// Reverse bit order (`revb`).
    Revb,
    /// Reverse byte order (`rev8`).
    Rev8,
    /// Extract one bit (`getb`).
    Getb,
    /// Extract one byte (`get8`).
    Get8,
    /// Load a sign-extended 16-bit immediate (`lil`).
    Lil,
    /// Load an immediate into the high half-word (`lih`).
    Lih,
    /// Load a zero-extended 16-bit immediate (`ulil`).
    Ulil,

    // Memory
    /// Load a byte (`ld8`).
    Ld8,
    /// Load a half-word (`ld16`).
    Ld16,
    /// Load a word (`ld32`).
    Ld32,
    /// Store a byte (`st8`).
    St8,
    /// Store a half-word (`st16`).
    St16,
    /// Store a word (`st32`).
    St32,
    /// Push a register (`push`).
    Push,
    /// Push the return address (`pushpc`).
    Pushpc,
    /// Pop into a register (`pop`).
    Pop,

    // Branches
    /// Unconditional PC-relative branch (`bur`).
    Bur,
    /// Conditional PC-relative branch (`br`).
    Br,
    /// Conditional absolute branch (`b`).
    B,
    /// Return from interrupt (`ib`).
    Ib,
    /// Software interrupt (`swi`).
    Swi,

    // System register reads
    /// Read SP (`srspr`).
    Srspr,
    /// Read PSR (`srpsr`).
    Srpsr,
    /// Read the saved PSR (`srppsr`).
    Srppsr,
    /// Read the saved PC (`srppcr`).
    Srppcr,
    /// Read fault info 0 (`srfi0r`).
    Srfi0r,
    /// Read fault info 1 (`srfi1r`).
    Srfi1r,
    /// Read the user page directory base (`srpdtr`).
    Srpdtr,
    /// Read the kernel page directory base (`srkpdtr`).
    Srkpdtr,
    /// Read the IDT base (`sridtr`).
    Sridtr,
    /// Read the saved flags (`srpflagr`).
    Srpflagr,
    /// Read the I/O window base (`sriosr`).
    Sriosr,

    // System register writes
    /// Write SP (`srspw`).
    Srspw,
    /// Write PSR (`srpsw`).
    Srpsw,
    /// Write the saved PSR (`srppsw`).
    Srppsw,
    /// Write the saved PC (`srppcw`).
    Srppcw,
    /// Write the user page directory base (`srpdtw`).
    Srpdtw,
    /// Write the kernel page directory base (`srkpdtw`).
    Srkpdtw,
    /// Write the IDT base (`sridtw`).
    Sridtw,
    /// Write the saved flags (`srpflagw`).
    Srpflagw,
    /// Write the I/O window base (`sriosw`).
    Sriosw,

    // Misc
    /// No operation (`nop`).
    Nop,
    /// Stop the simulation (`halt`).
    Halt,
    /// Copy a register (`move`).
    Move,
    /// Copy the PC into a register (`movepc`).
    Movepc,
}

impl Opcode {
    /// Looks up an opcode field value.
    ///
    /// # Returns
    ///
    /// The opcode, or `None` for unassigned values.
    pub const fn from_u32(op: u32) -> Option<Self> {
        Some(match op {
            0 => Self::Add,
            1 => Self::Sub,
            2 => Self::Mull,
            3 => Self::Mulh,
            4 => Self::Udiv,
            5 => Self::Umod,
            6 => Self::Cmp,
            7 => Self::Div,
            8 => Self::Mod,
            9 => Self::Neg,
            14 => Self::Addc,
            16 => Self::Inc,
            17 => Self::Dec,
            28 => Self::Sext8,
            29 => Self::Sext16,

            64 => Self::Shl,
            65 => Self::Shr,
            69 => Self::Sar,
            72 => Self::Rol,
            73 => Self::Ror,

            96 => Self::And,
            97 => Self::Or,
            98 => Self::Not,
            99 => Self::Xor,
            100 => Self::Nand,
            101 => Self::Nor,
            102 => Self::Xnor,
            103 => Self::Test,

            106 => Self::Wl16,
            107 => Self::Wh16,
            108 => Self::Clrb,
            109 => Self::Setb,
            110 => Self::Clr,
            111 => Self::Set,
            112 => Self::Revb,
            113 => Self::Rev8,
            114 => Self::Getb,
            115 => Self::Get8,
            118 => Self::Lil,
            119 => Self::Lih,
            122 => Self::Ulil,

            128 => Self::Ld8,
            129 => Self::Ld16,
            130 => Self::Ld32,
            131 => Self::St8,
            132 => Self::St16,
            133 => Self::St32,
            136 => Self::Push,
            137 => Self::Pushpc,
            144 => Self::Pop,

            160 | 176 => Self::Bur,
            161 | 177 => Self::Br,
            162 | 178 => Self::B,
            163 => Self::Ib,
            164 => Self::Swi,

            192 => Self::Srspr,
            193 => Self::Srpsr,
            194 => Self::Srppsr,
            195 => Self::Srppcr,
            196 => Self::Srfi0r,
            197 => Self::Srfi1r,
            198 => Self::Srpdtr,
            199 => Self::Srkpdtr,
            200 => Self::Sridtr,
            201 => Self::Srpflagr,
            203 => Self::Sriosr,

            224 => Self::Srspw,
            225 => Self::Srpsw,
            226 => Self::Srppsw,
            227 => Self::Srppcw,
            228 => Self::Srpdtw,
            229 => Self::Srkpdtw,
            230 => Self::Sridtw,
            231 => Self::Srpflagw,
            232 => Self::Sriosw,

            256 => Self::Nop,
            257 => Self::Halt,
            258 => Self::Move,
            259 => Self::Movepc,

            _ => return None,
        })
    }

    /// Canonical opcode field value (the non-delayed encoding for branch aliases).
    pub const fn encoding(self) -> u32 {
        match self {
            Self::Add => 0,
            Self::Sub => 1,
            Self::Mull => 2,
            Self::Mulh => 3,
            Self::Udiv => 4,
            Self::Umod => 5,
            Self::Cmp => 6,
            Self::Div => 7,
            Self::Mod => 8,
            Self::Neg => 9,
            Self::Addc => 14,
            Self::Inc => 16,
            Self::Dec => 17,
            Self::Sext8 => 28,
            Self::Sext16 => 29,
            Self::Shl => 64,
            Self::Shr => 65,
            Self::Sar => 69,
            Self::Rol => 72,
            Self::Ror => 73,
            Self::And => 96,
            Self::Or => 97,
            Self::Not => 98,
            Self::Xor => 99,
            Self::Nand => 100,
            Self::Nor => 101,
            Self::Xnor => 102,
            Self::Test => 103,
            Self::Wl16 => 106,
            Self::Wh16 => 107,
            Self::Clrb => 108,
            Self::Setb => 109,
            Self::Clr => 110,
            Self::Set => 111,
            Self::Revb => 112,
            Self::Rev8 => 113,
            Self::Getb => 114,
            Self::Get8 => 115,
            Self::Lil => 118,
            Self::Lih => 119,
            Self::Ulil => 122,
            Self::Ld8 => 128,
            Self::Ld16 => 129,
            Self::Ld32 => 130,
            Self::St8 => 131,
            Self::St16 => 132,
            Self::St32 => 133,
            Self::Push => 136,
            Self::Pushpc => 137,
            Self::Pop => 144,
            Self::Bur => 160,
            Self::Br => 161,
            Self::B => 162,
            Self::Ib => 163,
            Self::Swi => 164,
            Self::Srspr => 192,
            Self::Srpsr => 193,
            Self::Srppsr => 194,
            Self::Srppcr => 195,
            Self::Srfi0r => 196,
            Self::Srfi1r => 197,
            Self::Srpdtr => 198,
            Self::Srkpdtr => 199,
            Self::Sridtr => 200,
            Self::Srpflagr => 201,
            Self::Sriosr => 203,
            Self::Srspw => 224,
            Self::Srpsw => 225,
            Self::Srppsw => 226,
            Self::Srppcw => 227,
            Self::Srpdtw => 228,
            Self::Srkpdtw => 229,
            Self::Sridtw => 230,
            Self::Srpflagw => 231,
            Self::Sriosw => 232,
            Self::Nop => 256,
            Self::Halt => 257,
            Self::Move => 258,
            Self::Movepc => 259,
        }
    }

    /// Operand layout selected by this opcode.
    pub const fn format(self) -> Format {
        match self {
            Self::Add
            | Self::Sub
            | Self::Mull
            | Self::Mulh
            | Self::Udiv
            | Self::Umod
            | Self::Div
            | Self::Mod
            | Self::Addc
            | Self::Shl
            | Self::Shr
            | Self::Sar
            | Self::Rol
            | Self::Ror
            | Self::And
            | Self::Or
            | Self::Xor
            | Self::Nand
            | Self::Nor
            | Self::Xnor
            | Self::Clrb
            | Self::Setb
            | Self::Getb
            | Self::Get8
            | Self::Ld8
            | Self::Ld16
            | Self::Ld32
            | Self::St8
            | Self::St16
            | Self::St32 => Format::Imm5Cond,

            Self::Cmp | Self::Test | Self::Br | Self::B => Format::Imm11Cond,

            Self::Wl16 | Self::Wh16 | Self::Lil | Self::Lih | Self::Ulil | Self::Bur => {
                Format::Imm16
            }

            Self::Neg
            | Self::Inc
            | Self::Dec
            | Self::Sext8
            | Self::Sext16
            | Self::Not
            | Self::Revb
            | Self::Rev8
            | Self::Move => Format::TwoOperand,

            Self::Clr
            | Self::Set
            | Self::Push
            | Self::Pop
            | Self::Srspr
            | Self::Srpsr
            | Self::Srppsr
            | Self::Srppcr
            | Self::Srfi0r
            | Self::Srfi1r
            | Self::Srpdtr
            | Self::Srkpdtr
            | Self::Sridtr
            | Self::Srpflagr
            | Self::Sriosr
            | Self::Srspw
            | Self::Srpsw
            | Self::Srppsw
            | Self::Srppcw
            | Self::Srpdtw
            | Self::Srkpdtw
            | Self::Sridtw
            | Self::Srpflagw
            | Self::Sriosw
            | Self::Movepc => Format::OneOperand,

            Self::Swi => Format::Payload21,

            Self::Pushpc | Self::Ib | Self::Nop | Self::Halt => Format::NoOperand,
        }
    }

    /// Assembler mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mull => "mull",
            Self::Mulh => "mulh",
            Self::Udiv => "udiv",
            Self::Umod => "umod",
            Self::Cmp => "cmp",
            Self::Div => "div",
            Self::Mod => "mod",
            Self::Neg => "neg",
            Self::Addc => "addc",
            Self::Inc => "inc",
            Self::Dec => "dec",
            Self::Sext8 => "sext8",
            Self::Sext16 => "sext16",
            Self::Shl => "shl",
            Self::Shr => "shr",
            Self::Sar => "sar",
            Self::Rol => "rol",
            Self::Ror => "ror",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Xor => "xor",
            Self::Nand => "nand",
            Self::Nor => "nor",
            Self::Xnor => "xnor",
            Self::Test => "test",
            Self::Wl16 => "wl16",
            Self::Wh16 => "wh16",
            Self::Clrb => "clrb",
            Self::Setb => "setb",
            Self::Clr => "clr",
            Self::Set => "set",
            Self::Revb => "revb",
            Self::Rev8 => "rev8",
            Self::Getb => "getb",
            Self::Get8 => "get8",
            Self::Lil => "lil",
            Self::Lih => "lih",
            Self::Ulil => "ulil",
            Self::Ld8 => "ld8",
            Self::Ld16 => "ld16",
            Self::Ld32 => "ld32",
            Self::St8 => "st8",
            Self::St16 => "st16",
            Self::St32 => "st32",
            Self::Push => "push",
            Self::Pushpc => "pushpc",
            Self::Pop => "pop",
            Self::Bur => "bur",
            Self::Br => "br",
            Self::B => "b",
            Self::Ib => "ib",
            Self::Swi => "swi",
            Self::Srspr => "srspr",
            Self::Srpsr => "srpsr",
            Self::Srppsr => "srppsr",
            Self::Srppcr => "srppcr",
            Self::Srfi0r => "srfi0r",
            Self::Srfi1r => "srfi1r",
            Self::Srpdtr => "srpdtr",
            Self::Srkpdtr => "srkpdtr",
            Self::Sridtr => "sridtr",
            Self::Srpflagr => "srpflagr",
            Self::Sriosr => "sriosr",
            Self::Srspw => "srspw",
            Self::Srpsw => "srpsw",
            Self::Srppsw => "srppsw",
            Self::Srppcw => "srppcw",
            Self::Srpdtw => "srpdtw",
            Self::Srkpdtw => "srkpdtw",
            Self::Sridtw => "sridtw",
            Self::Srpflagw => "srpflagw",
            Self::Sriosw => "sriosw",
            Self::Nop => "nop",
            Self::Halt => "halt",
            Self::Move => "move",
            Self::Movepc => "movepc",
        }
    }
}

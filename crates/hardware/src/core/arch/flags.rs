//! Condition Flags and Condition Codes.
//!
//! This module models the arithmetic flag register. It provides:
//! 1. **Flag derivation:** Whole-register recomputation for logical, add, and subtract results.
//! 2. **Condition evaluation:** The 16 four-bit condition codes used by branches and
//!    predicated instructions.
//! 3. **Packing:** Conversion to and from the architectural register layout
//!    (zero bit 0, parity bit 1, carry bit 2, overflow bit 3, sign bit 4).

use std::fmt;

/// Bit position of the zero flag in the packed register.
const ZERO_BIT: u32 = 1 << 0;
/// Bit position of the parity flag.
const PARITY_BIT: u32 = 1 << 1;
/// Bit position of the carry flag.
const CARRY_BIT: u32 = 1 << 2;
/// Bit position of the overflow flag.
const OVERFLOW_BIT: u32 = 1 << 3;
/// Bit position of the sign flag.
const SIGN_BIT: u32 = 1 << 4;

#[inline(always)]
const fn msb(word: u32) -> bool {
    word & 0x8000_0000 != 0
}

/// The arithmetic condition flags.
///
/// Flags are never mutated individually by instructions: every flag-affecting
/// instruction replaces the whole value through one of the `from_*` constructors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Flags {
    /// Result was negative as a signed value.
    pub sign: bool,
    /// Signed overflow.
    pub overflow: bool,
    /// Unsigned carry out of bit 31.
    pub carry: bool,
    /// Bit 0 of the result was clear.
    pub parity: bool,
    /// Result was zero.
    pub zero: bool,
}

impl Flags {
    /// Flags for a logical or move result: carry and overflow cleared.
    ///
    /// # Arguments
    ///
    /// * `result` - The 32-bit result of the operation.
    #[inline]
    pub const fn from_logical(result: u32) -> Self {
        Self {
            sign: msb(result),
            overflow: false,
            carry: false,
            parity: result & 1 == 0,
            zero: result == 0,
        }
    }

    /// Flags for `result = dest + src`.
    ///
    /// The carry formula also holds when a carry-in was folded into `result`.
    ///
    /// # Arguments
    ///
    /// * `result` - The 32-bit sum.
    /// * `dest` - The first addend.
    /// * `src` - The second addend.
    #[inline]
    pub const fn from_add(result: u32, dest: u32, src: u32) -> Self {
        let base = Self::from_logical(result);
        Self {
            overflow: msb(!(dest ^ src) & (dest ^ result)),
            carry: msb((dest & src) | (!result & (dest | src))),
            ..base
        }
    }

    /// Flags for `result = dest - src`, computed as `dest + (-src)`.
    ///
    /// Subtracting zero never borrows, so carry is forced set when `src == 0`.
    ///
    /// # Arguments
    ///
    /// * `result` - The 32-bit difference.
    /// * `dest` - The minuend.
    /// * `src` - The subtrahend.
    #[inline]
    pub const fn from_sub(result: u32, dest: u32, src: u32) -> Self {
        let flags = Self::from_add(result, dest, src.wrapping_neg());
        if src == 0 {
            Self {
                carry: true,
                ..flags
            }
        } else {
            flags
        }
    }

    /// Packs the flags into the architectural register layout.
    pub const fn bits(self) -> u32 {
        (self.zero as u32 * ZERO_BIT)
            | (self.parity as u32 * PARITY_BIT)
            | (self.carry as u32 * CARRY_BIT)
            | (self.overflow as u32 * OVERFLOW_BIT)
            | (self.sign as u32 * SIGN_BIT)
    }

    /// Unpacks flags from the architectural register layout; other bits are ignored.
    pub const fn from_bits(bits: u32) -> Self {
        Self {
            sign: bits & SIGN_BIT != 0,
            overflow: bits & OVERFLOW_BIT != 0,
            carry: bits & CARRY_BIT != 0,
            parity: bits & PARITY_BIT != 0,
            zero: bits & ZERO_BIT != 0,
        }
    }

    /// Evaluates a condition against these flags.
    #[inline]
    pub const fn check(self, cond: Condition) -> bool {
        cond.holds(self)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ZF: {}, PF: {}, CF: {}, OF: {}, SF {}",
            u8::from(self.zero),
            u8::from(self.parity),
            u8::from(self.carry),
            u8::from(self.overflow),
            u8::from(self.sign)
        )
    }
}

/// A four-bit condition code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Always true.
    Always = 0,
    /// Z.
    Zero = 1,
    /// !Z.
    NotZero = 2,
    /// S.
    Sign = 3,
    /// !S.
    NotSign = 4,
    /// P.
    Parity = 5,
    /// !P.
    NotParity = 6,
    /// O.
    Overflow = 7,
    /// !O.
    NotOverflow = 8,
    /// C.
    Carry = 9,
    /// !C.
    NotCarry = 10,
    /// Unsigned above: C and !Z.
    Above = 11,
    /// Unsigned below or equal: !C or Z.
    BelowOrEqual = 12,
    /// Signed greater: S == O and !Z.
    Greater = 13,
    /// Signed less or equal: S != O or Z.
    LessOrEqual = 14,
    /// Signed greater or equal: S == O.
    GreaterOrEqual = 15,
}

impl Condition {
    /// All sixteen codes in encoding order.
    pub const ALL: [Self; 16] = [
        Self::Always,
        Self::Zero,
        Self::NotZero,
        Self::Sign,
        Self::NotSign,
        Self::Parity,
        Self::NotParity,
        Self::Overflow,
        Self::NotOverflow,
        Self::Carry,
        Self::NotCarry,
        Self::Above,
        Self::BelowOrEqual,
        Self::Greater,
        Self::LessOrEqual,
        Self::GreaterOrEqual,
    ];

    /// Decodes a condition code; only the low four bits are used.
    pub const fn from_bits(cc: u32) -> Self {
        Self::ALL[(cc & 0xF) as usize]
    }

    /// Evaluates the condition against `flags`.
    pub const fn holds(self, flags: Flags) -> bool {
        let Flags {
            sign: s,
            overflow: o,
            carry: c,
            parity: p,
            zero: z,
        } = flags;
        match self {
            Self::Always => true,
            Self::Zero => z,
            Self::NotZero => !z,
            Self::Sign => s,
            Self::NotSign => !s,
            Self::Parity => p,
            Self::NotParity => !p,
            Self::Overflow => o,
            Self::NotOverflow => !o,
            Self::Carry => c,
            Self::NotCarry => !c,
            Self::Above => c && !z,
            Self::BelowOrEqual => !c || z,
            Self::Greater => (s == o) && !z,
            Self::LessOrEqual => (s != o) || z,
            Self::GreaterOrEqual => s == o,
        }
    }

    /// Assembler suffix of the condition.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Always => "",
            Self::Zero => ".z",
            Self::NotZero => ".nz",
            Self::Sign => ".s",
            Self::NotSign => ".ns",
            Self::Parity => ".p",
            Self::NotParity => ".np",
            Self::Overflow => ".o",
            Self::NotOverflow => ".no",
            Self::Carry => ".c",
            Self::NotCarry => ".nc",
            Self::Above => ".a",
            Self::BelowOrEqual => ".be",
            Self::Greater => ".g",
            Self::LessOrEqual => ".le",
            Self::GreaterOrEqual => ".ge",
        }
    }
}

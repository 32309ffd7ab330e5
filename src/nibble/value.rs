//! Single 4-bit data value.
//!
//! Nibbles are stored in a `u8` with the high four bits always clear.
//! Every constructor masks its input, so no operation can produce an
//! out-of-range value.

use std::fmt;
use serde::{Serialize, Deserialize};

/// A 4-bit value in the range 0..=15.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Nibble(u8);

impl Nibble {
    /// The zero nibble.
    pub const ZERO: Nibble = Nibble(0);

    /// The all-ones nibble (0xF).
    pub const MAX: Nibble = Nibble(0xF);

    /// Create a nibble, keeping only the low four bits of `value`.
    #[inline]
    pub const fn new(value: u8) -> Self {
        Nibble(value & 0xF)
    }

    /// The high nibble of a byte (bits 7-4).
    #[inline]
    pub const fn high_of(byte: u8) -> Self {
        Nibble(byte >> 4)
    }

    /// The low nibble of a byte (bits 3-0).
    #[inline]
    pub const fn low_of(byte: u8) -> Self {
        Nibble(byte & 0xF)
    }

    /// Raw value, 0..=15.
    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `NOT(self AND other)`, truncated to four bits.
    ///
    /// This is the machine's only native logic operation.
    #[inline]
    pub const fn nand(self, other: Nibble) -> Nibble {
        Nibble(!(self.0 & other.0) & 0xF)
    }

    /// Upper two bits (3-2), used as the first register index of a
    /// register-pair operand.
    #[inline]
    pub const fn upper_pair(self) -> u8 {
        (self.0 >> 2) & 0b11
    }

    /// Lower two bits (1-0), used as the second register index of a
    /// register-pair operand.
    #[inline]
    pub const fn lower_pair(self) -> u8 {
        self.0 & 0b11
    }
}

impl From<u8> for Nibble {
    fn from(value: u8) -> Self {
        Nibble::new(value)
    }
}

impl From<Nibble> for u8 {
    fn from(n: Nibble) -> Self {
        n.0
    }
}

impl fmt::Debug for Nibble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::Display for Nibble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

impl fmt::UpperHex for Nibble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for Nibble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

//! 12-bit nibble addresses.
//!
//! Both the instruction address register and the data address register
//! are three nibbles wide. The limbs are kept separately because the
//! instruction set writes them one nibble at a time.

use std::fmt;
use serde::{Serialize, Deserialize};
use super::Nibble;

/// Number of addressable nibbles (2^12).
pub const ADDRESS_SPACE_SIZE: usize = 4096;

/// A 12-bit address stored as `[low, mid, high]` limbs.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Addr12 {
    limbs: [Nibble; 3],
}

impl Addr12 {
    /// Address 0.
    pub const ZERO: Addr12 = Addr12 { limbs: [Nibble::ZERO; 3] };

    /// Build an address from its limbs.
    pub const fn from_limbs(low: Nibble, mid: Nibble, high: Nibble) -> Self {
        Self { limbs: [low, mid, high] }
    }

    /// Build an address from an integer, keeping only the low 12 bits.
    pub const fn from_u16(value: u16) -> Self {
        Self {
            limbs: [
                Nibble::new(value as u8),
                Nibble::new((value >> 4) as u8),
                Nibble::new((value >> 8) as u8),
            ],
        }
    }

    /// `high*256 + mid*16 + low`.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        (self.limbs[2].value() as u16) << 8
            | (self.limbs[1].value() as u16) << 4
            | self.limbs[0].value() as u16
    }

    #[inline]
    pub const fn low(self) -> Nibble {
        self.limbs[0]
    }

    #[inline]
    pub const fn mid(self) -> Nibble {
        self.limbs[1]
    }

    #[inline]
    pub const fn high(self) -> Nibble {
        self.limbs[2]
    }

    pub fn set_low(&mut self, n: Nibble) {
        self.limbs[0] = n;
    }

    pub fn set_mid(&mut self, n: Nibble) {
        self.limbs[1] = n;
    }

    pub fn set_high(&mut self, n: Nibble) {
        self.limbs[2] = n;
    }

    /// Advance by one, wrapping from 0xFFF to 0x000.
    /// Returns the old value.
    pub fn increment(&mut self) -> Addr12 {
        let old = *self;
        *self = Addr12::from_u16(self.to_u16().wrapping_add(1));
        old
    }
}

impl From<u16> for Addr12 {
    fn from(value: u16) -> Self {
        Addr12::from_u16(value)
    }
}

impl fmt::Debug for Addr12 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Addr12({:03X})", self.to_u16())
    }
}

impl fmt::Display for Addr12 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03X}", self.to_u16())
    }
}

impl fmt::UpperHex for Addr12 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.to_u16(), f)
    }
}

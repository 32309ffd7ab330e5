//! CPU register file.
//!
//! The machine has:
//! - A, B, C, D: four 4-bit general purpose registers
//! - IAR: 12-bit instruction address register
//! - ADDR: 12-bit address register, the operand address for LOD/STR

use crate::nibble::{Addr12, Nibble};
use serde::{Serialize, Deserialize};

/// A general purpose register, selectable by a 2-bit index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reg {
    A,
    B,
    C,
    D,
}

impl Reg {
    /// All registers in index order.
    pub const ALL: [Reg; 4] = [Reg::A, Reg::B, Reg::C, Reg::D];

    /// Map a 2-bit index to a register. Only the low two bits are used.
    pub const fn from_index(index: u8) -> Self {
        match index & 0b11 {
            0 => Reg::A,
            1 => Reg::B,
            2 => Reg::C,
            _ => Reg::D,
        }
    }

    /// The register's 2-bit index.
    pub const fn index(self) -> u8 {
        match self {
            Reg::A => 0,
            Reg::B => 1,
            Reg::C => 2,
            Reg::D => 3,
        }
    }
}

/// The register file. Everything starts at zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    pub a: Nibble,
    pub b: Nibble,
    pub c: Nibble,
    pub d: Nibble,

    /// IAR: address of the next nibble to fetch.
    pub iar: Addr12,

    /// ADDR: memory operand address for LOD and STR.
    pub addr: Addr12,
}

impl Registers {
    /// Create a register file with all values zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all registers to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Read a general purpose register.
    pub fn get(&self, reg: Reg) -> Nibble {
        match reg {
            Reg::A => self.a,
            Reg::B => self.b,
            Reg::C => self.c,
            Reg::D => self.d,
        }
    }

    /// Write a general purpose register.
    pub fn set(&mut self, reg: Reg, value: Nibble) {
        let slot = match reg {
            Reg::A => &mut self.a,
            Reg::B => &mut self.b,
            Reg::C => &mut self.c,
            Reg::D => &mut self.d,
        };
        *slot = value;
    }

    /// Advance IAR by one (wrapping at 0xFFF).
    /// Returns the old value.
    pub fn advance_iar(&mut self) -> Addr12 {
        self.iar.increment()
    }

    /// Set IAR to an absolute address.
    pub fn jump(&mut self, target: Addr12) {
        self.iar = target;
    }
}

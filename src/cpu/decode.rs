//! Instruction decoder.
//!
//! Every instruction starts with a one-nibble opcode. Operands, when
//! present, are the nibbles that immediately follow it in address order.
//! Jump targets are three nibbles, most significant first.

use crate::nibble::{Addr12, Nibble};
use crate::cpu::registers::Reg;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// Load immediate: A := value
    Ldi { value: Nibble },

    /// Load: A := [ADDR]
    Lod,

    /// Store: [ADDR] := A
    Str,

    /// Set address low/mid: ADDR.mid := A, ADDR.low := B
    Sar,

    /// Set address high: ADDR.high := A
    Sap,

    /// Register move: dst := src
    Mov { src: Reg, dst: Reg },

    /// Unconditional jump: IAR := target
    Jmp { target: Addr12 },

    /// Register jump: IAR := {low: B, mid: A, high: D}
    Rjp,

    /// Jump if A is zero. The target is consumed either way.
    Jz { target: Addr12 },

    /// a := NOT(a AND b)
    Nand { a: Reg, b: Reg },
}

/// Opcode values.
pub struct Opcode;

impl Opcode {
    pub const LDI: u8 = 0x1;
    pub const LOD: u8 = 0x2;
    pub const STR: u8 = 0x3;
    pub const SAR: u8 = 0x4;
    pub const SAP: u8 = 0x5;
    pub const MOV: u8 = 0x6;
    pub const JMP: u8 = 0x8;
    pub const RJP: u8 = 0x9;
    pub const JZ: u8 = 0xA;
    pub const NAND: u8 = 0xD;

    /// Number of operand nibbles following `opcode`, or `None` if the
    /// opcode is not part of the instruction set.
    pub const fn operand_count(opcode: Nibble) -> Option<usize> {
        match opcode.value() {
            Self::LDI | Self::MOV | Self::NAND => Some(1),
            Self::LOD | Self::STR | Self::SAR | Self::SAP | Self::RJP => Some(0),
            Self::JMP | Self::JZ => Some(3),
            _ => None,
        }
    }
}

impl Instruction {
    /// The opcode nibble for this instruction.
    pub fn opcode(&self) -> Nibble {
        Nibble::new(match self {
            Instruction::Ldi { .. } => Opcode::LDI,
            Instruction::Lod => Opcode::LOD,
            Instruction::Str => Opcode::STR,
            Instruction::Sar => Opcode::SAR,
            Instruction::Sap => Opcode::SAP,
            Instruction::Mov { .. } => Opcode::MOV,
            Instruction::Jmp { .. } => Opcode::JMP,
            Instruction::Rjp => Opcode::RJP,
            Instruction::Jz { .. } => Opcode::JZ,
            Instruction::Nand { .. } => Opcode::NAND,
        })
    }

    /// Total size in nibbles, opcode included.
    pub fn nibble_len(&self) -> usize {
        1 + Opcode::operand_count(self.opcode()).unwrap_or(0)
    }
}

/// Decode a register-pair operand: bits 3-2 select the first register,
/// bits 1-0 the second.
fn reg_pair(operand: Nibble) -> (Reg, Reg) {
    (
        Reg::from_index(operand.upper_pair()),
        Reg::from_index(operand.lower_pair()),
    )
}

fn encode_reg_pair(first: Reg, second: Reg) -> Nibble {
    Nibble::new(first.index() << 2 | second.index())
}

/// Read a three-nibble jump target, most significant nibble first.
fn jump_target(mut next: impl FnMut() -> Nibble) -> Addr12 {
    let high = next();
    let mid = next();
    let low = next();
    Addr12::from_limbs(low, mid, high)
}

/// Decode the instruction starting with `opcode`, pulling operand nibbles
/// from `next` as needed.
pub fn decode(opcode: Nibble, mut next: impl FnMut() -> Nibble) -> Result<Instruction, DecodeError> {
    let instr = match opcode.value() {
        Opcode::LDI => Instruction::Ldi { value: next() },
        Opcode::LOD => Instruction::Lod,
        Opcode::STR => Instruction::Str,
        Opcode::SAR => Instruction::Sar,
        Opcode::SAP => Instruction::Sap,
        Opcode::MOV => {
            let (src, dst) = reg_pair(next());
            Instruction::Mov { src, dst }
        }
        Opcode::JMP => Instruction::Jmp { target: jump_target(&mut next) },
        Opcode::RJP => Instruction::Rjp,
        Opcode::JZ => Instruction::Jz { target: jump_target(&mut next) },
        Opcode::NAND => {
            let (a, b) = reg_pair(next());
            Instruction::Nand { a, b }
        }
        _ => return Err(DecodeError::IllegalOpcode(opcode)),
    };
    Ok(instr)
}

/// Decode one instruction from the front of a nibble slice.
///
/// Missing operand nibbles read as zero.
pub fn decode_slice(nibbles: &[Nibble]) -> Result<Instruction, DecodeError> {
    let mut iter = nibbles.iter().copied();
    let opcode = iter.next().unwrap_or(Nibble::ZERO);
    decode(opcode, || iter.next().unwrap_or(Nibble::ZERO))
}

/// Encode an instruction as its nibble stream.
pub fn encode(instr: &Instruction) -> Vec<Nibble> {
    let mut out = vec![instr.opcode()];
    match *instr {
        Instruction::Ldi { value } => out.push(value),
        Instruction::Mov { src, dst } => out.push(encode_reg_pair(src, dst)),
        Instruction::Nand { a, b } => out.push(encode_reg_pair(a, b)),
        Instruction::Jmp { target } | Instruction::Jz { target } => {
            out.extend([target.high(), target.mid(), target.low()]);
        }
        Instruction::Lod
        | Instruction::Str
        | Instruction::Sar
        | Instruction::Sap
        | Instruction::Rjp => {}
    }
    out
}

/// Encode a sequence of instructions into one nibble stream.
pub fn encode_program(program: &[Instruction]) -> Vec<Nibble> {
    program.iter().flat_map(encode).collect()
}

/// Decoder errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("illegal opcode {0:X}")]
    IllegalOpcode(Nibble),
}

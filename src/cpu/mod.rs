//! CPU emulation for the nibble machine.
//!
//! This module implements the complete architecture:
//! - 4 general purpose nibble registers: A, B, C, D
//! - 12-bit instruction address register (IAR) and address register (ADDR)
//! - 10-instruction set whose only logic primitive is NAND

pub mod registers;
pub mod decode;
pub mod execute;

pub use registers::{Reg, Registers};
pub use decode::{Instruction, Opcode, DecodeError, decode, encode, encode_program};
pub use execute::{Cpu, CpuError, CpuState, RunOutcome};

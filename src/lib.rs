//! # Nibble Emulator
//!
//! An emulator for a minimal 4-bit computer.
//!
//! The machine has a 12-bit nibble address space assembled from pluggable
//! ROM, RAM and debug-output mappings, and a CPU with four nibble
//! registers whose only logic instruction is NAND. Everything else has to
//! be built in software running on the machine.

pub mod nibble;
pub mod memory;
pub mod cpu;
pub mod rom;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use nibble::{Addr12, Nibble, ADDRESS_SPACE_SIZE};
pub use memory::{AddressSpace, MemoryMapping, MemoryError, Target};
pub use cpu::{Cpu, CpuError, CpuState, Instruction, Reg, Registers, RunOutcome};
pub use rom::{load_rom, ConfigError, MachineConfig, RamRegion, RomError, RomImage};

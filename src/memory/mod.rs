//! Nibble address space.
//!
//! The machine sees a flat 12-bit address space assembled from mappings,
//! each pairing an address range with a backing target:
//! - ROM: a read-only byte buffer, two nibbles per byte, high nibble first
//! - RAM: one mutable nibble per address
//! - DebugOutput: a single write-only diagnostic register

pub mod target;
pub mod space;

pub use target::{Target, WriteOutcome};
pub use space::{AddressSpace, MemoryMapping, MemoryError};

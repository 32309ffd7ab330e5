//! Address space composition and dispatch.
//!
//! Mappings are kept in registration order and resolved by linear scan,
//! so when ranges overlap the mapping registered first wins. Accesses
//! that hit no mapping are harmless: reads return zero and writes are
//! dropped, both with a debug-level log record.

use crate::nibble::{Addr12, Nibble, ADDRESS_SPACE_SIZE};
use super::target::{Target, WriteOutcome};
use thiserror::Error;

/// An address range paired with its backing target.
#[derive(Debug, Clone)]
pub struct MemoryMapping {
    /// First nibble address covered.
    pub base: u16,
    /// Number of nibbles covered.
    pub length: usize,
    /// Backing storage.
    pub target: Target,
}

impl MemoryMapping {
    /// Map `target` at `base`, covering exactly the target's own length.
    pub fn new(base: u16, target: Target) -> Self {
        let length = target.nibble_len();
        Self { base, length, target }
    }

    /// Map `target` at `base` with an explicit length.
    pub fn with_length(base: u16, length: usize, target: Target) -> Self {
        Self { base, length, target }
    }

    /// One past the last covered address.
    pub fn end(&self) -> usize {
        self.base as usize + self.length
    }

    /// Does this mapping cover `addr`?
    #[inline]
    pub fn contains(&self, addr: u16) -> bool {
        addr >= self.base && ((addr - self.base) as usize) < self.length
    }

    fn overlaps(&self, other: &MemoryMapping) -> bool {
        (self.base as usize) < other.end() && (other.base as usize) < self.end()
    }
}

/// The machine's address space.
#[derive(Debug, Clone, Default)]
pub struct AddressSpace {
    mappings: Vec<MemoryMapping>,
}

impl AddressSpace {
    /// Create an empty address space. Every address reads as zero.
    pub fn new() -> Self {
        Self { mappings: Vec::new() }
    }

    /// Append a mapping without validation.
    ///
    /// Earlier mappings shadow later ones wherever ranges overlap.
    pub fn register(&mut self, mapping: MemoryMapping) {
        tracing::debug!(
            "mapped {} at {:03X}..{:03X}",
            mapping.target.kind(),
            mapping.base,
            mapping.end(),
        );
        self.mappings.push(mapping);
    }

    /// Append a mapping after checking it fits in the 12-bit space and
    /// overlaps nothing already registered.
    pub fn try_register(&mut self, mapping: MemoryMapping) -> Result<(), MemoryError> {
        if mapping.length == 0 {
            return Err(MemoryError::EmptyMapping { base: mapping.base });
        }
        if mapping.end() > ADDRESS_SPACE_SIZE {
            return Err(MemoryError::OutOfBounds {
                base: mapping.base,
                length: mapping.length,
            });
        }
        if let Some(existing) = self.mappings.iter().find(|m| m.overlaps(&mapping)) {
            return Err(MemoryError::Overlap {
                base: mapping.base,
                length: mapping.length,
                existing_base: existing.base,
                existing_length: existing.length,
            });
        }
        self.register(mapping);
        Ok(())
    }

    /// Registered mappings, in resolution order.
    pub fn mappings(&self) -> &[MemoryMapping] {
        &self.mappings
    }

    /// Find the mapping servicing `addr`, returning its index and the
    /// local offset into its target.
    pub fn resolve(&self, addr: Addr12) -> Option<(usize, usize)> {
        let a = addr.to_u16();
        self.mappings
            .iter()
            .position(|m| m.contains(a))
            .map(|i| (i, (a - self.mappings[i].base) as usize))
    }

    /// Read the nibble at `addr`.
    pub fn read(&self, addr: Addr12) -> Nibble {
        match self.resolve(addr) {
            Some((index, offset)) => self.mappings[index].target.read(offset),
            None => {
                tracing::debug!("read from unmapped address {}", addr);
                Nibble::ZERO
            }
        }
    }

    /// Write `value` at `addr`.
    ///
    /// ROM writes are rejected with a warning; unmapped writes are dropped.
    pub fn write(&mut self, addr: Addr12, value: Nibble) {
        let Some((index, offset)) = self.resolve(addr) else {
            tracing::debug!("write of {} to unmapped address {} ignored", value, addr);
            return;
        };

        let target = &mut self.mappings[index].target;
        match target.write(offset, value) {
            WriteOutcome::Stored => {
                if let Target::DebugOutput { .. } = target {
                    tracing::info!("wrote {} to DBGOUT", value);
                }
            }
            WriteOutcome::RejectedRom => {
                tracing::warn!("attempt to write to ROM at offset {:x}", offset);
            }
            WriteOutcome::OutOfRange => {
                tracing::debug!(
                    "write of {} past end of {} at {} ignored",
                    value,
                    target.kind(),
                    addr,
                );
            }
        }
    }

    /// Last value written to the first debug output port, if one is mapped.
    pub fn debug_output(&self) -> Option<Nibble> {
        self.mappings.iter().find_map(|m| m.target.last_written())
    }
}

/// Errors from validated mapping registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("mapping at {base:03X} has zero length")]
    EmptyMapping { base: u16 },

    #[error("mapping at {base:03X} with length {length} exceeds the 12-bit address space")]
    OutOfBounds { base: u16, length: usize },

    #[error(
        "mapping at {base:03X} (length {length}) overlaps existing mapping at \
         {existing_base:03X} (length {existing_length})"
    )]
    Overlap {
        base: u16,
        length: usize,
        existing_base: u16,
        existing_length: usize,
    },
}

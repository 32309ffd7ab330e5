//! Backing targets for address-space mappings.

use crate::nibble::Nibble;

/// Result of a write delegated to a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The value was stored.
    Stored,
    /// The target is read-only; nothing changed.
    RejectedRom,
    /// The local offset is beyond the target's backing storage.
    OutOfRange,
}

/// The storage behind a mapping.
#[derive(Clone, PartialEq, Eq)]
pub enum Target {
    /// Read-only image. Byte `offset >> 1` holds the nibble; even offsets
    /// select the high nibble, odd offsets the low nibble.
    Rom { buffer: Vec<u8> },
    /// Mutable storage, one nibble per address.
    Ram { cells: Vec<Nibble> },
    /// Diagnostic output register. Always reads as zero.
    DebugOutput {
        /// Last value written.
        value: Nibble,
        /// Number of writes seen so far.
        writes: u64,
    },
}

impl Target {
    /// A ROM target over `bytes`.
    pub fn rom(bytes: impl Into<Vec<u8>>) -> Self {
        Target::Rom { buffer: bytes.into() }
    }

    /// A zero-filled RAM target of `len` nibbles.
    pub fn ram(len: usize) -> Self {
        Target::Ram { cells: vec![Nibble::ZERO; len] }
    }

    /// A fresh debug output register.
    pub fn debug_output() -> Self {
        Target::DebugOutput { value: Nibble::ZERO, writes: 0 }
    }

    /// Number of nibbles this target backs.
    pub fn nibble_len(&self) -> usize {
        match self {
            Target::Rom { buffer } => buffer.len() * 2,
            Target::Ram { cells } => cells.len(),
            Target::DebugOutput { .. } => 1,
        }
    }

    /// Short name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Target::Rom { .. } => "ROM",
            Target::Ram { .. } => "RAM",
            Target::DebugOutput { .. } => "DBGOUT",
        }
    }

    /// Read the nibble at a local offset.
    ///
    /// Offsets past the backing storage read as zero.
    pub fn read(&self, offset: usize) -> Nibble {
        match self {
            Target::Rom { buffer } => match buffer.get(offset >> 1) {
                Some(&byte) if offset & 1 == 0 => Nibble::high_of(byte),
                Some(&byte) => Nibble::low_of(byte),
                None => Nibble::ZERO,
            },
            Target::Ram { cells } => cells.get(offset).copied().unwrap_or(Nibble::ZERO),
            Target::DebugOutput { .. } => Nibble::ZERO,
        }
    }

    /// Write a nibble at a local offset.
    pub fn write(&mut self, offset: usize, value: Nibble) -> WriteOutcome {
        match self {
            Target::Rom { .. } => WriteOutcome::RejectedRom,
            Target::Ram { cells } => match cells.get_mut(offset) {
                Some(cell) => {
                    *cell = value;
                    WriteOutcome::Stored
                }
                None => WriteOutcome::OutOfRange,
            },
            Target::DebugOutput { value: reg, writes } => {
                *reg = value;
                *writes += 1;
                WriteOutcome::Stored
            }
        }
    }

    /// The last value written, for debug output targets.
    pub fn last_written(&self) -> Option<Nibble> {
        match self {
            Target::DebugOutput { value, .. } => Some(*value),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Buffers can be large; show sizes only
        match self {
            Target::Rom { buffer } => f.debug_struct("Rom").field("bytes", &buffer.len()).finish(),
            Target::Ram { cells } => f.debug_struct("Ram").field("cells", &cells.len()).finish(),
            Target::DebugOutput { value, writes } => f
                .debug_struct("DebugOutput")
                .field("value", value)
                .field("writes", writes)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rom_nibble_order() {
        let rom = Target::rom(vec![0x12, 0xAB]);
        assert_eq!(rom.nibble_len(), 4);
        assert_eq!(rom.read(0).value(), 0x1);
        assert_eq!(rom.read(1).value(), 0x2);
        assert_eq!(rom.read(2).value(), 0xA);
        assert_eq!(rom.read(3).value(), 0xB);
    }

    #[test]
    fn test_rom_rejects_writes() {
        let mut rom = Target::rom(vec![0x12]);
        assert_eq!(rom.write(0, Nibble::new(0xF)), WriteOutcome::RejectedRom);
        assert_eq!(rom, Target::rom(vec![0x12]));
    }

    #[test]
    fn test_ram_read_write() {
        let mut ram = Target::ram(16);
        assert_eq!(ram.write(5, Nibble::new(9)), WriteOutcome::Stored);
        assert_eq!(ram.read(5).value(), 9);
        assert_eq!(ram.read(4).value(), 0);
    }

    #[test]
    fn test_ram_out_of_range() {
        let mut ram = Target::ram(2);
        assert_eq!(ram.write(2, Nibble::new(1)), WriteOutcome::OutOfRange);
        assert_eq!(ram.read(2), Nibble::ZERO);
    }

    #[test]
    fn test_debug_output_reads_zero() {
        let mut dbg = Target::debug_output();
        dbg.write(0, Nibble::new(0xC));
        assert_eq!(dbg.read(0), Nibble::ZERO);
        assert_eq!(dbg.last_written(), Some(Nibble::new(0xC)));
        assert_eq!(dbg.nibble_len(), 1);
    }
}

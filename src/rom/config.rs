//! Machine layout configuration.
//!
//! The default layout mounts the ROM at nibble 0 and a single debug
//! output port at 0x100, with no RAM. A JSON file can move these and add
//! RAM regions:
//!
//! ```json
//! { "rom_base": 0, "debug_port": 256, "ram": [{ "base": 512, "length": 256 }] }
//! ```

use crate::memory::{AddressSpace, MemoryError, MemoryMapping, Target};
use crate::nibble::ADDRESS_SPACE_SIZE;
use crate::rom::RomImage;
use serde::{Serialize, Deserialize};
use std::path::Path;
use thiserror::Error;

/// Default nibble address of the debug output port.
pub const DEFAULT_DEBUG_PORT: u16 = 0x100;

/// A RAM region to map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RamRegion {
    pub base: u16,
    pub length: usize,
}

/// Address-space layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MachineConfig {
    /// Nibble address the ROM image is mounted at.
    pub rom_base: u16,
    /// Nibble address of the debug output port.
    pub debug_port: u16,
    /// Extra RAM regions, registered after the ROM and debug port.
    pub ram: Vec<RamRegion>,
    /// Reject overlapping or out-of-range mappings instead of letting the
    /// earlier mapping shadow the later one.
    pub strict_layout: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            rom_base: 0,
            debug_port: DEFAULT_DEBUG_PORT,
            ram: Vec::new(),
            strict_layout: false,
        }
    }
}

impl MachineConfig {
    /// Parse a layout from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Read a layout from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&text)
    }

    /// Build the address space: ROM first, then the debug port, then RAM
    /// regions in the order listed.
    pub fn build_address_space(&self, rom: RomImage) -> Result<AddressSpace, ConfigError> {
        self.validate()?;

        let mappings = std::iter::once(MemoryMapping::new(self.rom_base, Target::rom(rom.bytes)))
            .chain(std::iter::once(MemoryMapping::new(self.debug_port, Target::debug_output())))
            .chain(
                self.ram
                    .iter()
                    .map(|r| MemoryMapping::new(r.base, Target::ram(r.length))),
            );

        let mut space = AddressSpace::new();
        for mapping in mappings {
            if self.strict_layout {
                space.try_register(mapping)?;
            } else {
                space.register(mapping);
            }
        }
        Ok(space)
    }

    /// Check every configured address lies in the 12-bit space and every
    /// RAM region fits inside it. Runs before any backing storage is
    /// allocated, in both lenient and strict modes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (base, length) in [(self.rom_base, 1), (self.debug_port, 1)] {
            if base as usize >= ADDRESS_SPACE_SIZE {
                return Err(MemoryError::OutOfBounds { base, length }.into());
            }
        }
        for region in &self.ram {
            if region.length == 0 {
                return Err(MemoryError::EmptyMapping { base: region.base }.into());
            }
            let fits = (region.base as usize)
                .checked_add(region.length)
                .is_some_and(|end| end <= ADDRESS_SPACE_SIZE);
            if !fits {
                return Err(MemoryError::OutOfBounds {
                    base: region.base,
                    length: region.length,
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Errors from loading or applying a machine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {message}")]
    Io { path: String, message: String },

    #[error("invalid config: {0}")]
    Parse(String),

    #[error("invalid layout: {0}")]
    Layout(#[from] MemoryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nibble::{Addr12, Nibble};

    #[test]
    fn test_default_layout() {
        let space = MachineConfig::default()
            .build_address_space(RomImage::new(vec![0x12]))
            .unwrap();

        let kinds: Vec<_> = space.mappings().iter().map(|m| (m.base, m.length, m.target.kind())).collect();
        assert_eq!(kinds, vec![(0, 2, "ROM"), (0x100, 1, "DBGOUT")]);
        assert_eq!(space.read(Addr12::from_u16(1)).value(), 2);
    }

    #[test]
    fn test_parse_partial_json() {
        let config = MachineConfig::from_json(r#"{ "ram": [{ "base": 512, "length": 16 }] }"#).unwrap();
        assert_eq!(config.rom_base, 0);
        assert_eq!(config.debug_port, DEFAULT_DEBUG_PORT);
        assert_eq!(config.ram, vec![RamRegion { base: 0x200, length: 16 }]);
        assert!(!config.strict_layout);
    }

    #[test]
    fn test_parse_rejects_unknown_fields() {
        assert!(matches!(
            MachineConfig::from_json(r#"{ "rom_bsae": 4 }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_ram_region_is_writable() {
        let config = MachineConfig {
            ram: vec![RamRegion { base: 0x200, length: 4 }],
            ..MachineConfig::default()
        };
        let mut space = config.build_address_space(RomImage::default()).unwrap();
        space.write(Addr12::from_u16(0x203), Nibble::new(0xE));
        assert_eq!(space.read(Addr12::from_u16(0x203)).value(), 0xE);
    }

    #[test]
    fn test_lenient_layout_lets_rom_shadow_debug_port() {
        let rom = RomImage::new(vec![0xAB; 0x90]);
        let mut space = MachineConfig::default().build_address_space(rom).unwrap();
        space.write(Addr12::from_u16(0x100), Nibble::new(1));
        assert_eq!(space.read(Addr12::from_u16(0x100)).value(), 0xA);
        assert_eq!(space.debug_output(), Some(Nibble::ZERO));
    }

    #[test]
    fn test_strict_layout_rejects_overlap() {
        let config = MachineConfig { strict_layout: true, ..MachineConfig::default() };
        let err = config.build_address_space(RomImage::new(vec![0; 0x90])).unwrap_err();
        assert!(matches!(err, ConfigError::Layout(MemoryError::Overlap { base: 0x100, .. })));
    }

    #[test]
    fn test_oversized_ram_region_rejected_without_allocating() {
        for strict in [false, true] {
            let config = MachineConfig::from_json(&format!(
                r#"{{ "strict_layout": {strict}, "ram": [{{ "base": 512, "length": {} }}] }}"#,
                usize::MAX
            ))
            .unwrap();
            let err = config.build_address_space(RomImage::new(vec![0x12])).unwrap_err();
            assert!(
                matches!(err, ConfigError::Layout(MemoryError::OutOfBounds { base: 0x200, .. })),
                "{err:?}"
            );
        }
    }

    #[test]
    fn test_ram_region_must_fit_and_be_non_empty() {
        let past_end = MachineConfig {
            ram: vec![RamRegion { base: 0xF00, length: 0x101 }],
            ..MachineConfig::default()
        };
        assert!(matches!(
            past_end.build_address_space(RomImage::default()),
            Err(ConfigError::Layout(MemoryError::OutOfBounds { .. }))
        ));

        let empty = MachineConfig {
            ram: vec![RamRegion { base: 0x200, length: 0 }],
            ..MachineConfig::default()
        };
        assert!(matches!(
            empty.build_address_space(RomImage::default()),
            Err(ConfigError::Layout(MemoryError::EmptyMapping { base: 0x200 }))
        ));

        let exact = MachineConfig {
            ram: vec![RamRegion { base: 0xF00, length: 0x100 }],
            ..MachineConfig::default()
        };
        assert!(exact.build_address_space(RomImage::default()).is_ok());
    }

    #[test]
    fn test_unreachable_bases_rejected() {
        let rom_base = MachineConfig::from_json(r#"{ "rom_base": 5000 }"#).unwrap();
        assert!(matches!(
            rom_base.build_address_space(RomImage::default()),
            Err(ConfigError::Layout(MemoryError::OutOfBounds { base: 5000, .. }))
        ));

        let debug_port = MachineConfig { debug_port: 0x1000, ..MachineConfig::default() };
        assert!(matches!(
            debug_port.build_address_space(RomImage::default()),
            Err(ConfigError::Layout(MemoryError::OutOfBounds { base: 0x1000, .. }))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            MachineConfig::load("/nonexistent/nibble/layout.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}

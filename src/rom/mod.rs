//! Loading ROM images and laying out the machine.
//!
//! This module provides:
//! - ROM image loading (raw bytes, two nibbles per byte, high nibble first)
//! - `MachineConfig`, the address-space layout, optionally read from JSON

pub mod image;
pub mod config;

pub use image::{RomImage, RomError, load_rom};
pub use config::{MachineConfig, RamRegion, ConfigError};

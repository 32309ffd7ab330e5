//! ROM image format.
//!
//! A ROM image is a raw byte stream with no header. Each byte holds two
//! nibbles, high nibble first, so nibble `n` of the image lives in byte
//! `n / 2`.

use crate::nibble::Nibble;
use std::path::Path;
use thiserror::Error;

/// A loaded ROM image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RomImage {
    /// Raw image bytes, in file order.
    pub bytes: Vec<u8>,
}

impl RomImage {
    /// Wrap raw image bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Pack a nibble stream into an image. An odd trailing nibble is
    /// padded with a zero low nibble.
    pub fn from_nibbles(nibbles: &[Nibble]) -> Self {
        let bytes = nibbles
            .chunks(2)
            .map(|pair| {
                let high = pair[0].value();
                let low = pair.get(1).map_or(0, |n| n.value());
                high << 4 | low
            })
            .collect();
        Self { bytes }
    }

    /// Number of nibbles in the image.
    pub fn nibble_len(&self) -> usize {
        self.bytes.len() * 2
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Iterate over the image's nibbles in address order.
    pub fn nibbles(&self) -> impl Iterator<Item = Nibble> + '_ {
        self.bytes
            .iter()
            .flat_map(|&b| [Nibble::high_of(b), Nibble::low_of(b)])
    }
}

/// Load a ROM image from disk.
pub fn load_rom<P: AsRef<Path>>(path: P) -> Result<RomImage, RomError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| RomError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    tracing::debug!("loaded {} bytes from {}", bytes.len(), path.display());
    Ok(RomImage::new(bytes))
}

/// Errors that can occur while loading a ROM image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RomError {
    #[error("cannot read ROM image {path}: {message}")]
    Io { path: String, message: String },
}

//! Value types for the 4-bit machine.
//!
//! This module provides:
//! - `Nibble`: a single 4-bit data value (the machine's word size)
//! - `Addr12`: a 12-bit nibble address held as three nibble limbs

pub mod value;
pub mod addr;

pub use value::Nibble;
pub use addr::{Addr12, ADDRESS_SPACE_SIZE};

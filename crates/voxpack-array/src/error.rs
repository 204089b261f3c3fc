//! Error types shared by every array in this crate.

use thiserror::Error;

/// Errors reported by the section arrays and their constructors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrayError {
    /// The index is outside `0..len`.
    #[error("index {index} out of range for array of length {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Logical length of the array.
        len: usize,
    },
    /// A raw code does not fit into the current bit width.
    #[error("raw value {value} does not fit into {bits} bits")]
    InvalidRawValue {
        /// The offending value.
        value: u64,
        /// Bits available per element.
        bits: u8,
    },
    /// A stored code has no palette entry.
    #[error("palette code {code} has no entry (palette length {palette_len})")]
    UnknownPaletteCode {
        /// Raw code read from storage.
        code: u64,
        /// Current palette length.
        palette_len: usize,
    },
    /// The bit width is not allowed for the requested storage mode.
    #[error("invalid bits per value: {0}")]
    InvalidBitsPerValue(u8),
    /// The word buffer does not match the size implied by the bit width.
    #[error("word count mismatch: expected {expected}, got {actual}")]
    WordCountMismatch {
        /// Words required by the bit width.
        expected: usize,
        /// Words supplied.
        actual: usize,
    },
    /// The palette holds more entries than the bit width can address.
    #[error("palette of {len} entries does not fit into {bits} bits")]
    PaletteOverflow {
        /// Palette length.
        len: usize,
        /// Bits per value.
        bits: u8,
    },
    /// The palette thresholds are inconsistent.
    #[error("invalid palette limits: {0}")]
    InvalidLimits(&'static str),
    /// A light buffer of the wrong size was supplied.
    #[error("light data must be {expected} bytes, got {0}", expected = crate::light::LIGHT_BYTES)]
    InvalidLightLength(usize),
}

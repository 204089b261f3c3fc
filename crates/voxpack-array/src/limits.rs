//! Bit-width thresholds that drive palette growth and the switch to direct mode.

use serde::{Deserialize, Serialize};

use crate::error::ArrayError;

/// Smallest bit width a paletted block array uses.
pub const MIN_PALETTE_BITS: u8 = 4;

/// Widest bit width that still uses a palette.
pub const MAX_PALETTE_BITS: u8 = 8;

/// Bit width of direct (unpaletted) storage.
pub const DIRECT_BITS: u8 = 13;

/// Thresholds used by [`BlockArray`](crate::BlockArray) when choosing a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteLimits {
    /// Lower clamp for paletted bit widths.
    pub min_bits: u8,
    /// Paletted widths above this switch the array to direct mode.
    pub max_palette_bits: u8,
    /// Width used once the array is in direct mode.
    pub direct_bits: u8,
}

impl Default for PaletteLimits {
    fn default() -> Self {
        Self {
            min_bits: MIN_PALETTE_BITS,
            max_palette_bits: MAX_PALETTE_BITS,
            direct_bits: DIRECT_BITS,
        }
    }
}

impl PaletteLimits {
    /// Checks that the thresholds describe a usable layout ladder.
    pub fn validate(&self) -> Result<(), ArrayError> {
        if self.min_bits == 0 {
            return Err(ArrayError::InvalidLimits("min_bits must be at least 1"));
        }
        if self.min_bits > self.max_palette_bits {
            return Err(ArrayError::InvalidLimits(
                "min_bits must not exceed max_palette_bits",
            ));
        }
        if self.max_palette_bits >= self.direct_bits {
            return Err(ArrayError::InvalidLimits(
                "direct_bits must be wider than max_palette_bits",
            ));
        }
        if self.direct_bits > 64 {
            return Err(ArrayError::InvalidLimits("direct_bits must be at most 64"));
        }
        Ok(())
    }

    /// Returns the bit width for `palette_len` distinct values, or `None` when
    /// the array should use direct storage instead.
    pub fn palette_bits(&self, palette_len: usize) -> Option<u8> {
        let bits = bits_required(palette_len).max(self.min_bits);
        (bits <= self.max_palette_bits).then_some(bits)
    }

    /// Largest global value direct storage can hold.
    pub fn direct_max(&self) -> u64 {
        u64::MAX >> (64 - u32::from(self.direct_bits))
    }

    /// Returns `true` if `bits` is a valid paletted width under these limits.
    pub fn is_palette_width(&self, bits: u8) -> bool {
        (self.min_bits..=self.max_palette_bits).contains(&bits)
    }
}

/// `ceil(log2(n))`: the number of bits needed to address `n` distinct codes.
pub fn bits_required(n: usize) -> u8 {
    if n <= 1 {
        0
    } else {
        (usize::BITS - (n - 1).leading_zeros()) as u8
    }
}

//! Palette-compressed block storage for the 4096 voxels of a chunk section.
//!
//! A [`BlockArray`] starts out paletted at the narrowest width. Each element
//! stores a local code into an ordered palette of global values. When a new
//! value would overflow the palette, the array repacks itself into a wider
//! layout, and past [`PaletteLimits::max_palette_bits`] it drops the palette
//! and stores global values directly.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::SECTION_VOLUME;
use crate::bit_packed::BitPackedArray;
use crate::error::ArrayError;
use crate::limits::PaletteLimits;
use crate::palette::Palette;
use crate::section::SectionArray;

/// Decoder-facing representation of a [`BlockArray`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockArrayParts {
    /// Bits used by every element.
    pub bits_per_value: u8,
    /// Packed element words.
    pub words: Vec<u64>,
    /// Palette entries in code order, or `None` for direct storage.
    pub palette: Option<Vec<u64>>,
}

/// Paletted, variable-width array of 4096 global block values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BlockArrayParts", into = "BlockArrayParts")]
pub struct BlockArray {
    /// Bit-packed palette codes, or global values in direct mode.
    storage: BitPackedArray,
    /// `None` once the array is in direct mode.
    palette: Option<Palette>,
    limits: PaletteLimits,
}

impl BlockArray {
    /// Creates an array where every element is global value `0`.
    ///
    /// The array starts paletted at 4 bits with the palette `[0]`.
    pub fn empty() -> Self {
        Self::empty_with(PaletteLimits::default())
    }

    /// Creates an empty array that grows according to `limits`.
    pub fn with_limits(limits: PaletteLimits) -> Result<Self, ArrayError> {
        limits.validate()?;
        Ok(Self::empty_with(limits))
    }

    fn empty_with(limits: PaletteLimits) -> Self {
        Self {
            storage: BitPackedArray::new(limits.min_bits, SECTION_VOLUME),
            palette: Some(Palette::new(0)),
            limits,
        }
    }

    /// Assembles an array from decoded parts using the default limits.
    pub fn from_parts(
        bits_per_value: u8,
        words: Vec<u64>,
        palette: Option<Vec<u64>>,
    ) -> Result<Self, ArrayError> {
        Self::from_parts_with_limits(PaletteLimits::default(), bits_per_value, words, palette)
    }

    /// Assembles an array from decoded parts.
    ///
    /// Rejects widths the limits do not allow for the given mode, word buffers
    /// of the wrong size, palettes too long for the width, and stored codes
    /// without a palette entry.
    pub fn from_parts_with_limits(
        limits: PaletteLimits,
        bits_per_value: u8,
        words: Vec<u64>,
        palette: Option<Vec<u64>>,
    ) -> Result<Self, ArrayError> {
        limits.validate()?;

        let palette = match palette {
            Some(entries) => {
                if !limits.is_palette_width(bits_per_value) {
                    return Err(ArrayError::InvalidBitsPerValue(bits_per_value));
                }
                if entries.len() > 1usize << bits_per_value {
                    return Err(ArrayError::PaletteOverflow {
                        len: entries.len(),
                        bits: bits_per_value,
                    });
                }
                Some(Palette::from_entries(entries))
            }
            None if bits_per_value == limits.direct_bits => None,
            None => return Err(ArrayError::InvalidBitsPerValue(bits_per_value)),
        };

        let storage = BitPackedArray::from_raw(bits_per_value, SECTION_VOLUME, words)?;
        if let Some(palette) = &palette {
            for index in 0..SECTION_VOLUME {
                let code = storage.get(index)?;
                if palette.value_of(code).is_none() {
                    return Err(ArrayError::UnknownPaletteCode {
                        code,
                        palette_len: palette.len(),
                    });
                }
            }
        }

        Ok(Self {
            storage,
            palette,
            limits,
        })
    }

    /// Splits the array into its decoder-facing parts.
    pub fn into_parts(self) -> BlockArrayParts {
        BlockArrayParts {
            bits_per_value: self.storage.bits(),
            palette: self.palette.map(Palette::into_entries),
            words: self.storage.into_raw(),
        }
    }

    /// Returns the global value at `index`.
    pub fn get(&self, index: usize) -> Result<u64, ArrayError> {
        let raw = self.storage.get(index)?;
        match &self.palette {
            Some(palette) => palette
                .value_of(raw)
                .ok_or(ArrayError::UnknownPaletteCode {
                    code: raw,
                    palette_len: palette.len(),
                }),
            None => Ok(raw),
        }
    }

    /// Stores the global `value` at `index`, growing the layout if needed.
    ///
    /// In direct mode `value` must fit into the direct width; it is never
    /// truncated.
    pub fn set(&mut self, index: usize, value: u64) -> Result<(), ArrayError> {
        // Reject bad indices before the palette can grow.
        if index >= SECTION_VOLUME {
            return Err(ArrayError::IndexOutOfRange {
                index,
                len: SECTION_VOLUME,
            });
        }

        let known = self.palette.as_ref().map(|palette| palette.code_of(value));
        let raw = match known {
            None => value,
            Some(Some(code)) => code,
            Some(None) => {
                // A value that cannot survive the switch to direct mode must
                // fail before the repack rewrites the section.
                let palette_len = self.palette.as_ref().map_or(0, Palette::len);
                if self.limits.palette_bits(palette_len + 1).is_none()
                    && value > self.limits.direct_max()
                {
                    return Err(ArrayError::InvalidRawValue {
                        value,
                        bits: self.limits.direct_bits,
                    });
                }
                self.repack(Some(1))?;
                match &mut self.palette {
                    Some(palette) => {
                        let code = palette.push(value);
                        trace!(value, code, "palette entry added");
                        code
                    }
                    None => value,
                }
            }
        };
        self.storage.set(index, raw)
    }

    /// Re-evaluates the layout and migrates storage if it has to grow.
    ///
    /// With `reserve = Some(k)` the target palette length is the current
    /// length plus `k`; with `None` it is the number of distinct values
    /// stored. The width only ever grows: a target at or below the current
    /// width, or an array already in direct mode, is left untouched. Use
    /// [`compact`](Self::compact) to shrink.
    ///
    /// Only fails for arrays whose storage references missing palette codes.
    pub fn repack(&mut self, reserve: Option<u32>) -> Result<(), ArrayError> {
        let Some(palette) = &self.palette else {
            return Ok(());
        };

        let target_len = match reserve {
            Some(extra) => palette.len() + extra as usize,
            None => self.count_distinct()?,
        };
        let target_bits = self.limits.palette_bits(target_len);
        let new_bits = target_bits.unwrap_or(self.limits.direct_bits);
        if new_bits <= self.storage.bits() {
            return Ok(());
        }

        let values = self.collect_values()?;
        let new_palette = match (target_bits, reserve) {
            (None, _) => None,
            // Growth ahead of an insert keeps codes stable.
            (Some(_), Some(_)) => self.palette.take(),
            (Some(_), None) => Some(Palette::default()),
        };
        self.rebuild(new_bits, new_palette, &values);
        Ok(())
    }

    /// Drops unused palette entries and narrows the layout as far as the
    /// stored values allow, leaving direct mode if they fit a palette again.
    ///
    /// Scans all 4096 elements; call sparingly (for example before encoding),
    /// not after every `set`.
    pub fn compact(&mut self) -> Result<(), ArrayError> {
        let values = self.collect_values()?;
        let mut palette = Palette::default();
        for &value in &values {
            palette.code_or_insert(value);
        }

        match self.limits.palette_bits(palette.len()) {
            Some(bits) => {
                let unchanged = bits == self.storage.bits()
                    && self
                        .palette
                        .as_ref()
                        .is_some_and(|current| current.len() == palette.len());
                if !unchanged {
                    self.rebuild(bits, Some(palette), &values);
                }
            }
            None if self.palette.is_some() => {
                self.rebuild(self.limits.direct_bits, None, &values);
            }
            None => {}
        }
        Ok(())
    }

    /// Resets every element to `value` with a one-entry palette.
    pub fn fill(&mut self, value: u64) {
        self.storage = BitPackedArray::new(self.limits.min_bits, SECTION_VOLUME);
        self.palette = Some(Palette::new(value));
    }

    /// Number of distinct global values currently stored.
    pub fn count_distinct(&self) -> Result<usize, ArrayError> {
        let mut seen = FxHashSet::default();
        for index in 0..SECTION_VOLUME {
            seen.insert(self.get(index)?);
        }
        Ok(seen.len())
    }

    /// Bits used by every element in the current layout.
    pub fn bits_per_value(&self) -> u8 {
        self.storage.bits()
    }

    /// Palette entries in code order, or `None` in direct mode.
    pub fn palette(&self) -> Option<&[u64]> {
        self.palette.as_ref().map(Palette::as_slice)
    }

    /// Packed storage words.
    pub fn words(&self) -> &[u64] {
        self.storage.raw_data()
    }

    /// Returns `true` once the array stores global values directly.
    pub fn is_direct(&self) -> bool {
        self.palette.is_none()
    }

    /// Thresholds this array grows by.
    pub fn limits(&self) -> PaletteLimits {
        self.limits
    }

    /// Size of the packed storage in bytes (palette not included).
    pub fn storage_bytes(&self) -> usize {
        self.storage.storage_bytes()
    }

    fn collect_values(&self) -> Result<Vec<u64>, ArrayError> {
        (0..SECTION_VOLUME).map(|index| self.get(index)).collect()
    }

    /// Replaces storage with a zeroed buffer of `bits` and writes `values`
    /// back. A supplied palette is extended in first-seen order; `None`
    /// writes global values directly.
    fn rebuild(&mut self, bits: u8, mut palette: Option<Palette>, values: &[u64]) {
        let old_bits = self.storage.bits();
        let mut storage = BitPackedArray::new(bits, SECTION_VOLUME);
        let max_raw = storage.max_value();
        let mut truncated = 0usize;

        for (index, &value) in values.iter().enumerate() {
            let raw = match &mut palette {
                Some(palette) => palette.code_or_insert(value),
                None if value > max_raw => {
                    truncated += 1;
                    value & max_raw
                }
                None => value,
            };
            let written = storage.set(index, raw);
            debug_assert!(written.is_ok(), "repacked code does not fit: {written:?}");
        }

        if truncated > 0 {
            warn!(
                truncated,
                direct_bits = bits,
                "values wider than direct storage were truncated"
            );
        }
        debug!(
            old_bits,
            new_bits = bits,
            palette_len = ?palette.as_ref().map(Palette::len),
            "block array repacked"
        );

        self.storage = storage;
        self.palette = palette;
    }
}

impl Default for BlockArray {
    fn default() -> Self {
        Self::empty()
    }
}

impl TryFrom<BlockArrayParts> for BlockArray {
    type Error = ArrayError;

    fn try_from(parts: BlockArrayParts) -> Result<Self, Self::Error> {
        Self::from_parts(parts.bits_per_value, parts.words, parts.palette)
    }
}

impl From<BlockArray> for BlockArrayParts {
    fn from(array: BlockArray) -> Self {
        array.into_parts()
    }
}

impl SectionArray for BlockArray {
    type Value = u64;

    fn get(&self, index: usize) -> Result<u64, ArrayError> {
        BlockArray::get(self, index)
    }

    fn set(&mut self, index: usize, value: u64) -> Result<(), ArrayError> {
        BlockArray::set(self, index, value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

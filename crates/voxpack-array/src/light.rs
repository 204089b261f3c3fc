//! Nibble array holding one 4-bit light level per voxel of a chunk section.
//!
//! Two levels share a byte: the even index lives in the low nibble, the odd
//! index in the high nibble. Bytes are the little-endian bytes of the backing
//! words, so byte `b` is bits `8 * (b % 8)..` of word `b / 8`. This ordering
//! is what external encoders see through [`LightArray::to_bytes`] and must not
//! change.

use serde::{Deserialize, Serialize};

use crate::SECTION_VOLUME;
use crate::error::ArrayError;
use crate::section::SectionArray;

/// Size of a light array in bytes.
pub const LIGHT_BYTES: usize = SECTION_VOLUME / 2;

/// Number of backing words.
pub const LIGHT_WORDS: usize = LIGHT_BYTES / 8;

/// Maximum light level.
pub const MAX_LIGHT: u8 = 15;

/// Fixed 4-bit light levels for 4096 voxels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct LightArray {
    words: Vec<u64>,
}

impl LightArray {
    /// Creates a fully dark array.
    pub fn new() -> Self {
        Self {
            words: vec![0; LIGHT_WORDS],
        }
    }

    /// Creates an array with every voxel at `level`.
    pub fn filled(level: u8) -> Result<Self, ArrayError> {
        check_level(level)?;
        let byte = u64::from(level | (level << 4));
        Ok(Self {
            words: vec![byte * 0x0101_0101_0101_0101; LIGHT_WORDS],
        })
    }

    /// Wraps decoded words.
    pub fn from_words(words: Vec<u64>) -> Result<Self, ArrayError> {
        if words.len() != LIGHT_WORDS {
            return Err(ArrayError::WordCountMismatch {
                expected: LIGHT_WORDS,
                actual: words.len(),
            });
        }
        Ok(Self { words })
    }

    /// Builds an array from its 2048-byte nibble representation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArrayError> {
        if bytes.len() != LIGHT_BYTES {
            return Err(ArrayError::InvalidLightLength(bytes.len()));
        }
        let words = bytes
            .chunks_exact(8)
            .map(|chunk| {
                let mut word = [0u8; 8];
                word.copy_from_slice(chunk);
                u64::from_le_bytes(word)
            })
            .collect();
        Ok(Self { words })
    }

    /// Returns the light level at `index`.
    pub fn get(&self, index: usize) -> Result<u8, ArrayError> {
        let (word, shift) = nibble_slot(index)?;
        Ok(((self.words[word] >> shift) & 0xF) as u8)
    }

    /// Sets the light level at `index`, leaving the neighbouring nibble intact.
    pub fn set(&mut self, index: usize, level: u8) -> Result<(), ArrayError> {
        check_level(level)?;
        let (word, shift) = nibble_slot(index)?;
        let word = &mut self.words[word];
        *word = (*word & !(0xFu64 << shift)) | (u64::from(level) << shift);
        Ok(())
    }

    /// Backing words.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// The 2048 nibble-packed bytes in index order.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|word| word.to_le_bytes()).collect()
    }
}

impl Default for LightArray {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<u64>> for LightArray {
    type Error = ArrayError;

    fn try_from(words: Vec<u64>) -> Result<Self, Self::Error> {
        Self::from_words(words)
    }
}

impl From<LightArray> for Vec<u64> {
    fn from(array: LightArray) -> Self {
        array.words
    }
}

impl SectionArray for LightArray {
    type Value = u8;

    fn get(&self, index: usize) -> Result<u8, ArrayError> {
        LightArray::get(self, index)
    }

    fn set(&mut self, index: usize, value: u8) -> Result<(), ArrayError> {
        LightArray::set(self, index, value)
    }
}

/// Word index and bit shift of the nibble for `index`.
fn nibble_slot(index: usize) -> Result<(usize, u32), ArrayError> {
    if index >= SECTION_VOLUME {
        return Err(ArrayError::IndexOutOfRange {
            index,
            len: SECTION_VOLUME,
        });
    }
    let byte = index / 2;
    let shift = (byte % 8) * 8 + (index % 2) * 4;
    Ok((byte / 8, shift as u32))
}

fn check_level(level: u8) -> Result<(), ArrayError> {
    if level > MAX_LIGHT {
        return Err(ArrayError::InvalidRawValue {
            value: u64::from(level),
            bits: 4,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nibbles_share_a_byte() {
        let mut light = LightArray::new();
        light.set(0, 0xA).unwrap();
        light.set(1, 0xB).unwrap();
        assert_eq!(light.to_bytes()[0], 0xBA);
        assert_eq!(light.get(0).unwrap(), 0xA);
        assert_eq!(light.get(1).unwrap(), 0xB);
    }

    #[test]
    fn test_set_preserves_neighbour() {
        let mut light = LightArray::filled(15).unwrap();
        light.set(9, 3).unwrap();
        assert_eq!(light.get(8).unwrap(), 15);
        assert_eq!(light.get(9).unwrap(), 3);
        assert_eq!(light.get(10).unwrap(), 15);
        assert_eq!(light.to_bytes()[4], 0x3F);
    }

    #[test]
    fn test_all_positions_accessible() {
        let mut light = LightArray::new();
        for i in 0..SECTION_VOLUME {
            light.set(i, (i % 16) as u8).unwrap();
        }
        for i in 0..SECTION_VOLUME {
            assert_eq!(light.get(i).unwrap(), (i % 16) as u8);
        }
    }

    #[test]
    fn test_last_byte_maps_to_last_word() {
        let mut light = LightArray::new();
        light.set(4095, 7).unwrap();
        assert_eq!(light.words()[LIGHT_WORDS - 1], 7u64 << 60);
        assert_eq!(light.to_bytes()[LIGHT_BYTES - 1], 0x70);
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut light = LightArray::new();
        assert_eq!(
            light.set(0, 16),
            Err(ArrayError::InvalidRawValue { value: 16, bits: 4 })
        );
        assert!(light.get(SECTION_VOLUME).is_err());
        assert!(LightArray::filled(20).is_err());
        assert_eq!(
            LightArray::from_bytes(&[0; 10]),
            Err(ArrayError::InvalidLightLength(10))
        );
        assert!(LightArray::from_words(vec![0; 255]).is_err());
    }

    #[test]
    fn test_bytes_roundtrip() {
        let mut light = LightArray::new();
        light.set(100, 12).unwrap();
        light.set(2001, 5).unwrap();
        let restored = LightArray::from_bytes(&light.to_bytes()).unwrap();
        assert_eq!(restored, light);
    }
}
